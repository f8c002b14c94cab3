//! Place search requests, normalized places and search responses

use serde::{Deserialize, Serialize};

use crate::provider::PlaceRecord;
use crate::{AssistantError, Coordinate, Result};

/// Default nearby-search radius in meters
pub const DEFAULT_RADIUS_METERS: u32 = 5000;
/// Provider results kept per search
pub const MAX_PLACES: usize = 10;
/// Photo references kept per place
pub const MAX_PHOTOS: usize = 3;

const PLACE_URL_PREFIX: &str = "https://www.google.com/maps/place/?q=place_id:";

fn default_radius() -> u32 {
    DEFAULT_RADIUS_METERS
}

/// Parameters of a place search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// What to look for, e.g. "coffee shops"
    #[serde(default)]
    pub query: String,
    /// Free-text area to search around; text search is used when absent
    #[serde(default)]
    pub location: Option<String>,
    /// Nearby-search radius in meters
    #[serde(default = "default_radius")]
    pub radius: u32,
    /// Provider category filter, e.g. "restaurant"
    #[serde(default, rename = "type")]
    pub place_type: Option<String>,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            location: None,
            radius: DEFAULT_RADIUS_METERS,
            place_type: None,
        }
    }

    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    #[must_use]
    pub fn with_radius(mut self, radius: u32) -> Self {
        self.radius = radius;
        self
    }

    #[must_use]
    pub fn with_place_type(mut self, place_type: impl Into<String>) -> Self {
        self.place_type = Some(place_type.into());
        self
    }

    /// Reject requests without a usable query before any provider call
    pub fn validate(&self) -> Result<()> {
        if self.query.trim().is_empty() {
            return Err(AssistantError::validation("query"));
        }
        Ok(())
    }
}

/// A provider place record normalized for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaceResult {
    pub name: String,
    pub place_id: Option<String>,
    pub rating: Option<f64>,
    pub price_level: Option<u8>,
    pub address: Option<String>,
    pub location: Option<Coordinate>,
    pub types: Vec<String>,
    /// "Open now" flag when the provider reports opening hours
    pub opening_hours: Option<bool>,
    pub photos: Vec<String>,
    pub google_maps_url: String,
}

impl PlaceResult {
    /// Apply the defaulting rules to a raw provider record
    #[must_use]
    pub fn from_record(record: PlaceRecord) -> Self {
        let google_maps_url = place_url(record.place_id.as_deref().unwrap_or_default());
        let address = record.vicinity.or(record.formatted_address);
        let photos = record
            .photos
            .into_iter()
            .take(MAX_PHOTOS)
            .filter_map(|photo| photo.photo_reference)
            .collect();

        Self {
            name: record.name.unwrap_or_else(|| "Unknown".to_string()),
            place_id: record.place_id,
            rating: record.rating,
            price_level: record.price_level,
            address,
            location: record.geometry.and_then(|geometry| geometry.location),
            types: record.types,
            opening_hours: record.opening_hours.and_then(|hours| hours.open_now),
            photos,
            google_maps_url,
        }
    }
}

/// Deterministic map link for a provider place id
#[must_use]
pub fn place_url(place_id: &str) -> String {
    format!("{PLACE_URL_PREFIX}{place_id}")
}

/// Successful search payload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResults {
    pub location: Option<String>,
    pub results_count: usize,
    /// In provider relevance order
    pub places: Vec<PlaceResult>,
    pub map_center: Option<Coordinate>,
    pub search_radius: u32,
}

/// Outcome of a place search
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResponse {
    pub success: bool,
    pub query: String,
    #[serde(flatten)]
    pub results: Option<SearchResults>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SearchResponse {
    #[must_use]
    pub fn success(
        query: impl Into<String>,
        location: Option<String>,
        places: Vec<PlaceResult>,
        map_center: Option<Coordinate>,
        search_radius: u32,
    ) -> Self {
        Self {
            success: true,
            query: query.into(),
            results: Some(SearchResults {
                location,
                results_count: places.len(),
                places,
                map_center,
                search_radius,
            }),
            error: None,
        }
    }

    #[must_use]
    pub fn failure(query: impl Into<String>, error: &AssistantError) -> Self {
        Self {
            success: false,
            query: query.into(),
            results: None,
            error: Some(error.to_string()),
        }
    }

    /// Places found, empty on failure
    #[must_use]
    pub fn places(&self) -> &[PlaceResult] {
        self.results
            .as_ref()
            .map(|results| results.places.as_slice())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn map_center(&self) -> Option<Coordinate> {
        self.results.as_ref().and_then(|results| results.map_center)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{Geometry, OpeningHours, PhotoRecord};

    fn photo(reference: &str) -> PhotoRecord {
        PhotoRecord {
            photo_reference: Some(reference.to_string()),
        }
    }

    #[test]
    fn test_place_url_is_deterministic() {
        assert_eq!(
            place_url("abc123"),
            "https://www.google.com/maps/place/?q=place_id:abc123"
        );
    }

    #[test]
    fn test_from_record_applies_defaults() {
        let place = PlaceResult::from_record(PlaceRecord {
            place_id: Some("p1".to_string()),
            ..PlaceRecord::default()
        });

        assert_eq!(place.name, "Unknown");
        assert_eq!(place.address, None);
        assert!(place.types.is_empty());
        assert!(place.photos.is_empty());
        assert_eq!(place.opening_hours, None);
        assert_eq!(place.google_maps_url, place_url("p1"));
    }

    #[test]
    fn test_from_record_prefers_vicinity_over_formatted_address() {
        let place = PlaceResult::from_record(PlaceRecord {
            vicinity: Some("12 Main St".to_string()),
            formatted_address: Some("12 Main St, Denver, CO 80202, USA".to_string()),
            ..PlaceRecord::default()
        });
        assert_eq!(place.address.as_deref(), Some("12 Main St"));

        let place = PlaceResult::from_record(PlaceRecord {
            formatted_address: Some("12 Main St, Denver".to_string()),
            ..PlaceRecord::default()
        });
        assert_eq!(place.address.as_deref(), Some("12 Main St, Denver"));
    }

    #[test]
    fn test_from_record_truncates_photos_and_reads_nested_fields() {
        let place = PlaceResult::from_record(PlaceRecord {
            name: Some("Sushi Den".to_string()),
            geometry: Some(Geometry {
                location: Some(Coordinate::new(39.69, -104.98)),
            }),
            opening_hours: Some(OpeningHours {
                open_now: Some(true),
            }),
            photos: vec![photo("a"), photo("b"), photo("c"), photo("d"), photo("e")],
            ..PlaceRecord::default()
        });

        assert_eq!(place.photos, vec!["a", "b", "c"]);
        assert_eq!(place.location, Some(Coordinate::new(39.69, -104.98)));
        assert_eq!(place.opening_hours, Some(true));
    }

    #[test]
    fn test_search_request_validation() {
        assert!(SearchRequest::new("pizza").validate().is_ok());

        let err = SearchRequest::new("   ").validate().unwrap_err();
        assert!(matches!(err, AssistantError::Validation { field: "query" }));
    }

    #[test]
    fn test_search_request_wire_defaults() {
        let request: SearchRequest =
            serde_json::from_str(r#"{"query": "tacos", "type": "restaurant"}"#).unwrap();
        assert_eq!(request.radius, DEFAULT_RADIUS_METERS);
        assert_eq!(request.place_type.as_deref(), Some("restaurant"));
        assert_eq!(request.location, None);
    }

    #[test]
    fn test_failure_serializes_without_places() {
        let response =
            SearchResponse::failure("tacos", &AssistantError::location_not_found("Atlantis"));
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["success"], false);
        assert_eq!(json["query"], "tacos");
        assert_eq!(json["error"], "Could not find location: Atlantis");
        assert!(json.get("places").is_none());
        assert!(response.places().is_empty());
    }

    #[test]
    fn test_success_serializes_flat_fields() {
        let response = SearchResponse::success("tacos", None, Vec::new(), None, 5000);
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["success"], true);
        assert_eq!(json["results_count"], 0);
        assert_eq!(json["search_radius"], 5000);
        assert!(json["map_center"].is_null());
        assert!(json.get("error").is_none());
    }
}
