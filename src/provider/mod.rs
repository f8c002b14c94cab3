//! Maps provider capability boundary
//!
//! The pipeline only talks to a provider through [`GeoProvider`]. Records
//! coming back keep every field optional; defaults are applied when the
//! records are normalized, never here.

pub mod google;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{Coordinate, Result};

pub use google::GoogleMapsClient;

/// Geocoding, place search and routing capabilities of a maps provider
#[async_trait]
pub trait GeoProvider: Send + Sync {
    /// Candidates for a free-text location, best match first
    async fn geocode(&self, text: &str) -> Result<Vec<GeocodeCandidate>>;

    /// Places within `radius_meters` of `center`
    async fn nearby_search(
        &self,
        center: Coordinate,
        radius_meters: u32,
        keyword: &str,
        place_type: Option<&str>,
    ) -> Result<Vec<PlaceRecord>>;

    /// Places matching a free-text query
    async fn text_search(&self, query: &str, region: &str, language: &str)
    -> Result<Vec<PlaceRecord>>;

    /// Routes between two free-text endpoints
    async fn directions(
        &self,
        origin: &str,
        destination: &str,
        mode: &str,
        language: &str,
    ) -> Result<Vec<RouteRecord>>;
}

/// One geocoding match
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeocodeCandidate {
    pub formatted_address: Option<String>,
    pub geometry: Option<Geometry>,
}

impl GeocodeCandidate {
    #[must_use]
    pub fn coordinate(&self) -> Option<Coordinate> {
        self.geometry.as_ref().and_then(|geometry| geometry.location)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Geometry {
    pub location: Option<Coordinate>,
}

/// Raw place as returned by nearby or text search
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlaceRecord {
    pub name: Option<String>,
    pub place_id: Option<String>,
    pub rating: Option<f64>,
    pub price_level: Option<u8>,
    pub vicinity: Option<String>,
    pub formatted_address: Option<String>,
    pub geometry: Option<Geometry>,
    #[serde(default)]
    pub types: Vec<String>,
    pub opening_hours: Option<OpeningHours>,
    #[serde(default)]
    pub photos: Vec<PhotoRecord>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpeningHours {
    pub open_now: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PhotoRecord {
    pub photo_reference: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RouteRecord {
    #[serde(default)]
    pub legs: Vec<LegRecord>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LegRecord {
    pub distance: Option<TextValue>,
    pub duration: Option<TextValue>,
    pub start_address: Option<String>,
    pub end_address: Option<String>,
    #[serde(default)]
    pub steps: Vec<StepRecord>,
}

/// Human readable measurement, e.g. `"12.3 mi"`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TextValue {
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StepRecord {
    pub html_instructions: Option<String>,
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_record_tolerates_missing_fields() {
        let record: PlaceRecord = serde_json::from_str(r#"{"name": "Blue Bottle"}"#).unwrap();
        assert_eq!(record.name.as_deref(), Some("Blue Bottle"));
        assert!(record.types.is_empty());
        assert!(record.photos.is_empty());
        assert!(record.geometry.is_none());
    }

    #[test]
    fn test_geocode_candidate_coordinate() {
        let candidate: GeocodeCandidate = serde_json::from_str(
            r#"{"formatted_address": "Denver, CO, USA",
                "geometry": {"location": {"lat": 39.7392, "lng": -104.9903}}}"#,
        )
        .unwrap();
        assert_eq!(candidate.coordinate(), Some(Coordinate::new(39.7392, -104.9903)));
    }

    #[test]
    fn test_route_record_parses_leg() {
        let route: RouteRecord = serde_json::from_str(
            r#"{"legs": [{"distance": {"text": "215 mi", "value": 346000},
                          "duration": {"text": "3 hours 40 mins", "value": 13200},
                          "start_address": "New York, NY, USA",
                          "end_address": "Boston, MA, USA",
                          "steps": [{"html_instructions": "Head <b>north</b>"}]}]}"#,
        )
        .unwrap();
        let leg = &route.legs[0];
        assert_eq!(leg.distance.as_ref().and_then(|d| d.text.as_deref()), Some("215 mi"));
        assert_eq!(leg.steps.len(), 1);
    }
}
