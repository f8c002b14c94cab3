//! Place search over nearby and text search

use std::sync::Arc;

use tracing::{error, info, instrument};

use crate::location_resolver::LocationResolver;
use crate::models::place::MAX_PLACES;
use crate::provider::{GeoProvider, PlaceRecord};
use crate::{Coordinate, PlaceResult, Result, SearchRequest, SearchResponse};

/// Runs place searches and normalizes the provider's records
pub struct PlaceSearchEngine {
    provider: Arc<dyn GeoProvider>,
    region: String,
    language: String,
}

impl PlaceSearchEngine {
    /// `region` and `language` bias every text search made by this engine
    pub fn new(
        provider: Arc<dyn GeoProvider>,
        region: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            region: region.into(),
            language: language.into(),
        }
    }

    /// Search for places; provider and lookup failures become `success: false`
    #[instrument(skip(self), fields(query = %request.query))]
    pub async fn search(&self, request: &SearchRequest) -> SearchResponse {
        match self.try_search(request).await {
            Ok((places, center)) => {
                info!("Found {} places for '{}'", places.len(), request.query);
                SearchResponse::success(
                    request.query.clone(),
                    request.location.clone(),
                    places,
                    center,
                    request.radius,
                )
            }
            Err(e) => {
                error!("Error searching places: {}", e);
                SearchResponse::failure(request.query.clone(), &e)
            }
        }
    }

    async fn try_search(
        &self,
        request: &SearchRequest,
    ) -> Result<(Vec<PlaceResult>, Option<Coordinate>)> {
        let location = request
            .location
            .as_deref()
            .filter(|location| !location.trim().is_empty());

        let (records, center) = match location {
            Some(location) => {
                let center = LocationResolver::resolve(self.provider.as_ref(), location).await?;
                let records = self
                    .provider
                    .nearby_search(
                        center,
                        request.radius,
                        &request.query,
                        request.place_type.as_deref(),
                    )
                    .await?;
                (records, Some(center))
            }
            None => {
                let records = self
                    .provider
                    .text_search(&request.query, &self.region, &self.language)
                    .await?;
                (records, None)
            }
        };

        Ok((normalize(records), center))
    }
}

/// Keep the provider's top results, in order, as display records
fn normalize(records: Vec<PlaceRecord>) -> Vec<PlaceResult> {
    records
        .into_iter()
        .take(MAX_PLACES)
        .map(PlaceResult::from_record)
        .collect()
}
