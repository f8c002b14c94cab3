//! Location Resolution Module
//!
//! This module resolves free-text location descriptions into a single
//! coordinate pair that anchors a nearby search.

use crate::provider::GeoProvider;
use crate::{AssistantError, Coordinate, Result};
use tracing::{debug, instrument};

/// Service for resolving location text
pub struct LocationResolver;

impl LocationResolver {
    /// Resolve a location description via the provider's geocoder
    ///
    /// The first candidate is taken as the best match; no disambiguation is
    /// attempted between multiple candidates.
    #[instrument(skip(provider))]
    pub async fn resolve(provider: &dyn GeoProvider, text: &str) -> Result<Coordinate> {
        debug!("Geocoding location: {}", text);

        let candidates = provider.geocode(text).await?;
        let Some(best) = candidates.into_iter().next() else {
            return Err(AssistantError::location_not_found(text));
        };

        let coordinate = best.coordinate().ok_or_else(|| {
            AssistantError::provider(format!("Geocoding result for '{text}' has no coordinates"))
        })?;

        debug!(
            "Resolved location: {} at ({:.4}, {:.4})",
            best.formatted_address.as_deref().unwrap_or(text),
            coordinate.latitude,
            coordinate.longitude
        );

        Ok(coordinate)
    }
}
