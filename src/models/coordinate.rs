//! Coordinate model for resolved search centers and place positions

use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in decimal degrees
///
/// Serialized with the provider's `lat`/`lng` field names so payloads keep the
/// same shape the maps frontend already consumes.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinate {
    /// Latitude in decimal degrees
    #[serde(rename = "lat")]
    pub latitude: f64,
    /// Longitude in decimal degrees
    #[serde(rename = "lng")]
    pub longitude: f64,
}

impl Coordinate {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Format as the `lat,lng` pair the provider expects in query strings
    #[must_use]
    pub fn to_query_param(&self) -> String {
        format!("{},{}", self.latitude, self.longitude)
    }
}
