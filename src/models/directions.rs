//! Route requests and first-leg summaries

use serde::{Deserialize, Serialize};

use crate::{AssistantError, Result};

pub const DEFAULT_MODE: &str = "driving";

const DIRECTIONS_URL_PREFIX: &str = "https://www.google.com/maps/dir/";

fn default_mode() -> String {
    DEFAULT_MODE.to_string()
}

/// Parameters of a route lookup
///
/// `mode` is one of driving, walking, transit or bicycling. Anything else is
/// forwarded untouched and left to the provider to reject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectionsRequest {
    #[serde(default)]
    pub origin: String,
    #[serde(default)]
    pub destination: String,
    #[serde(default = "default_mode")]
    pub mode: String,
}

impl DirectionsRequest {
    pub fn new(origin: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            mode: default_mode(),
        }
    }

    #[must_use]
    pub fn with_mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = mode.into();
        self
    }

    /// Reject requests missing either endpoint before any provider call
    pub fn validate(&self) -> Result<()> {
        if self.origin.trim().is_empty() {
            return Err(AssistantError::validation("origin"));
        }
        if self.destination.trim().is_empty() {
            return Err(AssistantError::validation("destination"));
        }
        Ok(())
    }
}

/// First leg of the first route returned by the provider
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteSummary {
    pub origin: String,
    pub destination: String,
    pub mode: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_address: Option<String>,
    /// Sanitized step instructions in travel order
    pub steps: Vec<String>,
    pub google_maps_url: String,
}

/// Outcome of a route lookup
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectionsResponse {
    pub success: bool,
    #[serde(flatten)]
    pub route: Option<RouteSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DirectionsResponse {
    #[must_use]
    pub fn success(route: RouteSummary) -> Self {
        Self {
            success: true,
            route: Some(route),
            error: None,
        }
    }

    #[must_use]
    pub fn failure(error: &AssistantError) -> Self {
        Self {
            success: false,
            route: None,
            error: Some(error.to_string()),
        }
    }
}

/// Map link for a route; endpoints are inserted verbatim
#[must_use]
pub fn directions_url(origin: &str, destination: &str) -> String {
    format!("{DIRECTIONS_URL_PREFIX}{origin}/{destination}")
}
