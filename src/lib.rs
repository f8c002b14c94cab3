//! `Wayfinder` - conversational place search and directions
//!
//! This library turns free-text location requests into queries against a maps
//! provider and reshapes the provider's answers into display-ready payloads
//! plus a natural-language summary.

pub mod api;
pub mod assistant;
pub mod config;
pub mod directions;
pub mod error;
pub mod formatter;
pub mod intent;
pub mod location_resolver;
pub mod logging;
pub mod models;
pub mod places;
pub mod provider;
pub mod web;

// Re-export core types for public API
pub use assistant::{HealthStatus, LocationAssistant};
pub use crate::config::WayfinderConfig;
pub use directions::DirectionsEngine;
pub use error::{AssistantError, ErrorKind};
pub use formatter::ResponseFormatter;
pub use intent::IntentClassifier;
pub use location_resolver::LocationResolver;
pub use models::{
    ChatKind, ChatRequest, ChatResponse, Coordinate, DirectionsRequest,
    DirectionsResponse, Intent, PlaceResult, Query, RouteSummary, SearchRequest, SearchResponse,
    SearchResults,
};
pub use places::PlaceSearchEngine;
pub use provider::{GeoProvider, GoogleMapsClient};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, AssistantError>;
