//! Data models for the Wayfinder pipeline
//!
//! This module contains the request and response records organized by concern:
//! - Coordinate: Resolved latitude/longitude pairs
//! - Place: Place search requests, normalized places and search responses
//! - Directions: Route requests and first-leg summaries
//! - Chat: Classified queries and conversational responses

pub mod chat;
pub mod coordinate;
pub mod directions;
pub mod place;

// Re-export all public types for convenient access
pub use chat::{ChatKind, ChatRequest, ChatResponse, Intent, Query};
pub use coordinate::Coordinate;
pub use directions::{DirectionsRequest, DirectionsResponse, RouteSummary};
pub use place::{PlaceResult, SearchRequest, SearchResponse, SearchResults};
