//! Conversational entry point composing the location pipeline
//!
//! A [`LocationAssistant`] is built once from configuration and shared by all
//! requests. It holds no per-request state.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::config::MapsConfig;
use crate::intent::{DIRECTIONS_HINT, HELP_TEXT, IntentClassifier};
use crate::models::{ChatKind, ChatResponse, Intent};
use crate::provider::{GeoProvider, GoogleMapsClient};
use crate::{
    AssistantError, DirectionsEngine, DirectionsRequest, DirectionsResponse, PlaceSearchEngine,
    ResponseFormatter, Result, SearchRequest, SearchResponse,
};

pub const SERVICE_UNAVAILABLE_TEXT: &str =
    "I'm sorry, the location service is currently unavailable. Please try again later.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HealthStatus {
    pub provider_configured: bool,
}

struct Engines {
    places: PlaceSearchEngine,
    directions: DirectionsEngine,
}

pub struct LocationAssistant {
    engines: Option<Engines>,
}

impl LocationAssistant {
    /// Assistant backed by `provider`, biased by the configured region and language
    pub fn new(provider: Arc<dyn GeoProvider>, maps: &MapsConfig) -> Self {
        Self {
            engines: Some(Engines {
                places: PlaceSearchEngine::new(provider.clone(), &maps.region, &maps.language),
                directions: DirectionsEngine::new(provider, &maps.language),
            }),
        }
    }

    /// Assistant without a provider; every lookup reports a configuration error
    #[must_use]
    pub fn unconfigured() -> Self {
        Self { engines: None }
    }

    /// Build the Google Maps backed assistant, falling back to unconfigured
    #[must_use]
    pub fn from_config(maps: &MapsConfig) -> Self {
        match GoogleMapsClient::new(maps) {
            Ok(client) => {
                info!("Google Maps client configured");
                Self::new(Arc::new(client), maps)
            }
            Err(e) => {
                warn!("{}. Maps functionality will be limited.", e);
                Self::unconfigured()
            }
        }
    }

    #[must_use]
    pub fn health(&self) -> HealthStatus {
        HealthStatus {
            provider_configured: self.engines.is_some(),
        }
    }

    fn engines(&self) -> Result<&Engines> {
        self.engines
            .as_ref()
            .ok_or_else(|| AssistantError::configuration("maps provider is not configured"))
    }

    /// Validate and run a place search
    #[instrument(skip(self))]
    pub async fn search_places(&self, request: &SearchRequest) -> Result<SearchResponse> {
        request.validate()?;
        Ok(self.engines()?.places.search(request).await)
    }

    /// Validate and run a route lookup
    #[instrument(skip(self))]
    pub async fn get_directions(&self, request: &DirectionsRequest) -> Result<DirectionsResponse> {
        request.validate()?;
        Ok(self.engines()?.directions.route(request).await)
    }

    /// Classify a chat message and answer it
    #[instrument(skip(self))]
    pub async fn classify_and_respond(&self, message: &str) -> ChatResponse {
        let query = IntentClassifier::classify(message);
        info!("Classified message as {:?}", query.intent);

        match query.intent {
            Intent::Search => {
                let Some(engines) = &self.engines else {
                    return ChatResponse::text(ChatKind::Error, SERVICE_UNAVAILABLE_TEXT);
                };
                let request = SearchRequest {
                    location: query.location,
                    ..SearchRequest::new(query.text)
                };
                let results = engines.places.search(&request).await;
                let text = ResponseFormatter::format(&request.query, &results);
                ChatResponse::places(text, results)
            }
            Intent::Directions => ChatResponse::text(ChatKind::Instruction, DIRECTIONS_HINT),
            Intent::Help => ChatResponse::text(ChatKind::Help, HELP_TEXT),
        }
    }
}
