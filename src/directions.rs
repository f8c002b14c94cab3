//! Route lookup and first-leg extraction

use std::sync::Arc;

use tracing::{error, info, instrument};

use crate::models::directions::directions_url;
use crate::provider::{GeoProvider, LegRecord, TextValue};
use crate::{AssistantError, DirectionsRequest, DirectionsResponse, Result, RouteSummary};

/// Literal markup substitutions applied to step instructions, in order
const STEP_MARKUP: [(&str, &str); 4] = [
    ("<b>", "**"),
    ("</b>", "**"),
    ("<div style=\"font-size:0.9em\">", "("),
    ("</div>", ")"),
];

pub struct DirectionsEngine {
    provider: Arc<dyn GeoProvider>,
    language: String,
}

impl DirectionsEngine {
    pub fn new(provider: Arc<dyn GeoProvider>, language: impl Into<String>) -> Self {
        Self {
            provider,
            language: language.into(),
        }
    }

    /// Look up a route; provider failures and empty answers become `success: false`
    #[instrument(skip(self))]
    pub async fn route(&self, request: &DirectionsRequest) -> DirectionsResponse {
        match self.try_route(request).await {
            Ok(route) => {
                info!(
                    "Route from '{}' to '{}' has {} steps",
                    route.origin,
                    route.destination,
                    route.steps.len()
                );
                DirectionsResponse::success(route)
            }
            Err(e) => {
                error!("Error getting directions: {}", e);
                DirectionsResponse::failure(&e)
            }
        }
    }

    async fn try_route(&self, request: &DirectionsRequest) -> Result<RouteSummary> {
        let routes = self
            .provider
            .directions(
                &request.origin,
                &request.destination,
                &request.mode,
                &self.language,
            )
            .await?;

        let route = routes
            .into_iter()
            .next()
            .ok_or_else(|| AssistantError::not_found("No directions found"))?;
        let leg = route
            .legs
            .into_iter()
            .next()
            .ok_or_else(|| AssistantError::provider("Route has no legs"))?;

        Ok(summarize(request, leg))
    }
}

fn summarize(request: &DirectionsRequest, leg: LegRecord) -> RouteSummary {
    RouteSummary {
        origin: request.origin.clone(),
        destination: request.destination.clone(),
        mode: request.mode.clone(),
        distance: leg.distance.and_then(text_of),
        duration: leg.duration.and_then(text_of),
        start_address: leg.start_address,
        end_address: leg.end_address,
        steps: leg
            .steps
            .into_iter()
            .filter_map(|step| step.html_instructions)
            .map(|html| sanitize_instruction(&html))
            .collect(),
        google_maps_url: directions_url(&request.origin, &request.destination),
    }
}

fn text_of(value: TextValue) -> Option<String> {
    value.text
}

/// Replace the bold and font-size wrapper tags the provider emits
///
/// Only those literal substrings are rewritten; any other markup is left as is.
#[must_use]
pub fn sanitize_instruction(html: &str) -> String {
    STEP_MARKUP
        .iter()
        .fold(html.to_string(), |text, (tag, replacement)| {
            text.replace(tag, replacement)
        })
}
