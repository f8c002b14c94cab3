//! JSON API over the location assistant

pub mod rate_limit;

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    middleware::from_fn_with_state,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::Utc;
use serde::Serialize;
use serde_json::json;
use tracing::error;

use crate::config::LimitsConfig;
use crate::{
    AssistantError, ChatRequest, ChatResponse, DirectionsRequest, DirectionsResponse,
    LocationAssistant, ResponseFormatter, SearchRequest, SearchResponse,
};
use rate_limit::{RouteLimit, enforce_rate_limit};

#[derive(Clone)]
pub struct AppState {
    pub assistant: Arc<LocationAssistant>,
}

/// Error body returned by every route: `{"error": "..."}`
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl From<AssistantError> for ApiError {
    fn from(err: AssistantError) -> Self {
        match err {
            AssistantError::Validation {
                field: "origin" | "destination",
            } => Self::new(StatusCode::BAD_REQUEST, "Missing origin or destination"),
            AssistantError::Validation { .. } => {
                Self::new(StatusCode::BAD_REQUEST, err.user_message())
            }
            AssistantError::Configuration { .. } => {
                Self::new(StatusCode::SERVICE_UNAVAILABLE, err.user_message())
            }
            _ => {
                error!("Unhandled assistant error: {}", err);
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            format!("Invalid JSON body: {}", rejection.body_text()),
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

#[derive(Debug, Serialize)]
struct HealthBody {
    status: &'static str,
    timestamp: String,
    google_maps_configured: bool,
}

#[derive(Debug, Serialize)]
struct QueryInfo {
    original_query: String,
    location: Option<String>,
    radius: u32,
    #[serde(rename = "type")]
    place_type: Option<String>,
}

#[derive(Debug, Serialize)]
struct SearchBody {
    llm_response: String,
    places_data: SearchResponse,
    query_info: QueryInfo,
}

pub fn router(state: AppState, limits: &LimitsConfig) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/search",
            post(search_places).layer(from_fn_with_state(
                RouteLimit::per_minute(limits.search_per_minute),
                enforce_rate_limit,
            )),
        )
        .route(
            "/directions",
            post(get_directions).layer(from_fn_with_state(
                RouteLimit::per_minute(limits.directions_per_minute),
                enforce_rate_limit,
            )),
        )
        .route(
            "/llm-chat",
            post(llm_chat).layer(from_fn_with_state(
                RouteLimit::per_minute(limits.chat_per_minute),
                enforce_rate_limit,
            )),
        )
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Json<HealthBody> {
    Json(HealthBody {
        status: "healthy",
        timestamp: Utc::now().to_rfc3339(),
        google_maps_configured: state.assistant.health().provider_configured,
    })
}

async fn search_places(
    State(state): State<AppState>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<SearchBody>, ApiError> {
    let Json(request) = payload?;
    let places_data = state.assistant.search_places(&request).await?;
    let llm_response = ResponseFormatter::format(&request.query, &places_data);

    Ok(Json(SearchBody {
        llm_response,
        places_data,
        query_info: QueryInfo {
            original_query: request.query,
            location: request.location,
            radius: request.radius,
            place_type: request.place_type,
        },
    }))
}

async fn get_directions(
    State(state): State<AppState>,
    payload: Result<Json<DirectionsRequest>, JsonRejection>,
) -> Result<Json<DirectionsResponse>, ApiError> {
    let Json(request) = payload?;
    Ok(Json(state.assistant.get_directions(&request).await?))
}

async fn llm_chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let Json(request) = payload?;
    request.validate()?;
    Ok(Json(
        state.assistant.classify_and_respond(&request.message).await,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MapsConfig;
    use crate::provider::testing::{StaticProvider, place};
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, header::CONTENT_TYPE};
    use serde::Deserialize;
    use serde_json::Value;
    use tower::ServiceExt;

    #[derive(Debug, Deserialize)]
    struct ErrorBody {
        error: String,
    }

    fn app(assistant: LocationAssistant, limits: &LimitsConfig) -> Router {
        router(
            AppState {
                assistant: Arc::new(assistant),
            },
            limits,
        )
    }

    fn configured() -> LocationAssistant {
        let provider = Arc::new(StaticProvider {
            places: vec![place("p1", "Test Restaurant 1"), place("p2", "Test Restaurant 2")],
            ..StaticProvider::default()
        });
        LocationAssistant::new(provider, &MapsConfig::default())
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    async fn read_json(response: Response) -> Value {
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        serde_json::from_slice(&body).expect("json parse")
    }

    #[tokio::test]
    async fn test_health_reports_provider() {
        let response = app(LocationAssistant::unconfigured(), &LimitsConfig::default())
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = read_json(response).await;
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["google_maps_configured"], false);
        assert!(json["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_search_missing_query() {
        let response = app(configured(), &LimitsConfig::default())
            .oneshot(post_json("/search", "{}"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = read_json(response).await;
        let body: ErrorBody = serde_json::from_value(json).unwrap();
        assert_eq!(body.error, "Missing query parameter");
    }

    #[tokio::test]
    async fn test_search_without_provider_is_unavailable() {
        let response = app(LocationAssistant::unconfigured(), &LimitsConfig::default())
            .oneshot(post_json("/search", r#"{"query": "restaurants"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let json = read_json(response).await;
        assert_eq!(json["error"], "Google Maps service not available");
    }

    #[tokio::test]
    async fn test_search_returns_summary_and_payload() {
        let response = app(configured(), &LimitsConfig::default())
            .oneshot(post_json(
                "/search",
                r#"{"query": "restaurants", "type": "restaurant"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = read_json(response).await;
        assert!(
            json["llm_response"]
                .as_str()
                .unwrap()
                .contains("I found 2 great options")
        );
        assert_eq!(json["places_data"]["success"], true);
        assert_eq!(json["places_data"]["results_count"], 2);
        assert_eq!(
            json["places_data"]["places"][0]["google_maps_url"],
            "https://www.google.com/maps/place/?q=place_id:p1"
        );
        assert_eq!(json["query_info"]["radius"], 5000);
        assert_eq!(json["query_info"]["type"], "restaurant");
    }

    #[tokio::test]
    async fn test_directions_missing_params() {
        let response = app(configured(), &LimitsConfig::default())
            .oneshot(post_json("/directions", r#"{"origin": "New York"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = read_json(response).await;
        assert_eq!(json["error"], "Missing origin or destination");
    }

    #[tokio::test]
    async fn test_directions_empty_routes() {
        let response = app(configured(), &LimitsConfig::default())
            .oneshot(post_json(
                "/directions",
                r#"{"origin": "New York, NY", "destination": "Boston, MA"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = read_json(response).await;
        assert_eq!(
            json,
            serde_json::json!({"success": false, "error": "No directions found"})
        );
    }

    #[tokio::test]
    async fn test_chat_missing_message() {
        let response = app(configured(), &LimitsConfig::default())
            .oneshot(post_json("/llm-chat", "{}"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = read_json(response).await;
        assert_eq!(json["error"], "Missing message parameter");
    }

    #[tokio::test]
    async fn test_chat_help_intent() {
        let response = app(configured(), &LimitsConfig::default())
            .oneshot(post_json("/llm-chat", r#"{"message": "hello"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = read_json(response).await;
        assert_eq!(json["type"], "help");
        assert!(json.get("data").is_none());
    }

    #[tokio::test]
    async fn test_chat_search_intent() {
        let response = app(configured(), &LimitsConfig::default())
            .oneshot(post_json(
                "/llm-chat",
                r#"{"message": "find restaurants near me"}"#,
            ))
            .await
            .unwrap();

        let json = read_json(response).await;
        assert_eq!(json["type"], "places");
        assert_eq!(json["data"]["query"], "find restaurants near me");
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let response = app(configured(), &LimitsConfig::default())
            .oneshot(post_json("/search", "{not json"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_rate_limit_exceeded() {
        let limits = LimitsConfig {
            chat_per_minute: 2,
            ..LimitsConfig::default()
        };
        let app = app(configured(), &limits);

        for _ in 0..2 {
            let response = app
                .clone()
                .oneshot(post_json("/llm-chat", r#"{"message": "hello"}"#))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let response = app
            .oneshot(post_json("/llm-chat", r#"{"message": "hello"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(response.headers().contains_key("retry-after"));
        let json = read_json(response).await;
        assert_eq!(json["error"], "Rate limit exceeded. Please try again later.");
    }
}
