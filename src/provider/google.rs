//! Google Maps web services client
//!
//! Implements [`GeoProvider`] over the geocoding, places and directions JSON
//! endpoints. Every call is a single attempt; failures are reported to the
//! caller as provider errors.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, instrument, warn};

use super::{GeoProvider, GeocodeCandidate, PlaceRecord, RouteRecord};
use crate::config::MapsConfig;
use crate::{AssistantError, Coordinate, Result};

/// Response wrapper shared by all Google Maps JSON endpoints
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    status: String,
    #[serde(default = "Vec::new", alias = "routes")]
    results: Vec<T>,
    error_message: Option<String>,
}

impl<T> Envelope<T> {
    /// `OK` and `ZERO_RESULTS` are successes, any other status is an error
    fn into_results(self, endpoint: &str) -> Result<Vec<T>> {
        match self.status.as_str() {
            "OK" | "ZERO_RESULTS" => Ok(self.results),
            status => {
                let detail = self
                    .error_message
                    .map(|message| format!(" ({message})"))
                    .unwrap_or_default();
                Err(AssistantError::provider(format!(
                    "{endpoint} request failed with status {status}{detail}"
                )))
            }
        }
    }
}

/// Google Maps API client
pub struct GoogleMapsClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GoogleMapsClient {
    /// Create a new client
    ///
    /// Fails with a configuration error when no usable API key is set.
    pub fn new(config: &MapsConfig) -> Result<Self> {
        let api_key = config
            .credentials()
            .ok_or_else(|| AssistantError::configuration("Google Maps API key is not set"))?
            .to_string();

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(concat!("Wayfinder/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                AssistantError::configuration(format!("Failed to create HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint_url(&self, path: &str, params: &[(&str, &str)]) -> String {
        let mut url = format!(
            "{}/{}/json?key={}",
            self.base_url,
            path,
            urlencoding::encode(&self.api_key)
        );
        for (name, value) in params {
            url.push('&');
            url.push_str(name);
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }
        url
    }

    /// Issue a GET against `path` and unwrap the status envelope
    #[instrument(skip(self, params), level = "debug")]
    async fn fetch<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<Vec<T>> {
        let url = self.endpoint_url(path, params);
        let start_time = Instant::now();

        // The request URL carries the API key, keep it out of errors and logs
        let response = self.client.get(&url).send().await.map_err(|e| {
            let e = e.without_url();
            warn!("Network error calling {}: {}", path, e);
            AssistantError::from(e)
        })?;

        let status = response.status();
        debug!(
            "HTTP response received: {} in {:.3}s",
            status,
            start_time.elapsed().as_secs_f64()
        );

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            error!("Maps API authentication failed (HTTP {})", status.as_u16());
            return Err(AssistantError::provider(
                "Maps API rejected the request. Please check the API key.",
            ));
        }
        if !status.is_success() {
            return Err(AssistantError::provider(format!(
                "{path} request failed with status: {} - {}",
                status,
                status.canonical_reason().unwrap_or("Unknown error")
            )));
        }

        let envelope: Envelope<T> = response.json().await.map_err(|e| {
            let e = e.without_url();
            error!("Failed to parse {} response: {}", path, e);
            AssistantError::from(e)
        })?;
        let results = envelope.into_results(path)?;

        info!(
            "{} returned {} results in {:.3}s",
            path,
            results.len(),
            start_time.elapsed().as_secs_f64()
        );
        Ok(results)
    }
}

#[async_trait]
impl GeoProvider for GoogleMapsClient {
    #[instrument(skip(self))]
    async fn geocode(&self, text: &str) -> Result<Vec<GeocodeCandidate>> {
        self.fetch("geocode", &[("address", text)]).await
    }

    #[instrument(skip(self))]
    async fn nearby_search(
        &self,
        center: Coordinate,
        radius_meters: u32,
        keyword: &str,
        place_type: Option<&str>,
    ) -> Result<Vec<PlaceRecord>> {
        let location = center.to_query_param();
        let radius = radius_meters.to_string();
        let mut params = vec![
            ("location", location.as_str()),
            ("radius", radius.as_str()),
            ("keyword", keyword),
        ];
        if let Some(place_type) = place_type {
            params.push(("type", place_type));
        }
        self.fetch("place/nearbysearch", &params).await
    }

    #[instrument(skip(self))]
    async fn text_search(
        &self,
        query: &str,
        region: &str,
        language: &str,
    ) -> Result<Vec<PlaceRecord>> {
        self.fetch(
            "place/textsearch",
            &[("query", query), ("region", region), ("language", language)],
        )
        .await
    }

    #[instrument(skip(self))]
    async fn directions(
        &self,
        origin: &str,
        destination: &str,
        mode: &str,
        language: &str,
    ) -> Result<Vec<RouteRecord>> {
        self.fetch(
            "directions",
            &[
                ("origin", origin),
                ("destination", destination),
                ("mode", mode),
                ("language", language),
            ],
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SearchRequest;
    use crate::places::PlaceSearchEngine;
    use axum::{Router, http::StatusCode as HttpStatus, routing::get};
    use std::net::SocketAddr;
    use std::sync::Arc;
    use tokio::net::TcpListener;

    const SECRET: &str = "SECRET-KEY-123";

    fn client_for(addr: SocketAddr) -> GoogleMapsClient {
        GoogleMapsClient::new(&MapsConfig {
            api_key: Some(SECRET.to_string()),
            base_url: format!("http://{addr}"),
            timeout_seconds: 5,
            ..MapsConfig::default()
        })
        .unwrap()
    }

    /// Serve canned Maps responses on an ephemeral local port
    async fn maps_stub() -> SocketAddr {
        let app = Router::new()
            .route("/forbidden/json", get(|| async { HttpStatus::FORBIDDEN }))
            .route(
                "/broken/json",
                get(|| async { HttpStatus::INTERNAL_SERVER_ERROR }),
            )
            .route("/garbage/json", get(|| async { "{not json" }))
            .route(
                "/place/textsearch/json",
                get(|| async {
                    axum::Json(serde_json::json!({"status": "ZERO_RESULTS", "results": []}))
                }),
            );
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    #[tokio::test]
    async fn test_fetch_forbidden_is_auth_error() {
        let client = client_for(maps_stub().await);
        let err = client
            .fetch::<PlaceRecord>("forbidden", &[])
            .await
            .unwrap_err();

        assert_eq!(err.kind(), crate::ErrorKind::Provider);
        assert!(err.to_string().contains("Please check the API key"));
        assert!(!err.to_string().contains(SECRET));
    }

    #[tokio::test]
    async fn test_fetch_server_error_reports_status() {
        let client = client_for(maps_stub().await);
        let err = client.fetch::<PlaceRecord>("broken", &[]).await.unwrap_err();

        assert_eq!(err.kind(), crate::ErrorKind::Provider);
        assert!(err.to_string().contains("500"));
    }

    #[tokio::test]
    async fn test_fetch_malformed_body() {
        let client = client_for(maps_stub().await);
        let err = client.fetch::<PlaceRecord>("garbage", &[]).await.unwrap_err();

        assert_eq!(err.kind(), crate::ErrorKind::Provider);
        assert!(err.to_string().contains("malformed provider response"));
        assert!(!err.to_string().contains(SECRET));
    }

    #[tokio::test]
    async fn test_fetch_zero_results_is_empty() {
        let client = client_for(maps_stub().await);
        let places = client.text_search("coffee", "US", "en").await.unwrap();
        assert!(places.is_empty());
    }

    #[tokio::test]
    async fn test_transport_error_hides_api_key() {
        let addr = {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap()
        };
        let engine = PlaceSearchEngine::new(Arc::new(client_for(addr)), "US", "en");

        let response = engine.search(&SearchRequest::new("coffee")).await;
        let json = serde_json::to_string(&response).unwrap();

        assert!(!response.success);
        assert!(!json.contains(SECRET));
    }

    fn client() -> GoogleMapsClient {
        GoogleMapsClient::new(&MapsConfig {
            api_key: Some("test-key".to_string()),
            base_url: "https://maps.example.com/api/".to_string(),
            ..MapsConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_new_requires_credentials() {
        let err = GoogleMapsClient::new(&MapsConfig::default()).err().unwrap();
        assert!(matches!(err, AssistantError::Configuration { .. }));
    }

    #[test]
    fn test_endpoint_url_encodes_params() {
        let url = client().endpoint_url("geocode", &[("address", "Denver, CO")]);
        assert_eq!(
            url,
            "https://maps.example.com/api/geocode/json?key=test-key&address=Denver%2C%20CO"
        );
    }

    #[test]
    fn test_envelope_statuses() {
        let ok: Envelope<PlaceRecord> =
            serde_json::from_str(r#"{"status": "OK", "results": [{"name": "A"}]}"#).unwrap();
        assert_eq!(ok.into_results("place/textsearch").unwrap().len(), 1);

        let empty: Envelope<PlaceRecord> =
            serde_json::from_str(r#"{"status": "ZERO_RESULTS", "results": []}"#).unwrap();
        assert!(empty.into_results("place/textsearch").unwrap().is_empty());

        let denied: Envelope<PlaceRecord> = serde_json::from_str(
            r#"{"status": "REQUEST_DENIED", "error_message": "The provided API key is invalid."}"#,
        )
        .unwrap();
        let err = denied.into_results("place/textsearch").unwrap_err();
        assert!(err.to_string().contains("REQUEST_DENIED"));
        assert!(err.to_string().contains("API key is invalid"));
    }

    #[test]
    fn test_envelope_reads_directions_routes() {
        let routes: Envelope<RouteRecord> =
            serde_json::from_str(r#"{"status": "OK", "routes": [{"legs": []}]}"#).unwrap();
        assert_eq!(routes.into_results("directions").unwrap().len(), 1);
    }
}
