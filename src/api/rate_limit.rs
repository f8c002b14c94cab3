//! Per-client request limiting for API routes

use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    Json,
    extract::{ConnectInfo, Request, State},
    http::{HeaderValue, StatusCode, header::RETRY_AFTER},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tokio::sync::Mutex;
use tracing::warn;

const WINDOW: Duration = Duration::from_secs(60);

/// Sliding request window, one minute unless overridden
#[derive(Debug)]
pub struct RateLimiter {
    /// Maximum requests per window
    max_requests: u32,
    window: Duration,
    /// Request timestamps within the current window
    request_times: Vec<Instant>,
}

impl RateLimiter {
    /// Create a new rate limiter
    pub fn new(max_requests_per_minute: u32) -> Self {
        Self::with_window(max_requests_per_minute, WINDOW)
    }

    pub fn with_window(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            request_times: Vec::new(),
        }
    }

    /// Check if a request is allowed and record it
    pub fn allow_request(&mut self) -> bool {
        self.cleanup_old_requests();

        if self.request_times.len() >= self.max_requests as usize {
            false
        } else {
            self.request_times.push(Instant::now());
            true
        }
    }

    /// Get time until next request is allowed
    pub fn time_until_next_request(&mut self) -> Duration {
        self.cleanup_old_requests();

        if self.request_times.len() < self.max_requests as usize {
            return Duration::ZERO;
        }
        self.request_times
            .first()
            .map_or(Duration::ZERO, |oldest| {
                self.window.saturating_sub(oldest.elapsed())
            })
    }

    /// True once every recorded request has left the window
    pub fn is_idle(&mut self) -> bool {
        self.cleanup_old_requests();
        self.request_times.is_empty()
    }

    fn cleanup_old_requests(&mut self) {
        let window = self.window;
        self.request_times.retain(|time| time.elapsed() < window);
    }
}

/// Limiter state for one route, keyed by client address
#[derive(Debug, Clone)]
pub struct RouteLimit {
    max_requests: u32,
    window: Duration,
    clients: Arc<Mutex<HashMap<IpAddr, RateLimiter>>>,
}

impl RouteLimit {
    #[must_use]
    pub fn per_minute(max_requests_per_minute: u32) -> Self {
        Self::with_window(max_requests_per_minute, WINDOW)
    }

    #[must_use]
    pub fn with_window(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            clients: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Record a request from `client`, or return how long it must wait
    ///
    /// Clients with no requests left in the window are dropped first so the
    /// map only holds recently active addresses.
    pub async fn check(&self, client: IpAddr) -> Result<(), Duration> {
        let mut clients = self.clients.lock().await;
        clients.retain(|_, limiter| !limiter.is_idle());

        let limiter = clients
            .entry(client)
            .or_insert_with(|| RateLimiter::with_window(self.max_requests, self.window));
        if limiter.allow_request() {
            Ok(())
        } else {
            Err(limiter.time_until_next_request())
        }
    }

    #[cfg(test)]
    async fn tracked_clients(&self) -> usize {
        self.clients.lock().await.len()
    }
}

/// Reject requests over the route's per-client budget with 429
pub async fn enforce_rate_limit(
    State(limit): State<RouteLimit>,
    req: Request,
    next: Next,
) -> Response {
    // Requests without connection info (e.g. in-process calls) share one bucket
    let client = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED), |info| info.0.ip());

    if let Err(wait) = limit.check(client).await {
        warn!("Rate limit exceeded for {} on {}", client, req.uri().path());

        let mut response = (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({"error": "Rate limit exceeded. Please try again later."})),
        )
            .into_response();
        if let Ok(value) = HeaderValue::from_str(&wait.as_secs().max(1).to_string()) {
            response.headers_mut().insert(RETRY_AFTER, value);
        }
        return response;
    }

    next.run(req).await
}
