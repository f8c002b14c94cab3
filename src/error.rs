//! Error types and handling for the `Wayfinder` pipeline

use thiserror::Error;

/// Failure categories surfaced at the pipeline boundaries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Provider client unavailable, e.g. missing credentials
    Configuration,
    /// Empty geocode or empty route list
    NotFound,
    /// Transport failure or unexpected provider payload
    Provider,
    /// Missing required request field
    Validation,
}

/// Main error type for the `Wayfinder` application
#[derive(Error, Debug)]
pub enum AssistantError {
    /// Provider is not configured
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Nothing matched the lookup
    #[error("{message}")]
    NotFound { message: String },

    /// Provider communication errors
    #[error("Provider error: {message}")]
    Provider { message: String },

    /// A required field was missing or blank
    #[error("Missing required field: {field}")]
    Validation { field: &'static str },
}

impl AssistantError {
    /// Create a new configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a new not-found error
    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// The geocoder returned no candidates for `location`
    pub fn location_not_found(location: &str) -> Self {
        Self::not_found(format!("Could not find location: {location}"))
    }

    /// Create a new provider error
    pub fn provider<S: Into<String>>(message: S) -> Self {
        Self::Provider {
            message: message.into(),
        }
    }

    /// Create a new validation error for `field`
    #[must_use]
    pub fn validation(field: &'static str) -> Self {
        Self::Validation { field }
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration { .. } => ErrorKind::Configuration,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Provider { .. } => ErrorKind::Provider,
            Self::Validation { .. } => ErrorKind::Validation,
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            AssistantError::Configuration { .. } => {
                "Google Maps service not available".to_string()
            }
            AssistantError::NotFound { message } => message.clone(),
            AssistantError::Provider { .. } => {
                "Unable to reach the maps provider. Please try again later.".to_string()
            }
            AssistantError::Validation { field } => format!("Missing {field} parameter"),
        }
    }
}

impl From<reqwest::Error> for AssistantError {
    fn from(err: reqwest::Error) -> Self {
        let err = err.without_url();
        if err.is_timeout() {
            Self::provider(format!("request timed out: {err}"))
        } else if err.is_decode() {
            Self::provider(format!("malformed provider response: {err}"))
        } else {
            Self::provider(err.to_string())
        }
    }
}
