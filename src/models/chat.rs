//! Classified queries and conversational responses

use serde::{Deserialize, Serialize};

use super::SearchResponse;
use crate::{AssistantError, Result};

/// Classified purpose of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Search,
    Directions,
    Help,
}

/// A chat message after classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    /// Message as the user typed it
    pub text: String,
    pub intent: Intent,
    /// Lowercased area extracted from a search message
    pub location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.message.trim().is_empty() {
            return Err(AssistantError::validation("message"));
        }
        Ok(())
    }
}

/// Type tag of a chat response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatKind {
    Places,
    Instruction,
    Help,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatResponse {
    pub response: String,
    #[serde(rename = "type")]
    pub kind: ChatKind,
    /// Search payload behind a `places` answer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<SearchResponse>,
}

impl ChatResponse {
    pub fn text(kind: ChatKind, response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            kind,
            data: None,
        }
    }

    #[must_use]
    pub fn places(response: String, search: SearchResponse) -> Self {
        Self {
            response,
            kind: ChatKind::Places,
            data: Some(search),
        }
    }
}
