//! Keyword-based intent classification
//!
//! Classification is a fixed policy, not language understanding: keyword
//! groups are checked in priority order and the first group with a substring
//! match wins.

use crate::models::{Intent, Query};

const SEARCH_KEYWORDS: [&str; 4] = ["find", "search", "looking for", "where"];
const DIRECTIONS_KEYWORDS: [&str; 3] = ["directions", "how to get", "route"];

/// Marker preceding the location in a search message
const LOCATION_MARKER: &str = "in ";

pub const DIRECTIONS_HINT: &str =
    "To get directions, please use the format: 'Get directions from [origin] to [destination]'";

pub const HELP_TEXT: &str = "I can help you find places and get directions! Try asking me to 'find restaurants near me' or 'search for coffee shops in downtown'.";

pub struct IntentClassifier;

impl IntentClassifier {
    /// Classify a raw chat message
    #[must_use]
    pub fn classify(message: &str) -> Query {
        let lowered = message.to_lowercase();

        let (intent, location) = if contains_any(&lowered, &SEARCH_KEYWORDS) {
            (Intent::Search, extract_location(&lowered))
        } else if contains_any(&lowered, &DIRECTIONS_KEYWORDS) {
            (Intent::Directions, None)
        } else {
            (Intent::Help, None)
        };

        Query {
            text: message.to_string(),
            intent,
            location,
        }
    }
}

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| text.contains(keyword))
}

/// Everything after the last `"in "`, trimmed
///
/// The marker is matched as a plain substring, so it also fires inside words
/// such as "drive-in ".
fn extract_location(lowered: &str) -> Option<String> {
    lowered
        .rfind(LOCATION_MARKER)
        .map(|index| lowered[index + LOCATION_MARKER.len()..].trim().to_string())
}
