//! Natural-language rendering of search and directions results

use std::fmt::Write;

use crate::{DirectionsResponse, PlaceResult, SearchResponse};

/// Places listed in a search answer
const LISTED_PLACES: usize = 5;
/// Steps listed in a directions answer
const LISTED_STEPS: usize = 5;

const UNKNOWN_NAME: &str = "Unknown";
const NO_ADDRESS: &str = "Address not available";

pub struct ResponseFormatter;

impl ResponseFormatter {
    /// Render a search outcome as a chat answer
    #[must_use]
    pub fn format(query: &str, response: &SearchResponse) -> String {
        if !response.success {
            return format!(
                "I'm sorry, I couldn't find any results for '{query}'. Please try a different search term or location."
            );
        }

        let places = response.places();
        if places.is_empty() {
            return format!(
                "I couldn't find any places matching '{query}'. You might want to try a broader search or different location."
            );
        }

        let mut text = format!("I found {} great options for '{query}':\n\n", places.len());
        for (rank, place) in places.iter().take(LISTED_PLACES).enumerate() {
            write_place(&mut text, rank + 1, place);
        }
        text.push_str(
            "You can click on any of the Google Maps links above to get directions and more details!",
        );
        text
    }

    /// Render a directions outcome as a chat answer
    #[must_use]
    pub fn format_directions(response: &DirectionsResponse) -> String {
        let Some(route) = response.route.as_ref().filter(|_| response.success) else {
            return format!(
                "Directions failed: {}",
                response.error.as_deref().unwrap_or("Unknown error")
            );
        };

        let from = route.start_address.as_deref().unwrap_or(&route.origin);
        let to = route.end_address.as_deref().unwrap_or(&route.destination);

        let mut text = format!("🗺️ **Directions from {from} to {to}**\n\n");
        let _ = writeln!(text, "🚗 **Mode:** {}", title_case(&route.mode));
        if let Some(distance) = &route.distance {
            let _ = writeln!(text, "📏 **Distance:** {distance}");
        }
        if let Some(duration) = &route.duration {
            let _ = writeln!(text, "⏰ **Duration:** {duration}");
        }
        let _ = write!(
            text,
            "\n🔗 [Open in Google Maps]({})\n",
            route.google_maps_url
        );

        if !route.steps.is_empty() {
            text.push_str("\n**Turn-by-turn directions:**\n");
            for (number, step) in route.steps.iter().take(LISTED_STEPS).enumerate() {
                let _ = writeln!(text, "{}. {step}", number + 1);
            }
        }
        text
    }
}

fn write_place(text: &mut String, rank: usize, place: &PlaceResult) {
    let name = if place.name.is_empty() {
        UNKNOWN_NAME
    } else {
        &place.name
    };
    let _ = writeln!(text, "{rank}. **{name}**");
    // Unrated places come back as 0 from some endpoints
    if let Some(rating) = place.rating.filter(|rating| *rating > 0.0) {
        let _ = writeln!(text, "   ⭐ Rating: {rating:?}/5");
    }
    let _ = writeln!(
        text,
        "   📍 {}",
        place.address.as_deref().unwrap_or(NO_ADDRESS)
    );
    let _ = writeln!(
        text,
        "   🔗 [View on Google Maps]({})\n",
        place.google_maps_url
    );
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
