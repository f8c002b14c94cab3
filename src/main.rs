use std::sync::Arc;

use anyhow::Result;
use wayfinder::{LocationAssistant, WayfinderConfig, logging, web};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = WayfinderConfig::load()?;
    logging::init(&config.logging)?;

    let assistant = Arc::new(LocationAssistant::from_config(&config.maps));
    tracing::info!(
        "Starting Wayfinder {} on port {}",
        wayfinder::VERSION,
        config.server.port
    );
    tracing::info!(
        "Google Maps API configured: {}",
        assistant.health().provider_configured
    );

    web::run(&config, assistant).await
}
