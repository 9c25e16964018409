/*
 * Curvequote - Bonding-curve quote service
 * Main entry point for the application
 */

use anyhow::Context;
use curvequote::{
    api,
    config::{Config, LogFormat, ServerConfig},
    metrics::Metrics,
    service::QuoteService,
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[rocket::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;
    init_tracing(&config.server);

    info!("Starting Curvequote service");

    let metrics = Arc::new(Metrics::new()?);
    let quote_service = QuoteService::connect(&config, metrics.clone())
        .await
        .context("Failed to initialize quote service")?;

    let api_state = api::ApiState {
        quote_service: Arc::new(quote_service),
        metrics,
    };

    info!("Starting API server on {}:{}", config.server.host, config.server.port);

    let rocket = api::create_configured_rocket(api_state, &config.server);
    rocket
        .launch()
        .await
        .map_err(|e| anyhow::anyhow!("API server failed: {e}"))?;

    Ok(())
}

fn init_tracing(server: &ServerConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("curvequote={}", server.log_level).into());

    let registry = tracing_subscriber::registry().with(filter);
    match server.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}
