mod analysis;
mod analysis_client;
mod config;
mod errors;
mod intake;
mod models;
mod preferences;
mod routes;
mod state;
mod workflow;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis_client::HttpAnalysisClient;
use crate::config::Config;
use crate::preferences::ThemePreference;
use crate::routes::build_router;
use crate::state::AppState;
use crate::workflow::WorkflowController;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting JobIntel v{}", env!("CARGO_PKG_VERSION"));

    let client = HttpAnalysisClient::new(config.service_url.clone(), config.request_timeout)
        .context("Failed to build analysis service client")?;
    info!(
        "Analysis service: {} (timeout: {:?})",
        client.base_url(),
        config.request_timeout
    );
    info!("Match scores displayed as {:?}", config.score_scale);

    let workflow = WorkflowController::new(Arc::new(client), config.service_url.clone());
    let theme = ThemePreference::init(config.theme);

    let state = AppState {
        workflow,
        theme,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
