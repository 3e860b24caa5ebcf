//! OpenVehicleAnalytics Server
//!
//! Main server application with REST API and telemetry stream

use anyhow::Result;
use ova_server::{api, sampler, state};
use std::net::SocketAddr;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Starting OpenVehicleAnalytics Server");

    // Fit the initial model bundle; fatal if it fails.
    let state = state::AppState::new()?;

    // Build the router
    let app = api::create_router(state.clone());

    // Start the telemetry sampler in background
    tokio::spawn(sampler::run(state.clone()));

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], 9200));
    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
