//! Scheduling Gateway Library
//!
//! HTTP REST API over the embedded scheduling service.

pub mod config;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use std::net::SocketAddr;

use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::GatewayConfig;
use crate::routes::create_router;
use crate::state::AppState;

/// Build the application with a fresh in-memory scheduling service.
///
/// Must be called inside a Tokio runtime when notifications are enabled.
pub fn build_app(config: GatewayConfig) -> Router {
    let scheduler = scheduling_service_lib::start_embedded(config.scheduling);
    let state = AppState::new(scheduler);

    create_router(state).layer(TraceLayer::new_for_http())
}

/// Run the HTTP server with the given configuration.
pub async fn run_server(config: GatewayConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let app = build_app(config);

    info!("Gateway listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
