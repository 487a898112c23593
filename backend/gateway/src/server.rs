//! Main HTTP Gateway Server.

use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, instrument};

use ropsdoc_pipeline::DocumentProcessor;

use crate::pending::PendingRegistry;
use crate::{control_ui, health_api, records_api, uploads};

/// Application state shared across routes.
#[derive(Clone)]
pub struct GatewayState {
    pub processor: Arc<DocumentProcessor>,
    pub pending: PendingRegistry,
    pub started_at: Instant,
    pub max_upload_bytes: usize,
}

impl GatewayState {
    pub fn new(processor: Arc<DocumentProcessor>, pending_ttl: Duration, max_upload_bytes: usize) -> Self {
        Self {
            processor,
            pending: PendingRegistry::new(pending_ttl),
            started_at: Instant::now(),
            max_upload_bytes,
        }
    }
}

/// Build the application router with all routes and layers.
pub fn build_router(state: GatewayState) -> Router {
    let body_limit = DefaultBodyLimit::max(state.max_upload_bytes);

    Router::new()
        // Document endpoints
        .route("/api/id-cards", post(uploads::upload_id_card))
        .route("/api/id-cards/:extraction_id/save", post(uploads::save_id_card))
        .route("/api/handwritten", post(uploads::upload_handwritten))
        .route("/api/handwritten/:extraction_id/save", post(uploads::save_handwritten))
        .route("/api/records", get(records_api::list_records))
        .route("/api/records/:id", get(records_api::get_record))
        .route("/api/health", get(health_api::get_health))
        // Browser UI
        .merge(control_ui::ui_router())
        .layer(body_limit)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Starts the HTTP server and runs until Ctrl-C.
#[instrument(skip(state))]
pub async fn start_server(addr: SocketAddr, state: GatewayState) -> Result<()> {
    let app = build_router(state);

    let listener = TcpListener::bind(&addr).await?;
    info!("Gateway HTTP server listening on {}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Gateway HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
