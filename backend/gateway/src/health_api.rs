//! Gateway Health API

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::server::GatewayState;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    /// `None` when the record store could not be queried.
    pub record_count: Option<usize>,
    pub pending_extractions: usize,
    pub analyzer: String,
    pub llm_provider: String,
    pub timestamp: DateTime<Utc>,
}

/// Handler for `GET /api/health`
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthReport> {
    let record_count = match state.processor.record_count().await {
        Ok(count) => Some(count),
        Err(e) => {
            warn!(error = %e, "Health check could not count records");
            None
        }
    };

    Json(HealthReport {
        status: if record_count.is_some() { "ok" } else { "degraded" }.into(),
        version: env!("CARGO_PKG_VERSION").into(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        record_count,
        pending_extractions: state.pending.len().await,
        analyzer: state.processor.analyzer_name().into(),
        llm_provider: state.processor.llm_provider_name().into(),
        timestamp: Utc::now(),
    })
}
