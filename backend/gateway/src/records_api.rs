//! Read-only access to saved records.

use axum::extract::{Path, Query, State};
use axum::Json;
use ropsdoc_core::{DocumentKind, DocumentRecord};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;
use crate::server::GatewayState;

pub const DEFAULT_LIMIT: usize = 20;
pub const MAX_LIMIT: usize = 100;

#[derive(Debug, Default, Deserialize)]
pub struct RecordsQuery {
    pub kind: Option<String>,
    pub limit: Option<usize>,
}

/// `GET /api/records?kind=&limit=`
pub async fn list_records(
    State(state): State<GatewayState>,
    Query(query): Query<RecordsQuery>,
) -> Result<Json<Vec<DocumentRecord>>, ApiError> {
    let kind = match query.kind.as_deref().map(str::trim) {
        None | Some("") | Some("all") => None,
        Some(tag) => Some(tag.parse::<DocumentKind>()?),
    };
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    Ok(Json(state.processor.recent_records(kind, limit).await?))
}

/// `GET /api/records/:id`
pub async fn get_record(
    State(state): State<GatewayState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DocumentRecord>, ApiError> {
    Ok(Json(state.processor.record(id).await?))
}
