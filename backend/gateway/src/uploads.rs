//! Upload and save endpoints for both document kinds.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use ropsdoc_core::{DocumentKind, DocumentRecord};
use ropsdoc_pipeline::{HandwrittenExtraction, IdCardExtraction};
use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;
use crate::pending::PendingExtraction;
use crate::server::GatewayState;

/// Multipart field carrying the document.
pub const FILE_FIELD: &str = "file";

struct Upload {
    filename: String,
    bytes: Vec<u8>,
}

async fn read_upload(mut multipart: Multipart) -> Result<Upload, ApiError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let filename = field
            .file_name()
            .map(str::to_string)
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| ApiError::bad_request("the uploaded file has no name"))?;
        let bytes = field.bytes().await?;
        info!(filename = %filename, size = bytes.len(), "Received upload");
        return Ok(Upload { filename, bytes: bytes.to_vec() });
    }
    Err(ApiError::bad_request(format!("missing multipart field '{FILE_FIELD}'")))
}

/// `POST /api/id-cards`
pub async fn upload_id_card(
    State(state): State<GatewayState>,
    multipart: Multipart,
) -> Result<Json<IdCardExtraction>, ApiError> {
    let upload = read_upload(multipart).await?;
    let extraction = state.processor.process_id_card(&upload.filename, &upload.bytes).await?;
    state.pending.insert(PendingExtraction::IdCard(extraction.clone())).await;
    Ok(Json(extraction))
}

/// `POST /api/handwritten`
pub async fn upload_handwritten(
    State(state): State<GatewayState>,
    multipart: Multipart,
) -> Result<Json<HandwrittenExtraction>, ApiError> {
    let upload = read_upload(multipart).await?;
    let extraction = state.processor.process_handwritten(&upload.filename, &upload.bytes).await?;
    state.pending.insert(PendingExtraction::Handwritten(extraction.clone())).await;
    Ok(Json(extraction))
}

/// `POST /api/id-cards/:extraction_id/save`
pub async fn save_id_card(
    State(state): State<GatewayState>,
    Path(extraction_id): Path<Uuid>,
) -> Result<(StatusCode, Json<DocumentRecord>), ApiError> {
    save(&state, extraction_id, DocumentKind::IdCard).await
}

/// `POST /api/handwritten/:extraction_id/save`
pub async fn save_handwritten(
    State(state): State<GatewayState>,
    Path(extraction_id): Path<Uuid>,
) -> Result<(StatusCode, Json<DocumentRecord>), ApiError> {
    save(&state, extraction_id, DocumentKind::Handwritten).await
}

async fn save(
    state: &GatewayState,
    extraction_id: Uuid,
    kind: DocumentKind,
) -> Result<(StatusCode, Json<DocumentRecord>), ApiError> {
    let pending = state
        .pending
        .take(extraction_id, kind)
        .await
        .ok_or_else(|| ApiError::not_found(format!("no pending {kind} extraction {extraction_id}")))?;

    let result = match &pending.extraction {
        PendingExtraction::IdCard(extraction) => state.processor.save_id_card(extraction).await,
        PendingExtraction::Handwritten(extraction) => state.processor.save_handwritten(extraction).await,
    };

    match result {
        Ok(record) => Ok((StatusCode::CREATED, Json(record))),
        // Rejected extractions can never succeed; drop them.
        Err(err) if err.is_rejection() => Err(err.into()),
        Err(err) => {
            state.pending.restore(pending).await;
            Err(err.into())
        }
    }
}
