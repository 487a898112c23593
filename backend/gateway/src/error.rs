//! Mapping from pipeline errors to HTTP responses.

use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use ropsdoc_core::DocError;
use tracing::{error, warn};

/// Error returned by every API handler; renders as `{ "error": message }`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }
}

pub fn status_for(err: &DocError) -> StatusCode {
    match err {
        DocError::UnsupportedFile(_) | DocError::InvalidImage(_) => StatusCode::BAD_REQUEST,
        DocError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        DocError::NotFound(_) => StatusCode::NOT_FOUND,
        e if e.is_upstream() => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<DocError> for ApiError {
    fn from(err: DocError) -> Self {
        let status = status_for(&err);
        if status.is_server_error() {
            error!(error = %err, "Request failed");
        } else {
            warn!(error = %err, "Request rejected");
        }
        Self::new(status, err.to_string())
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        Self::new(err.status(), err.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(serde_json::json!({ "error": self.message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_error_taxonomy() {
        assert_eq!(status_for(&DocError::UnsupportedFile("x.gif".into())), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(&DocError::Validation("cnp".into())), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(status_for(&DocError::NotFound("r".into())), StatusCode::NOT_FOUND);
        assert_eq!(status_for(&DocError::Ocr("timeout".into())), StatusCode::BAD_GATEWAY);
        assert_eq!(
            status_for(&DocError::Llm { provider: "azure-openai".into(), message: "429".into() }),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_for(&DocError::MalformedLlmOutput("expected value".into())),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(status_for(&DocError::Storage("locked".into())), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(status_for(&DocError::Config("missing key".into())), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
