use ropsdoc_core::{DocError, PreparedDocument};
use tracing::{info, warn};

pub mod image;
pub mod mime_detect;

pub use crate::image::{normalize_image, NormalizedImage, MAX_DIMENSION};
pub use mime_detect::{detect_mime_type, is_image, ALLOWED_EXTENSIONS, PDF_MIME};

/// Validate an uploaded file and turn it into a document ready for analysis.
///
/// Checks run locally, so a rejected upload never reaches a remote service.
/// PDFs are forwarded as-is; images must really be JPEG or PNG and are bounded
/// to `MAX_DIMENSION` pixels per side.
pub fn prepare_upload(filename: &str, bytes: &[u8]) -> Result<PreparedDocument, DocError> {
    let Some(label) = detect_mime_type(filename) else {
        warn!(filename, "Rejected upload with unsupported extension");
        return Err(DocError::UnsupportedFile(format!(
            "'{filename}' is not supported; allowed types are {}",
            ALLOWED_EXTENSIONS.join(", ")
        )));
    };

    if bytes.is_empty() {
        return Err(DocError::UnsupportedFile(format!("'{filename}' is empty")));
    }

    if !is_image(label) {
        if !bytes.starts_with(b"%PDF") {
            return Err(DocError::UnsupportedFile(format!("'{filename}' is not a PDF document")));
        }
        info!(filename, size = bytes.len(), "Prepared PDF upload");
        return Ok(PreparedDocument {
            filename: filename.to_string(),
            content_type: label,
            bytes: bytes.to_vec(),
        });
    }

    let normalized = normalize_image(bytes)?;
    if normalized.content_type != label {
        // The decoded format is what the service receives.
        warn!(filename, label, actual = normalized.content_type, "Image extension does not match its content");
    }
    info!(
        filename,
        size = normalized.bytes.len(),
        width = normalized.width,
        height = normalized.height,
        resized = normalized.resized,
        "Prepared image upload"
    );

    Ok(PreparedDocument {
        filename: filename.to_string(),
        content_type: normalized.content_type,
        bytes: normalized.bytes,
    })
}
