//! MIME type labelling for uploaded documents.
//!
//! Uploads are labelled by extension before their content is inspected.
//! Only the types the analysis service accepts get a label.

use std::path::Path;

pub const PDF_MIME: &str = "application/pdf";

/// Extensions accepted by the upload handler.
pub const ALLOWED_EXTENSIONS: &[&str] = &["pdf", "jpg", "jpeg", "png"];

/// Lowercased extension of a filename, empty when there is none.
pub fn extension_of(filename: &str) -> String {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// MIME label for an accepted upload, `None` for anything else.
pub fn detect_mime_type(filename: &str) -> Option<&'static str> {
    match extension_of(filename).as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "pdf" => Some(PDF_MIME),
        _ => None,
    }
}

pub fn is_image(mime: &str) -> bool {
    mime.starts_with("image/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_accepted_types() {
        assert_eq!(detect_mime_type("scan.JPG"), Some("image/jpeg"));
        assert_eq!(detect_mime_type("scan.jpeg"), Some("image/jpeg"));
        assert_eq!(detect_mime_type("poza.png"), Some("image/png"));
        assert_eq!(detect_mime_type("BULETIN.PDF"), Some(PDF_MIME));
    }

    #[test]
    fn other_types_have_no_label() {
        assert_eq!(detect_mime_type("photo.heic"), None);
        assert_eq!(detect_mime_type("notes.docx"), None);
        assert_eq!(detect_mime_type("noextension"), None);
    }

    #[test]
    fn every_allowed_extension_has_a_label() {
        for ext in ALLOWED_EXTENSIONS {
            assert!(detect_mime_type(&format!("a.{ext}")).is_some());
        }
        assert!(detect_mime_type("a.gif").is_none());
        assert!(detect_mime_type("png").is_none());
    }

    #[test]
    fn image_labels() {
        assert!(is_image("image/png"));
        assert!(!is_image(PDF_MIME));
    }
}
