use thiserror::Error;

/// Top-level error type for the document processing pipeline.
#[derive(Debug, Error)]
pub enum DocError {
    #[error("unsupported file: {0}")]
    UnsupportedFile(String),

    #[error("invalid image: {0}")]
    InvalidImage(String),

    #[error("document analysis failed: {0}")]
    Ocr(String),

    #[error("LLM provider error ({provider}): {message}")]
    Llm { provider: String, message: String },

    #[error("LLM response is not valid JSON: {0}")]
    MalformedLlmOutput(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DocError {
    /// True when the failure came from one of the external cloud services.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            DocError::Ocr(_) | DocError::Llm { .. } | DocError::MalformedLlmOutput(_)
        )
    }

    /// True when the caller supplied something the pipeline refuses to handle.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            DocError::UnsupportedFile(_) | DocError::InvalidImage(_) | DocError::Validation(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_upstream_and_rejections() {
        assert!(DocError::Ocr("timeout".into()).is_upstream());
        assert!(DocError::Llm { provider: "azure-openai".into(), message: "429".into() }.is_upstream());
        assert!(!DocError::Storage("locked".into()).is_upstream());

        assert!(DocError::UnsupportedFile("notes.docx".into()).is_rejection());
        assert!(!DocError::NotFound("x".into()).is_rejection());
    }

    #[test]
    fn wraps_anyhow_transparently() {
        let err: DocError = anyhow::anyhow!("socket closed").into();
        assert_eq!(err.to_string(), "socket closed");
    }
}
