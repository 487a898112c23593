//! Processing Event Logger
//!
//! Structured pipeline events (upload, analysis, refinement, save, failure)
//! emitted through `tracing` under the `processing_events` target, so the
//! JSON file layer writes them as NDJSON.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::redact::{mask_cnp, redact_sensitive_data};

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProcessingEvent {
    UploadAccepted {
        filename: String,
        content_type: String,
        size: usize,
    },
    Analyzed {
        model: String,
        latency_ms: u64,
        text_len: usize,
    },
    Refined {
        provider: String,
        step: String,
        latency_ms: u64,
    },
    Saved {
        record_id: String,
        /// Masked before logging.
        cnp: String,
    },
    Failed {
        stage: String,
        error_msg: String,
    },
}

#[derive(Debug, Serialize)]
pub struct EventLogEntry {
    pub extraction_id: String,
    pub kind: String,
    pub timestamp: DateTime<Utc>,
    pub event: ProcessingEvent,
}

pub struct ProcessingEventLogger;

impl ProcessingEventLogger {
    /// Build the log entry for an event, scrubbing free-form strings.
    pub fn entry(extraction_id: &str, kind: &str, mut event: ProcessingEvent) -> EventLogEntry {
        match &mut event {
            ProcessingEvent::UploadAccepted { filename, .. } => {
                *filename = redact_sensitive_data(filename);
            }
            ProcessingEvent::Failed { error_msg, .. } => {
                *error_msg = redact_sensitive_data(error_msg);
            }
            ProcessingEvent::Saved { cnp, .. } => {
                *cnp = mask_cnp(cnp);
            }
            ProcessingEvent::Analyzed { .. } | ProcessingEvent::Refined { .. } => {}
        }

        EventLogEntry {
            extraction_id: extraction_id.into(),
            kind: kind.into(),
            timestamp: Utc::now(),
            event,
        }
    }

    /// Logs a processing event, immediately serializing it to the tracing system.
    pub fn log_event(extraction_id: &str, kind: &str, event: ProcessingEvent) {
        let entry = Self::entry(extraction_id, kind, event);
        let json = serde_json::to_string(&entry).unwrap_or_default();
        info!(target: "processing_events", event = %json, "Document processing event");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_messages_are_redacted() {
        let entry = ProcessingEventLogger::entry(
            "abc",
            "id_card",
            ProcessingEvent::Failed {
                stage: "save".into(),
                error_msg: "duplicate cnp 1800101221144".into(),
            },
        );
        assert_eq!(
            entry.event,
            ProcessingEvent::Failed {
                stage: "save".into(),
                error_msg: "duplicate cnp [REDACTED_CNP]".into(),
            }
        );
    }

    #[test]
    fn saved_cnp_is_masked() {
        let entry = ProcessingEventLogger::entry(
            "abc",
            "id_card",
            ProcessingEvent::Saved { record_id: "r1".into(), cnp: "1800101221144".into() },
        );
        assert_eq!(
            entry.event,
            ProcessingEvent::Saved { record_id: "r1".into(), cnp: "1**********44".into() }
        );
    }

    #[test]
    fn serializes_with_type_tag() {
        let entry = ProcessingEventLogger::entry(
            "abc",
            "handwritten",
            ProcessingEvent::Refined { provider: "azure-openai".into(), step: "clean_text".into(), latency_ms: 12 },
        );
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["event"]["type"], "refined");
        assert_eq!(json["event"]["step"], "clean_text");
        assert_eq!(json["kind"], "handwritten");
    }
}
