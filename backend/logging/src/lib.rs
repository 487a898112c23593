//! Telemetry and structured logging components for ropsdoc.
//!
//! Handles log redaction, JSON output generation, file rotation, and document processing event logging.

pub mod event_logger;
pub mod logger;
pub mod redact;

pub use event_logger::{EventLogEntry, ProcessingEvent, ProcessingEventLogger};
pub use logger::init_logger;
pub use redact::{mask_cnp, redact_sensitive_data};
