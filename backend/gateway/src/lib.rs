//! ropsdoc Gateway HTTP Server
//!
//! Serves the browser UI and the JSON API for uploading, reviewing, and saving
//! document extractions.

pub mod control_ui;
pub mod error;
pub mod health_api;
pub mod pending;
pub mod records_api;
pub mod server;
pub mod uploads;

pub use error::ApiError;
pub use health_api::HealthReport;
pub use pending::{PendingEntry, PendingExtraction, PendingRegistry};
pub use server::{build_router, start_server, GatewayState};
