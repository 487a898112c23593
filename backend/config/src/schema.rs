//! ropsdoc runtime configuration schema.
//!
//! Every section has serde defaults so a partial YAML file (or none at all)
//! deserializes into a usable config; secrets default to empty and are
//! reported by validation.

use serde::{Deserialize, Serialize};

pub const DEFAULT_FORM_RECOGNIZER_API_VERSION: &str = "2023-07-31";
pub const DEFAULT_OPENAI_API_VERSION: &str = "2024-05-01-preview";
pub const DEFAULT_PORT: u16 = 8501;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;
pub const DEFAULT_PENDING_TTL_SECS: u64 = 30 * 60;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// OCR / document-intelligence service
    pub form_recognizer: FormRecognizerConfig,

    /// Chat completion deployment used to clean handwritten text
    pub openai: OpenAiConfig,

    /// Record store location
    pub database: DatabaseConfig,

    /// HTTP server settings
    pub server: ServerConfig,

    pub logging: LoggingConfig,
}

// ---------------------------------------------------------------------------
// Azure services
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormRecognizerConfig {
    pub endpoint: String,
    pub key: String,
    pub api_version: String,
    /// Delay between operation polls when the service sends no Retry-After.
    pub poll_interval_ms: u64,
    pub max_poll_attempts: u32,
}

impl Default for FormRecognizerConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            key: String::new(),
            api_version: DEFAULT_FORM_RECOGNIZER_API_VERSION.to_string(),
            poll_interval_ms: 1000,
            max_poll_attempts: 60,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiConfig {
    pub endpoint: String,
    pub key: String,
    pub deployment: String,
    pub api_version: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            key: String::new(),
            deployment: String::new(),
            api_version: DEFAULT_OPENAI_API_VERSION.to_string(),
            max_tokens: 800,
            temperature: 0.5,
            top_p: 0.95,
        }
    }
}

// ---------------------------------------------------------------------------
// Storage / server / logging
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { path: "ropsdoc.db".to_string() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
    pub max_upload_bytes: usize,
    /// How long an unsaved extraction stays claimable.
    pub pending_ttl_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            pending_ttl_secs: DEFAULT_PENDING_TTL_SECS,
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// Directory for daily-rotated JSON log files
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), dir: None, json: false }
    }
}
