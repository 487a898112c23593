//! `ropsdoc-config`: runtime configuration for the document service.
//!
//! Provides:
//! - Typed config schema with defaults for every section
//! - YAML loading with `${ENV_VAR}` substitution
//! - Environment variable overrides (optionally from a `.env` file)
//! - Config redaction for safe display
//! - Validation report (errors vs. warnings)

pub mod env;
pub mod io;
pub mod redact;
pub mod schema;
pub mod validation;

// Re-export most-used types at crate root.
pub use env::{
    apply_env_overrides, from_env_map, resolve_env_vars_with,
    InvalidEnvValueError, MissingEnvVarError,
};
pub use io::{load_config_file, parse_config};
pub use redact::{redact, redact_config};
pub use schema::{AppConfig, DatabaseConfig, FormRecognizerConfig, LoggingConfig, OpenAiConfig, ServerConfig};
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::Result;
use std::collections::HashMap;
use std::path::Path;

/// Load the effective configuration.
///
/// Reads `.env` (if present) into the process environment, then the optional
/// YAML file, then applies environment overrides. Validation problems are
/// logged but not fatal here; callers decide via [`validate`].
pub async fn load(path: Option<&Path>) -> Result<AppConfig> {
    if let Ok(dotenv_path) = dotenvy::dotenv() {
        tracing::debug!(path = %dotenv_path.display(), "Loaded .env");
    }
    let env: HashMap<String, String> = std::env::vars().collect();
    load_with_env(path, &env).await
}

/// Like [`load`], with an explicit environment map.
pub async fn load_with_env(path: Option<&Path>, env: &HashMap<String, String>) -> Result<AppConfig> {
    let config = match path {
        Some(path) => {
            let mut config = load_config_file(path, env).await?;
            apply_env_overrides(&mut config, env)?;
            config
        }
        None => from_env_map(env)?,
    };

    let report = validate(&config);
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    for error in &report.errors {
        tracing::error!(path = %error.path, message = %error.message, "Config error");
    }

    Ok(config)
}
