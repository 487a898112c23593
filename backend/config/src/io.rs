//! Config file reading.

use crate::env::resolve_env_vars_with;
use crate::schema::AppConfig;
use anyhow::{Context, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use tokio::fs;
use tracing::info;

/// Load a YAML config file, substituting `${VAR}` references from `env`.
///
/// The file must exist: it is only read when the operator names it.
pub async fn load_config_file(path: &Path, env: &HashMap<String, String>) -> Result<AppConfig> {
    let raw = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config = parse_config(&raw, env)
        .with_context(|| format!("Failed to parse config YAML at: {}", path.display()))?;

    info!(path = %path.display(), "Loaded config");
    Ok(config)
}

/// Parse YAML text into an `AppConfig`, resolving env references first.
pub fn parse_config(raw: &str, env: &HashMap<String, String>) -> Result<AppConfig> {
    // An empty file is a valid "all defaults" config.
    if raw.trim().is_empty() {
        return Ok(AppConfig::default());
    }

    let yaml: serde_yaml::Value = serde_yaml::from_str(raw).context("Invalid YAML")?;
    let value: Value =
        serde_json::to_value(yaml).context("Failed to convert config for processing")?;
    let value = resolve_env_vars_with(&value, env).context("Failed to resolve env vars in config")?;

    serde_json::from_value(value).context("Failed to deserialize config after processing")
}
