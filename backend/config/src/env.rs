//! Environment variable substitution and overrides for config values.
//!
//! Supports `${VAR_NAME}` syntax in string values of a YAML config file,
//! resolved at load time. Only uppercase `[A-Z_][A-Z0-9_]*` variable names
//! are matched. `$${}` escapes to a literal `${}`.
//!
//! After file loading, well-known variables (`AZURE_OPENAI_KEY`, `PORT`, ...)
//! override individual fields.

use anyhow::{bail, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;
use std::str::FromStr;

use crate::schema::AppConfig;

/// Matches `${VAR}` and the escaped form `$${VAR}`.
static ENV_VAR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\$)?\$\{([A-Z_][A-Z0-9_]*)\}").unwrap());

/// Error returned for missing env vars.
#[derive(Debug, thiserror::Error)]
#[error("Missing env var \"{var_name}\" referenced at config path: {config_path}")]
pub struct MissingEnvVarError {
    pub var_name: String,
    pub config_path: String,
}

/// Error returned when an override variable cannot be parsed.
#[derive(Debug, thiserror::Error)]
#[error("Invalid value {value:?} for env var {var_name}: expected {expected}")]
pub struct InvalidEnvValueError {
    pub var_name: String,
    pub value: String,
    pub expected: &'static str,
}

/// Substitute `${VAR}` references in a config JSON value tree using a provided map.
///
/// Walks the entire value tree recursively; only string leaves are processed.
/// Returns an error if any referenced env var is not set or is empty.
pub fn resolve_env_vars_with(value: &Value, env: &HashMap<String, String>) -> Result<Value> {
    substitute_value(value, env, "")
}

fn substitute_value(value: &Value, env: &HashMap<String, String>, path: &str) -> Result<Value> {
    match value {
        Value::String(s) => Ok(Value::String(substitute_string(s, env, path)?)),
        Value::Array(arr) => {
            let result: Result<Vec<_>> = arr
                .iter()
                .enumerate()
                .map(|(i, v)| substitute_value(v, env, &format!("{path}[{i}]")))
                .collect();
            Ok(Value::Array(result?))
        }
        Value::Object(map) => {
            let mut result = serde_json::Map::new();
            for (k, v) in map {
                let child_path = if path.is_empty() {
                    k.clone()
                } else {
                    format!("{path}.{k}")
                };
                result.insert(k.clone(), substitute_value(v, env, &child_path)?);
            }
            Ok(Value::Object(result))
        }
        other => Ok(other.clone()),
    }
}

fn substitute_string(s: &str, env: &HashMap<String, String>, path: &str) -> Result<String> {
    if !s.contains('$') {
        return Ok(s.to_string());
    }

    let mut error: Option<MissingEnvVarError> = None;
    let substituted = ENV_VAR_PATTERN.replace_all(s, |caps: &regex::Captures| {
        let var_name = &caps[2];
        if caps.get(1).is_some() {
            return format!("${{{var_name}}}");
        }
        match env.get(var_name) {
            Some(val) if !val.is_empty() => val.clone(),
            _ => {
                if error.is_none() {
                    error = Some(MissingEnvVarError {
                        var_name: var_name.to_string(),
                        config_path: path.to_string(),
                    });
                }
                String::new()
            }
        }
    });

    if let Some(err) = error {
        bail!(err);
    }
    Ok(substituted.into_owned())
}

// ---------------------------------------------------------------------------
// Field overrides
// ---------------------------------------------------------------------------

fn lookup<'a>(env: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    env.get(name).map(|v| v.trim()).filter(|v| !v.is_empty())
}

fn parse_var<T: FromStr>(name: &str, raw: &str, expected: &'static str) -> Result<T> {
    raw.parse().map_err(|_| {
        InvalidEnvValueError {
            var_name: name.to_string(),
            value: raw.to_string(),
            expected,
        }
        .into()
    })
}

fn parse_flag(name: &str, raw: &str) -> Result<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => bail!(InvalidEnvValueError {
            var_name: name.to_string(),
            value: raw.to_string(),
            expected: "a boolean",
        }),
    }
}

/// Apply the well-known environment variables on top of `config`.
///
/// Unset and empty variables leave the field untouched. `ROPSDOC_PORT` wins
/// over the platform-provided `PORT`.
pub fn apply_env_overrides(config: &mut AppConfig, env: &HashMap<String, String>) -> Result<()> {
    let set = |target: &mut String, name: &str| {
        if let Some(v) = lookup(env, name) {
            *target = v.to_string();
        }
    };

    set(&mut config.form_recognizer.endpoint, "AZURE_FORM_RECOGNIZER_ENDPOINT");
    set(&mut config.form_recognizer.key, "AZURE_FORM_RECOGNIZER_KEY");
    set(&mut config.form_recognizer.api_version, "AZURE_FORM_RECOGNIZER_API_VERSION");

    set(&mut config.openai.endpoint, "AZURE_OPENAI_ENDPOINT");
    set(&mut config.openai.key, "AZURE_OPENAI_KEY");
    set(&mut config.openai.deployment, "AZURE_OPENAI_DEPLOYMENT");
    set(&mut config.openai.api_version, "AZURE_OPENAI_API_VERSION");

    set(&mut config.database.path, "ROPSDOC_DB_PATH");
    set(&mut config.server.bind, "ROPSDOC_BIND");

    for name in ["PORT", "ROPSDOC_PORT"] {
        if let Some(raw) = lookup(env, name) {
            config.server.port = parse_var(name, raw, "a port number")?;
        }
    }
    if let Some(raw) = lookup(env, "ROPSDOC_MAX_UPLOAD_BYTES") {
        config.server.max_upload_bytes =
            parse_var("ROPSDOC_MAX_UPLOAD_BYTES", raw, "a byte count")?;
    }

    if let Some(dir) = lookup(env, "ROPSDOC_LOG_DIR") {
        config.logging.dir = Some(dir.to_string());
    }
    if let Some(raw) = lookup(env, "ROPSDOC_LOG_JSON") {
        config.logging.json = parse_flag("ROPSDOC_LOG_JSON", raw)?;
    }

    Ok(())
}

/// Build a config from defaults plus environment variables only.
pub fn from_env_map(env: &HashMap<String, String>) -> Result<AppConfig> {
    let mut config = AppConfig::default();
    apply_env_overrides(&mut config, env)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn substitutes_simple_var() {
        let v = json!({"openai": {"key": "${AZURE_OPENAI_KEY}"}});
        let env = env(&[("AZURE_OPENAI_KEY", "abc123")]);
        let result = resolve_env_vars_with(&v, &env).unwrap();
        assert_eq!(result["openai"]["key"], "abc123");
    }

    #[test]
    fn error_on_missing_var() {
        let v = json!({"form_recognizer": {"key": "${MISSING_VAR}"}});
        let err = resolve_env_vars_with(&v, &HashMap::new()).unwrap_err().to_string();
        assert!(err.contains("MISSING_VAR"));
        assert!(err.contains("form_recognizer.key"));
    }

    #[test]
    fn escaped_reference_is_literal() {
        let v = json!({"note": "cost $${DOLLARS} for ${NAME}"});
        let result = resolve_env_vars_with(&v, &env(&[("NAME", "ion")])).unwrap();
        assert_eq!(result["note"], "cost ${DOLLARS} for ion");
    }

    #[test]
    fn passthrough_non_var_strings() {
        let v = json!({"key": "plain-string", "port": 8501});
        let result = resolve_env_vars_with(&v, &HashMap::new()).unwrap();
        assert_eq!(result, v);
    }

    #[test]
    fn overrides_from_env_map() {
        let config = from_env_map(&env(&[
            ("AZURE_FORM_RECOGNIZER_ENDPOINT", "https://fr.example.com/"),
            ("AZURE_FORM_RECOGNIZER_KEY", "fr-key"),
            ("AZURE_OPENAI_DEPLOYMENT", "gpt-4o"),
            ("PORT", "9000"),
            ("ROPSDOC_PORT", "9100"),
            ("ROPSDOC_DB_PATH", "/data/records.db"),
            ("ROPSDOC_LOG_JSON", "true"),
            ("AZURE_OPENAI_KEY", "   "),
        ]))
        .unwrap();

        assert_eq!(config.form_recognizer.endpoint, "https://fr.example.com/");
        assert_eq!(config.form_recognizer.key, "fr-key");
        assert_eq!(config.openai.deployment, "gpt-4o");
        assert_eq!(config.openai.key, "");
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.database.path, "/data/records.db");
        assert!(config.logging.json);
    }

    #[test]
    fn rejects_unparseable_port() {
        let err = from_env_map(&env(&[("PORT", "eighty")])).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }
}
