//! Config redaction: produce safe-to-share config snapshots by masking secrets.

use serde_json::Value;

use crate::schema::AppConfig;

/// Keys whose string values are secrets.
static SECRET_KEYS: &[&str] = &[
    "key",
    "apiKey",
    "api_key",
    "subscription_key",
    "token",
    "secret",
    "password",
];

/// Redact a config JSON value, masking every secret field.
///
/// The resulting value is safe to log or print from `ropsdoc doctor`.
pub fn redact(value: &Value) -> Value {
    redact_recursive(value, "")
}

/// Serialize and redact an `AppConfig`.
pub fn redact_config(config: &AppConfig) -> Value {
    // Serializing plain structs of strings and numbers cannot fail.
    serde_json::to_value(config).map(|v| redact(&v)).unwrap_or(Value::Null)
}

fn is_secret_key(key: &str) -> bool {
    SECRET_KEYS.iter().any(|k| k.eq_ignore_ascii_case(key))
}

fn redact_string(s: &str, key: &str) -> Value {
    if !is_secret_key(key) || s.is_empty() {
        return Value::String(s.to_string());
    }
    // Preserve a short hint: first 4 chars + ***
    let hint = if s.chars().count() > 8 {
        format!("{}***", s.chars().take(4).collect::<String>())
    } else {
        "***".to_string()
    };
    Value::String(hint)
}

fn redact_recursive(value: &Value, key: &str) -> Value {
    match value {
        Value::String(s) => redact_string(s, key),
        Value::Array(arr) => Value::Array(arr.iter().map(|v| redact_recursive(v, key)).collect()),
        Value::Object(map) => {
            let mut result = serde_json::Map::new();
            for (k, v) in map {
                result.insert(k.clone(), redact_recursive(v, k));
            }
            Value::Object(result)
        }
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn redacts_service_keys() {
        let mut config = AppConfig::default();
        config.form_recognizer.key = "0123456789abcdef".into();
        config.openai.key = "short".into();
        config.openai.deployment = "gpt-4o".into();

        let redacted = redact_config(&config);
        assert_eq!(redacted["form_recognizer"]["key"], "0123***");
        assert_eq!(redacted["openai"]["key"], "***");
        assert_eq!(redacted["openai"]["deployment"], "gpt-4o");
    }

    #[test]
    fn empty_secrets_stay_empty() {
        let redacted = redact_config(&AppConfig::default());
        assert_eq!(redacted["openai"]["key"], "");
    }

    #[test]
    fn passthrough_non_sensitive() {
        let v = json!({ "logging": { "level": "debug" }, "server": { "port": 8501 } });
        assert_eq!(redact(&v), v);
    }
}
