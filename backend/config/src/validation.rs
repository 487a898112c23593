//! Config validation: checks with user-friendly error messages.

use crate::schema::AppConfig;
use thiserror::Error;

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// A collection of validation errors found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &AppConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_form_recognizer(config, &mut report);
    validate_openai(config, &mut report);
    validate_server(config, &mut report);
    validate_database(config, &mut report);
    validate_logging(config, &mut report);
    report
}

fn require(report: &mut ValidationReport, path: &str, value: &str, env_var: &str) {
    if value.trim().is_empty() {
        report.error(path, format!("Required; set it in the config file or via {env_var}"));
    }
}

/// Endpoints must be https, except loopback addresses used for local testing.
fn check_endpoint(report: &mut ValidationReport, path: &str, endpoint: &str) {
    let endpoint = endpoint.trim();
    if endpoint.is_empty() || endpoint.starts_with("https://") {
        return;
    }
    let loopback = ["http://localhost", "http://127.0.0.1", "http://[::1]"]
        .iter()
        .any(|prefix| endpoint.starts_with(prefix));
    if loopback {
        report.warn(path, "Plain-http endpoint; only acceptable for local testing");
    } else {
        report.error(path, format!("Endpoint must use https: '{endpoint}'"));
    }
}

fn validate_form_recognizer(config: &AppConfig, report: &mut ValidationReport) {
    let fr = &config.form_recognizer;
    require(report, "form_recognizer.endpoint", &fr.endpoint, "AZURE_FORM_RECOGNIZER_ENDPOINT");
    require(report, "form_recognizer.key", &fr.key, "AZURE_FORM_RECOGNIZER_KEY");
    check_endpoint(report, "form_recognizer.endpoint", &fr.endpoint);
    if fr.max_poll_attempts == 0 {
        report.error("form_recognizer.max_poll_attempts", "max_poll_attempts must be >= 1");
    }
    if fr.poll_interval_ms == 0 {
        report.warn("form_recognizer.poll_interval_ms", "Polling without delay may hit rate limits");
    }
}

fn validate_openai(config: &AppConfig, report: &mut ValidationReport) {
    let ai = &config.openai;
    require(report, "openai.endpoint", &ai.endpoint, "AZURE_OPENAI_ENDPOINT");
    require(report, "openai.key", &ai.key, "AZURE_OPENAI_KEY");
    require(report, "openai.deployment", &ai.deployment, "AZURE_OPENAI_DEPLOYMENT");
    check_endpoint(report, "openai.endpoint", &ai.endpoint);
    if ai.max_tokens == 0 {
        report.error("openai.max_tokens", "max_tokens must be > 0");
    }
    if !(0.0..=2.0).contains(&ai.temperature) {
        report.error("openai.temperature", "temperature must be between 0 and 2");
    }
    if !(0.0..=1.0).contains(&ai.top_p) {
        report.error("openai.top_p", "top_p must be between 0 and 1");
    }
}

fn validate_server(config: &AppConfig, report: &mut ValidationReport) {
    let server = &config.server;
    if server.port == 0 {
        report.error("server.port", "port must be > 0");
    } else if server.port < 1024 && server.port != 80 && server.port != 443 {
        report.warn(
            "server.port",
            format!("Port {} requires elevated privileges; consider using a port >= 1024", server.port),
        );
    }
    if server.max_upload_bytes == 0 {
        report.error("server.max_upload_bytes", "max_upload_bytes must be > 0");
    }
    if server.pending_ttl_secs == 0 {
        report.error("server.pending_ttl_secs", "pending_ttl_secs must be > 0");
    }
}

fn validate_database(config: &AppConfig, report: &mut ValidationReport) {
    if config.database.path.trim().is_empty() {
        report.error("database.path", "Database path cannot be empty");
    }
}

fn validate_logging(config: &AppConfig, report: &mut ValidationReport) {
    let level = config.logging.level.to_ascii_lowercase();
    if !matches!(level.as_str(), "trace" | "debug" | "info" | "warn" | "error") {
        report.warn(
            "logging.level",
            format!("Unknown level '{}'; it will be read as an EnvFilter directive", config.logging.level),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> AppConfig {
        let mut cfg = AppConfig::default();
        cfg.form_recognizer.endpoint = "https://fr.cognitiveservices.azure.com".into();
        cfg.form_recognizer.key = "fr-key".into();
        cfg.openai.endpoint = "https://ai.openai.azure.com".into();
        cfg.openai.key = "ai-key".into();
        cfg.openai.deployment = "gpt-4o".into();
        cfg
    }

    #[test]
    fn complete_config_is_valid() {
        let report = validate(&complete());
        assert!(report.is_valid(), "errors: {:?}", report.errors);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn default_config_reports_missing_secrets() {
        let report = validate(&AppConfig::default());
        let paths: Vec<_> = report.errors.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(
            paths,
            [
                "form_recognizer.endpoint",
                "form_recognizer.key",
                "openai.endpoint",
                "openai.key",
                "openai.deployment",
            ]
        );
    }

    #[test]
    fn plain_http_is_error_unless_loopback() {
        let mut cfg = complete();
        cfg.openai.endpoint = "http://ai.example.com".into();
        cfg.form_recognizer.endpoint = "http://127.0.0.1:9000".into();
        let report = validate(&cfg);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].path, "openai.endpoint");
        assert_eq!(report.warnings[0].path, "form_recognizer.endpoint");
    }

    #[test]
    fn zero_port_is_error() {
        let mut cfg = complete();
        cfg.server.port = 0;
        let report = validate(&cfg);
        assert!(!report.is_valid());
        assert_eq!(report.errors[0].path, "server.port");
    }
}
