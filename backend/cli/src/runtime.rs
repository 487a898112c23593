//! Wiring of the pipeline from configuration.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::info;

use ropsdoc_config::{validate, AppConfig};
use ropsdoc_core::DocError;
use ropsdoc_llm::providers::AzureOpenAiProvider;
use ropsdoc_llm::{CompletionParams, TextRefiner};
use ropsdoc_pipeline::DocumentProcessor;
use ropsdoc_storage::{InMemoryRecordStore, RecordStore, SqliteRecordStore};
use ropsdoc_understanding::FormRecognizerClient;

/// Refuse to start when the configuration has errors.
pub fn ensure_valid(config: &AppConfig) -> Result<(), DocError> {
    let report = validate(config);
    if report.is_valid() {
        return Ok(());
    }
    let problems: Vec<String> = report.errors.iter().map(|e| format!("{}: {}", e.path, e.message)).collect();
    Err(DocError::Config(format!(
        "run `ropsdoc doctor` for details\n  {}",
        problems.join("\n  ")
    )))
}

pub fn open_store(config: &AppConfig, ephemeral: bool) -> Result<Arc<dyn RecordStore>> {
    if ephemeral {
        info!("Using in-memory record store; records are lost on exit");
        return Ok(Arc::new(InMemoryRecordStore::new()));
    }
    Ok(Arc::new(SqliteRecordStore::open(&config.database.path)?))
}

pub fn build_processor(config: &AppConfig, store: Arc<dyn RecordStore>) -> DocumentProcessor {
    let fr = &config.form_recognizer;
    let analyzer = FormRecognizerClient::new(&fr.endpoint, &fr.key)
        .with_api_version(&fr.api_version)
        .with_polling(Duration::from_millis(fr.poll_interval_ms), fr.max_poll_attempts);

    let ai = &config.openai;
    let provider = AzureOpenAiProvider::new(&ai.endpoint, &ai.key, &ai.deployment).with_api_version(&ai.api_version);
    let refiner = TextRefiner::new(Arc::new(provider)).with_params(CompletionParams {
        max_tokens: ai.max_tokens,
        temperature: ai.temperature,
        top_p: ai.top_p,
    });

    DocumentProcessor::new(Arc::new(analyzer), refiner, store)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incomplete_config_is_a_config_error() {
        let err = ensure_valid(&AppConfig::default()).unwrap_err();
        assert!(matches!(err, DocError::Config(_)));
        assert!(err.to_string().contains("openai.deployment"));
    }

    #[test]
    fn complete_config_passes() {
        let mut config = AppConfig::default();
        config.form_recognizer.endpoint = "https://fr.cognitiveservices.azure.com".into();
        config.form_recognizer.key = "fr-key".into();
        config.openai.endpoint = "https://ai.openai.azure.com".into();
        config.openai.key = "ai-key".into();
        config.openai.deployment = "gpt-4o".into();
        assert!(ensure_valid(&config).is_ok());
    }
}
