//! OCR text cleanup and field extraction through a chat LLM.

use std::sync::Arc;

use ropsdoc_core::{DocError, LlmProvider, LlmRequest};
use ropsdoc_logging::redact_sensitive_data;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, instrument};

use crate::code_block::strip_code_fences;

const CLEAN_SYSTEM_PROMPT: &str = "You are an AI assistant that helps people clean and format text.";

const CLEAN_INSTRUCTIONS: &str = "Please clean the following OCR-extracted text by removing any extraneous characters, \
correcting grammatical errors, and ensuring proper punctuation while maintaining the original context and meaning.";

const EXTRACT_SYSTEM_PROMPT: &str = "You are an AI assistant that extracts specific information from text.";

const EXTRACT_INSTRUCTIONS: &str = "From the following text, extract the summary in Romanian Language only, first name, last name, and CNP. \
Return the results strictly in JSON format with the keys 'summary', 'first_name', 'last_name', and 'cnp'. \
Do not include any additional text, explanations, or formatting. Do not use code blocks.";

/// Sampling parameters sent with every completion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompletionParams {
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
}

impl Default for CompletionParams {
    fn default() -> Self {
        Self {
            max_tokens: 800,
            temperature: 0.5,
            top_p: 0.95,
        }
    }
}

/// Structured fields pulled out of cleaned text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedFields {
    pub summary: String,
    pub first_name: String,
    pub last_name: String,
    pub cnp: String,
}

pub struct TextRefiner {
    provider: Arc<dyn LlmProvider>,
    params: CompletionParams,
}

impl TextRefiner {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            provider,
            params: CompletionParams::default(),
        }
    }

    pub fn with_params(mut self, params: CompletionParams) -> Self {
        self.params = params;
        self
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    fn request(&self, system: &str, instructions: &str, text: &str) -> LlmRequest {
        let mut request = LlmRequest::new(system, format!("{instructions}\n\nText:\n{text}"));
        request.max_tokens = self.params.max_tokens;
        request.temperature = self.params.temperature;
        request.top_p = self.params.top_p;
        request
    }

    async fn ask(&self, request: &LlmRequest) -> Result<String, DocError> {
        let response = self.provider.complete(request).await.map_err(|e| {
            error!(
                provider = self.provider.name(),
                error = %redact_sensitive_data(&format!("{e:#}")),
                "LLM completion failed"
            );
            DocError::Llm {
                provider: self.provider.name().to_string(),
                message: format!("{e:#}"),
            }
        })?;
        Ok(strip_code_fences(&response.content))
    }

    /// Remove OCR noise and fix grammar and punctuation.
    #[instrument(skip_all, fields(chars = text.chars().count()))]
    pub async fn clean_text(&self, text: &str) -> Result<String, DocError> {
        let request = self.request(CLEAN_SYSTEM_PROMPT, CLEAN_INSTRUCTIONS, text);
        let cleaned = self.ask(&request).await?;
        debug!(cleaned_chars = cleaned.chars().count(), "Cleaned OCR text");
        Ok(cleaned)
    }

    /// Ask for a Romanian summary, first name, last name, and CNP as JSON.
    #[instrument(skip_all, fields(chars = cleaned_text.chars().count()))]
    pub async fn extract_fields(&self, cleaned_text: &str) -> Result<ExtractedFields, DocError> {
        let request = self.request(EXTRACT_SYSTEM_PROMPT, EXTRACT_INSTRUCTIONS, cleaned_text);
        let content = self.ask(&request).await?;
        parse_fields(&content)
    }
}

/// Parse the extraction reply. The reply must be a single JSON object; keys
/// that are absent or null become empty strings.
pub fn parse_fields(content: &str) -> Result<ExtractedFields, DocError> {
    if !(content.starts_with('{') && content.ends_with('}')) {
        debug!(reply = %reply_preview(content), "Extraction reply is not a JSON object");
        return Err(DocError::MalformedLlmOutput(
            "response does not start with '{' and end with '}'".to_string(),
        ));
    }

    let metadata: Value = serde_json::from_str(content)
        .map_err(|e| DocError::MalformedLlmOutput(e.to_string()))?;

    Ok(ExtractedFields {
        summary: text_field(&metadata, "summary"),
        first_name: text_field(&metadata, "first_name"),
        last_name: text_field(&metadata, "last_name"),
        cnp: text_field(&metadata, "cnp"),
    })
}

const PREVIEW_CHARS: usize = 200;

/// Start of a model reply, scrubbed for logging.
fn reply_preview(content: &str) -> String {
    let head: String = content.chars().take(PREVIEW_CHARS).collect();
    redact_sensitive_data(&head)
}

fn text_field(metadata: &Value, key: &str) -> String {
    match metadata.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::MockProvider;

    #[tokio::test]
    async fn clean_text_sends_ocr_text_verbatim() {
        let provider = Arc::new(MockProvider::new("mock").with_response("```\nBuna ziua.\n```"));
        let refiner = TextRefiner::new(provider.clone());

        let cleaned = refiner.clean_text("buna ziua ~~").await.unwrap();
        assert_eq!(cleaned, "Buna ziua.");

        let requests = provider.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].system_prompt, CLEAN_SYSTEM_PROMPT);
        assert!(requests[0].user_prompt.ends_with("\n\nText:\nbuna ziua ~~"));
        assert_eq!(requests[0].max_tokens, 800);
        assert_eq!(requests[0].top_p, 0.95);
    }

    #[tokio::test]
    async fn extract_fields_parses_fenced_json() {
        let reply = "```json\n{\"summary\": \" Cerere de concediu \", \"first_name\": \"Ion\", \"last_name\": \"Popescu\", \"cnp\": \"1800101221144\"}\n```";
        let provider = Arc::new(MockProvider::new("mock").with_response(reply));
        let refiner = TextRefiner::new(provider.clone());

        let fields = refiner.extract_fields("Subsemnatul Ion Popescu.").await.unwrap();
        assert_eq!(fields.summary, "Cerere de concediu");
        assert_eq!(fields.first_name, "Ion");
        assert_eq!(fields.cnp, "1800101221144");
        assert!(provider.requests()[0].user_prompt.ends_with("Text:\nSubsemnatul Ion Popescu."));
    }

    #[test]
    fn missing_and_non_string_values() {
        let fields = parse_fields(r#"{"summary": "Nota", "cnp": 1800101221144, "last_name": null}"#).unwrap();
        assert_eq!(fields.summary, "Nota");
        assert_eq!(fields.cnp, "1800101221144");
        assert!(fields.first_name.is_empty());
        assert!(fields.last_name.is_empty());
    }

    #[test]
    fn rejects_prose_reply() {
        let err = parse_fields("Sure! The summary is ...").unwrap_err();
        assert!(matches!(err, DocError::MalformedLlmOutput(_)));
    }

    #[test]
    fn logged_reply_hides_cnp() {
        let preview = reply_preview("Persoana: Ion Popescu, CNP 1800101221144.");
        assert_eq!(preview, "Persoana: Ion Popescu, CNP [REDACTED_CNP].");
        assert_eq!(reply_preview(&"a".repeat(500)).len(), PREVIEW_CHARS);
    }

    #[test]
    fn rejects_broken_json() {
        let err = parse_fields("{\"summary\": }").unwrap_err();
        assert!(matches!(err, DocError::MalformedLlmOutput(_)));
    }

    #[tokio::test]
    async fn provider_failure_is_llm_error() {
        struct Failing;

        #[async_trait::async_trait]
        impl LlmProvider for Failing {
            fn name(&self) -> &str {
                "failing"
            }
            async fn complete(&self, _req: &LlmRequest) -> anyhow::Result<ropsdoc_core::LlmResponse> {
                anyhow::bail!("Azure OpenAI returned 429 Too Many Requests")
            }
        }

        let refiner = TextRefiner::new(Arc::new(Failing));
        let err = refiner.clean_text("x").await.unwrap_err();
        match err {
            DocError::Llm { provider, message } => {
                assert_eq!(provider, "failing");
                assert!(message.contains("429"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }
}
