use anyhow::Result;
use async_trait::async_trait;

use crate::analysis::{AnalysisModel, AnalyzeResult};
use crate::types::PreparedDocument;

/// A document-intelligence backend that turns document bytes into text and fields.
#[async_trait]
pub trait DocumentAnalyzer: Send + Sync {
    /// Analyzer name (e.g., "form-recognizer").
    fn name(&self) -> &str;

    /// Run the given prebuilt model and wait for the analysis to finish.
    async fn analyze(&self, model: AnalysisModel, document: &PreparedDocument) -> Result<AnalyzeResult>;
}

/// Trait for chat-completion LLM deployments.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider name (e.g., "azure-openai").
    fn name(&self) -> &str;

    /// Send a completion request and return the response text.
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse>;
}

/// Request to an LLM provider.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmRequest {
    pub system_prompt: String,
    pub user_prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub frequency_penalty: f32,
    pub presence_penalty: f32,
}

impl LlmRequest {
    pub fn new(system_prompt: impl Into<String>, user_prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            user_prompt: user_prompt.into(),
            max_tokens: 800,
            temperature: 0.5,
            top_p: 0.95,
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
        }
    }
}

/// Response from an LLM provider.
#[derive(Debug, Clone)]
pub struct LlmResponse {
    pub content: String,
    pub provider: String,
    pub model: String,
    pub tokens_used: u64,
    pub latency_ms: u64,
}
