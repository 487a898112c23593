use std::time::Instant;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use ropsdoc_core::{LlmProvider, LlmRequest, LlmResponse};

pub const DEFAULT_API_VERSION: &str = "2024-05-01-preview";

/// Azure OpenAI chat-completions deployment.
pub struct AzureOpenAiProvider {
    client: Client,
    endpoint: String,
    api_key: String,
    deployment: String,
    api_version: String,
}

impl AzureOpenAiProvider {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        deployment: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            deployment: deployment.into(),
            api_version: DEFAULT_API_VERSION.to_string(),
        }
    }

    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.endpoint, self.deployment, self.api_version
        )
    }
}

#[derive(Serialize)]
struct ChatRequest {
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
    top_p: f32,
    frequency_penalty: f32,
    presence_penalty: f32,
    stream: bool,
}

#[derive(Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    #[serde(default)]
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    model: Option<String>,
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct Usage {
    total_tokens: Option<u64>,
}

#[async_trait]
impl LlmProvider for AzureOpenAiProvider {
    fn name(&self) -> &str {
        "azure-openai"
    }

    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse> {
        let start = Instant::now();

        let mut messages = Vec::new();
        if !request.system_prompt.is_empty() {
            messages.push(ChatMessage {
                role: "system".to_string(),
                content: request.system_prompt.clone(),
            });
        }
        messages.push(ChatMessage {
            role: "user".to_string(),
            content: request.user_prompt.clone(),
        });

        let body = ChatRequest {
            messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            top_p: request.top_p,
            frequency_penalty: request.frequency_penalty,
            presence_penalty: request.presence_penalty,
            stream: false,
        };

        debug!(
            deployment = %self.deployment,
            "Sending request to Azure OpenAI"
        );

        let response = self
            .client
            .post(self.completions_url())
            .header("api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .context("Azure OpenAI HTTP request failed")?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            anyhow::bail!("Azure OpenAI returned {}: {}", status, error_body);
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .context("Failed to parse Azure OpenAI response")?;

        let content = chat_response
            .choices
            .first()
            .map(|c| c.message.content.clone())
            .context("Azure OpenAI response contained no choices")?;

        let tokens_used = chat_response
            .usage
            .and_then(|u| u.total_tokens)
            .unwrap_or(0);

        let latency_ms = start.elapsed().as_millis() as u64;
        debug!(tokens_used, latency_ms, "Azure OpenAI completion received");

        Ok(LlmResponse {
            content,
            provider: "azure-openai".to_string(),
            model: chat_response.model.unwrap_or_else(|| self.deployment.clone()),
            tokens_used,
            latency_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::HeaderMap, routing::post, Json, Router};
    use serde_json::{json, Value};
    use tokio::net::TcpListener;

    async fn chat(headers: HeaderMap, Json(body): Json<Value>) -> Json<Value> {
        assert_eq!(headers.get("api-key").unwrap(), "azure-key");
        assert_eq!(body["max_tokens"], 800);
        assert_eq!(body["stream"], false);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "Text:\nbuna ziua");
        Json(json!({
            "model": "gpt-4o",
            "choices": [{"message": {"role": "assistant", "content": "Bună ziua."}}],
            "usage": {"total_tokens": 42}
        }))
    }

    #[test]
    fn builds_deployment_url() {
        let provider = AzureOpenAiProvider::new("https://rops.openai.azure.com/", "k", "gpt4o");
        assert_eq!(
            provider.completions_url(),
            "https://rops.openai.azure.com/openai/deployments/gpt4o/chat/completions?api-version=2024-05-01-preview"
        );
    }

    #[tokio::test]
    async fn completes_against_deployment() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let app = Router::new().route("/openai/deployments/gpt4o/chat/completions", post(chat));
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let provider = AzureOpenAiProvider::new(base, "azure-key", "gpt4o");
        let request = LlmRequest::new("You clean text.", "Text:\nbuna ziua");
        let response = provider.complete(&request).await.unwrap();

        assert_eq!(response.content, "Bună ziua.");
        assert_eq!(response.model, "gpt-4o");
        assert_eq!(response.tokens_used, 42);
    }
}
