//! Azure Form Recognizer (Document Intelligence) REST client.
//!
//! Analysis is a long-running operation: the document is submitted to
//! `documentModels/{model}:analyze`, the service answers `202 Accepted` with an
//! `Operation-Location` header, and that URL is polled until the status is
//! `succeeded` or `failed`.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use ropsdoc_core::{AnalysisModel, AnalyzeResult, DocumentAnalyzer, PreparedDocument};

pub const DEFAULT_API_VERSION: &str = "2023-07-31";

const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

pub struct FormRecognizerClient {
    client: Client,
    endpoint: String,
    api_key: String,
    api_version: String,
    poll_interval: Duration,
    max_poll_attempts: u32,
    request_timeout: Duration,
}

impl FormRecognizerClient {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            api_version: DEFAULT_API_VERSION.to_string(),
            poll_interval: Duration::from_secs(1),
            max_poll_attempts: 60,
            request_timeout: Duration::from_secs(120),
        }
    }

    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    pub fn with_polling(mut self, interval: Duration, max_attempts: u32) -> Self {
        self.poll_interval = interval;
        self.max_poll_attempts = max_attempts.max(1);
        self
    }

    fn analyze_url(&self, model: AnalysisModel) -> String {
        format!(
            "{}/formrecognizer/documentModels/{}:analyze?api-version={}",
            self.endpoint,
            model.model_id(),
            self.api_version
        )
    }

    /// Submit the document and return the operation URL to poll.
    async fn submit(&self, model: AnalysisModel, document: &PreparedDocument) -> Result<String> {
        let response = self
            .client
            .post(self.analyze_url(model))
            .header(SUBSCRIPTION_KEY_HEADER, &self.api_key)
            .header("Content-Type", document.content_type)
            .timeout(self.request_timeout)
            .body(document.bytes.clone())
            .send()
            .await
            .context("Form Recognizer HTTP request failed")?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            bail!("Form Recognizer returned {}: {}", status, error_body);
        }

        response
            .headers()
            .get("Operation-Location")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .context("Form Recognizer response has no Operation-Location header")
    }

    /// Poll the operation until it completes.
    async fn poll(&self, operation_url: &str) -> Result<AnalyzeResult> {
        for attempt in 1..=self.max_poll_attempts {
            let response = self
                .client
                .get(operation_url)
                .header(SUBSCRIPTION_KEY_HEADER, &self.api_key)
                .timeout(self.request_timeout)
                .send()
                .await
                .context("Form Recognizer poll request failed")?;

            let status = response.status();
            if !status.is_success() {
                let error_body = response.text().await.unwrap_or_default();
                bail!("Form Recognizer poll returned {}: {}", status, error_body);
            }

            let delay = retry_after(response.headers()).unwrap_or(self.poll_interval);
            let operation: OperationStatus = response
                .json()
                .await
                .context("Failed to parse Form Recognizer operation status")?;

            match operation.status.as_str() {
                "succeeded" => {
                    return operation
                        .analyze_result
                        .context("Form Recognizer reported success without analyzeResult");
                }
                "failed" => {
                    let message = operation
                        .error
                        .map(|e| e.to_string())
                        .unwrap_or_else(|| "unknown error".to_string());
                    bail!("Form Recognizer analysis failed: {}", message);
                }
                other => {
                    debug!(attempt, status = other, "Analysis still running");
                    tokio::time::sleep(delay).await;
                }
            }
        }

        warn!(attempts = self.max_poll_attempts, "Form Recognizer polling gave up");
        bail!(
            "Form Recognizer analysis did not finish after {} polls",
            self.max_poll_attempts
        )
    }
}

#[derive(Deserialize)]
struct OperationStatus {
    status: String,
    #[serde(rename = "analyzeResult")]
    analyze_result: Option<AnalyzeResult>,
    error: Option<ServiceError>,
}

#[derive(Deserialize)]
struct ServiceError {
    code: Option<String>,
    message: Option<String>,
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.code, &self.message) {
            (Some(code), Some(message)) => write!(f, "{code}: {message}"),
            (None, Some(message)) => f.write_str(message),
            (Some(code), None) => f.write_str(code),
            (None, None) => f.write_str("unknown error"),
        }
    }
}

/// Delay requested by the service, in whole seconds.
fn retry_after(headers: &reqwest::header::HeaderMap) -> Option<Duration> {
    headers
        .get("Retry-After")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

#[async_trait]
impl DocumentAnalyzer for FormRecognizerClient {
    fn name(&self) -> &str {
        "form-recognizer"
    }

    #[instrument(skip(self, model, document), fields(model = model.model_id(), size = document.len()))]
    async fn analyze(&self, model: AnalysisModel, document: &PreparedDocument) -> Result<AnalyzeResult> {
        info!(filename = %document.filename, "Submitting document for analysis");
        let operation_url = self.submit(model, document).await?;
        let result = self.poll(&operation_url).await?;
        info!(
            pages = result.pages.len(),
            documents = result.documents.len(),
            "Document analysis finished"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use axum::{
        Json, Router,
        extract::State,
        http::{HeaderMap, HeaderValue, StatusCode},
        response::IntoResponse,
        routing::{get, post},
    };
    use serde_json::{Value, json};
    use tokio::net::TcpListener;

    /// How the fake service behaves.
    #[derive(Clone)]
    struct Script {
        pending_polls: usize,
        outcome: Value,
        retry_after: Option<&'static str>,
        send_location: bool,
    }

    impl Script {
        fn new(pending_polls: usize, outcome: Value) -> Self {
            Self { pending_polls, outcome, retry_after: None, send_location: true }
        }
    }

    #[derive(Clone)]
    struct Fake {
        base: String,
        polls: Arc<AtomicUsize>,
        script: Script,
    }

    async fn analyze(State(fake): State<Fake>, headers: HeaderMap) -> impl IntoResponse {
        assert_eq!(headers.get(SUBSCRIPTION_KEY_HEADER).unwrap(), "secret");
        assert_eq!(headers.get("content-type").unwrap(), "application/pdf");
        let mut out = HeaderMap::new();
        if fake.script.send_location {
            let location = format!("{}/operations/1", fake.base);
            out.insert("Operation-Location", HeaderValue::from_str(&location).unwrap());
        }
        (StatusCode::ACCEPTED, out)
    }

    async fn operation(State(fake): State<Fake>) -> impl IntoResponse {
        let n = fake.polls.fetch_add(1, Ordering::SeqCst);
        let mut out = HeaderMap::new();
        if let Some(secs) = fake.script.retry_after {
            out.insert("Retry-After", HeaderValue::from_static(secs));
        }
        if n < fake.script.pending_polls {
            (out, Json(json!({"status": "running"})))
        } else {
            (out, Json(fake.script.outcome.clone()))
        }
    }

    async fn spawn_fake(pending_polls: usize, outcome: Value) -> (FormRecognizerClient, Arc<AtomicUsize>) {
        spawn_scripted(Script::new(pending_polls, outcome), Duration::from_millis(5)).await
    }

    async fn spawn_scripted(script: Script, interval: Duration) -> (FormRecognizerClient, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let polls = Arc::new(AtomicUsize::new(0));
        let fake = Fake { base: base.clone(), polls: polls.clone(), script };
        let app = Router::new()
            .route(
                "/formrecognizer/documentModels/:model_action",
                post(analyze),
            )
            .route("/operations/1", get(operation))
            .with_state(fake);
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let client = FormRecognizerClient::new(format!("{base}/"), "secret").with_polling(interval, 5);
        (client, polls)
    }

    fn pdf() -> PreparedDocument {
        PreparedDocument {
            filename: "scan.pdf".into(),
            content_type: "application/pdf",
            bytes: b"%PDF-1.4".to_vec(),
        }
    }

    #[test]
    fn builds_analyze_url() {
        let client = FormRecognizerClient::new("https://ropsdoc.cognitiveservices.azure.com/", "k");
        assert_eq!(
            client.analyze_url(AnalysisModel::Read),
            "https://ropsdoc.cognitiveservices.azure.com/formrecognizer/documentModels/prebuilt-read:analyze?api-version=2023-07-31"
        );
    }

    #[tokio::test]
    async fn polls_until_succeeded() {
        let outcome = json!({
            "status": "succeeded",
            "analyzeResult": {
                "content": "Buna ziua",
                "pages": [{"pageNumber": 1, "lines": [{"content": "Buna"}, {"content": "ziua"}]}]
            }
        });
        let (client, polls) = spawn_fake(2, outcome).await;

        let result = client.analyze(AnalysisModel::Read, &pdf()).await.unwrap();
        assert_eq!(result.content, "Buna ziua");
        assert_eq!(result.pages[0].lines.len(), 2);
        assert_eq!(polls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn retry_after_header_overrides_interval() {
        let outcome = json!({"status": "succeeded", "analyzeResult": {"content": "gata"}});
        let script = Script { retry_after: Some("0"), ..Script::new(2, outcome) };
        // With the configured interval every wait would take a minute.
        let (client, polls) = spawn_scripted(script, Duration::from_secs(60)).await;

        let result = tokio::time::timeout(Duration::from_secs(10), client.analyze(AnalysisModel::Read, &pdf()))
            .await
            .expect("Retry-After: 0 should skip the configured interval")
            .unwrap();
        assert_eq!(result.content, "gata");
        assert_eq!(polls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn parses_retry_after_seconds() {
        let mut headers = reqwest::header::HeaderMap::new();
        assert_eq!(retry_after(&headers), None);
        headers.insert("Retry-After", reqwest::header::HeaderValue::from_static(" 2 "));
        assert_eq!(retry_after(&headers), Some(Duration::from_secs(2)));
        headers.insert("Retry-After", reqwest::header::HeaderValue::from_static("Wed, 21 Oct 2015 07:28:00 GMT"));
        assert_eq!(retry_after(&headers), None);
    }

    #[tokio::test]
    async fn accepted_without_operation_location_is_an_error() {
        let script = Script { send_location: false, ..Script::new(0, json!({})) };
        let (client, polls) = spawn_scripted(script, Duration::from_millis(5)).await;

        let err = client.analyze(AnalysisModel::IdDocument, &pdf()).await.unwrap_err();
        assert!(err.to_string().contains("no Operation-Location header"));
        assert_eq!(polls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn surfaces_failed_operation() {
        let outcome = json!({
            "status": "failed",
            "error": {"code": "InvalidContent", "message": "The file is corrupted."}
        });
        let (client, _) = spawn_fake(0, outcome).await;

        let err = client.analyze(AnalysisModel::IdDocument, &pdf()).await.unwrap_err();
        assert!(err.to_string().contains("InvalidContent: The file is corrupted."));
    }

    #[tokio::test]
    async fn gives_up_after_max_polls() {
        let (client, polls) = spawn_fake(usize::MAX, json!({})).await;

        let err = client.analyze(AnalysisModel::Read, &pdf()).await.unwrap_err();
        assert!(err.to_string().contains("did not finish after 5 polls"));
        assert_eq!(polls.load(Ordering::SeqCst), 5);
    }
}
