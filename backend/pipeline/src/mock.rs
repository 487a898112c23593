use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use ropsdoc_core::{AnalysisModel, AnalyzeResult, DocumentAnalyzer, PreparedDocument};

/// An analyzer that returns a canned result and records every call.
pub struct MockAnalyzer {
    result: AnalyzeResult,
    failure: Option<String>,
    calls: Mutex<Vec<(AnalysisModel, String)>>,
}

impl MockAnalyzer {
    pub fn new(result: AnalyzeResult) -> Self {
        Self {
            result,
            failure: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// An analyzer whose every call fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::new(AnalyzeResult::default())
        }
    }

    /// A read-model result whose single page holds `lines`.
    pub fn with_lines(lines: &[&str]) -> Self {
        let page = ropsdoc_core::DocumentPage {
            page_number: 1,
            lines: lines
                .iter()
                .map(|l| ropsdoc_core::PageLine { content: l.to_string() })
                .collect(),
        };
        Self::new(AnalyzeResult {
            model_id: AnalysisModel::Read.model_id().to_string(),
            content: lines.join("\n"),
            pages: vec![page],
            documents: Vec::new(),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Model and filename of every call, in order.
    pub fn calls(&self) -> Vec<(AnalysisModel, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl DocumentAnalyzer for MockAnalyzer {
    fn name(&self) -> &str {
        "mock-analyzer"
    }

    async fn analyze(&self, model: AnalysisModel, document: &PreparedDocument) -> Result<AnalyzeResult> {
        self.calls
            .lock()
            .unwrap()
            .push((model, document.filename.clone()));
        match &self.failure {
            Some(message) => Err(anyhow!(message.clone())),
            None => Ok(self.result.clone()),
        }
    }
}
