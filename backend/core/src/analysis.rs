//! Document analysis result model.
//!
//! These types deserialize directly from the `analyzeResult` object returned by
//! the Form Recognizer REST API. Only the parts the pipeline reads are modelled;
//! everything else in the payload is ignored.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Prebuilt analysis model to run against a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnalysisModel {
    /// Identity documents (passports, national ID cards).
    IdDocument,
    /// Printed and handwritten text, line by line.
    Read,
}

impl AnalysisModel {
    pub fn model_id(&self) -> &'static str {
        match self {
            AnalysisModel::IdDocument => "prebuilt-idDocument",
            AnalysisModel::Read => "prebuilt-read",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResult {
    #[serde(default)]
    pub model_id: String,
    /// Concatenated text of the whole document.
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub pages: Vec<DocumentPage>,
    #[serde(default)]
    pub documents: Vec<AnalyzedDocument>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentPage {
    #[serde(default)]
    pub page_number: u32,
    #[serde(default)]
    pub lines: Vec<PageLine>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageLine {
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzedDocument {
    #[serde(default)]
    pub doc_type: String,
    #[serde(default)]
    pub fields: BTreeMap<String, DocumentField>,
    #[serde(default)]
    pub confidence: Option<f64>,
}

/// A typed field value. The service reports the semantic value in
/// `valueString` (for string fields) and the raw recognized text in `content`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentField {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub value_string: Option<String>,
    #[serde(default)]
    pub value_date: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
}

impl DocumentField {
    /// Best textual value: `valueString`, then `valueDate`, then `content`,
    /// trimmed. Empty when none are present.
    pub fn text(&self) -> String {
        [&self.value_string, &self.value_date, &self.content]
            .into_iter()
            .flatten()
            .map(|s| s.trim())
            .find(|s| !s.is_empty())
            .unwrap_or_default()
            .to_string()
    }
}
