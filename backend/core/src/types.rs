use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DocError;

/// The category of an uploaded document, chosen by the user at upload time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// Scanned identity card, analyzed with the prebuilt ID model.
    IdCard,
    /// Handwritten note, read with OCR and refined by the LLM.
    Handwritten,
}

impl DocumentKind {
    /// Stable tag stored in the database and used in the API.
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::IdCard => "id_card",
            DocumentKind::Handwritten => "handwritten",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentKind {
    type Err = DocError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "id_card" | "id" => Ok(DocumentKind::IdCard),
            "handwritten" => Ok(DocumentKind::Handwritten),
            other => Err(DocError::Validation(format!("unknown document kind '{other}'"))),
        }
    }
}

/// An upload that passed validation and is ready to be sent for analysis.
#[derive(Debug, Clone)]
pub struct PreparedDocument {
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

impl PreparedDocument {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// One field reported by the ID model, kept for the data preview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedField {
    pub name: String,
    pub value: String,
    pub confidence: Option<f64>,
}

/// Data read from an ID card.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IdCardData {
    pub first_name: String,
    pub last_name: String,
    /// Digits only.
    pub cnp: String,
    /// Every field the model returned, sorted by name.
    #[serde(default)]
    pub fields: Vec<ExtractedField>,
}

/// Data produced from a handwritten document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HandwrittenData {
    /// Raw OCR output, lines joined with `\n`.
    pub raw_text: String,
    /// OCR output after LLM cleanup.
    pub extracted_text: String,
    /// Summary in Romanian.
    pub summary: String,
    pub first_name: String,
    pub last_name: String,
    pub cnp: String,
}
