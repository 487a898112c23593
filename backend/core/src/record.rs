use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{DocumentKind, HandwrittenData, IdCardData};

/// A persisted extraction. Created once per processed upload, never updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub id: Uuid,
    pub kind: DocumentKind,
    pub raw_text: String,
    pub cleaned_text: String,
    pub summary: String,
    pub first_name: String,
    pub last_name: String,
    pub cnp: String,
    pub created_at: DateTime<Utc>,
}

/// Fields supplied by the pipeline when inserting a record. The store assigns
/// `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDocumentRecord {
    pub kind: DocumentKind,
    pub raw_text: String,
    pub cleaned_text: String,
    pub summary: String,
    pub first_name: String,
    pub last_name: String,
    pub cnp: String,
}

impl NewDocumentRecord {
    pub fn from_id_card(data: &IdCardData, raw_text: impl Into<String>) -> Self {
        Self {
            kind: DocumentKind::IdCard,
            raw_text: raw_text.into(),
            cleaned_text: String::new(),
            summary: String::new(),
            first_name: data.first_name.trim().to_string(),
            last_name: data.last_name.trim().to_string(),
            cnp: data.cnp.trim().to_string(),
        }
    }

    pub fn from_handwritten(data: &HandwrittenData) -> Self {
        Self {
            kind: DocumentKind::Handwritten,
            raw_text: data.raw_text.clone(),
            cleaned_text: data.extracted_text.trim().to_string(),
            summary: data.summary.trim().to_string(),
            first_name: data.first_name.trim().to_string(),
            last_name: data.last_name.trim().to_string(),
            cnp: data.cnp.trim().to_string(),
        }
    }

    /// Materialize into a full record with a fresh id and the current time.
    pub fn into_record(self) -> DocumentRecord {
        DocumentRecord {
            id: Uuid::new_v4(),
            kind: self.kind,
            raw_text: self.raw_text,
            cleaned_text: self.cleaned_text,
            summary: self.summary,
            first_name: self.first_name,
            last_name: self.last_name,
            cnp: self.cnp,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_card_record_has_no_llm_fields() {
        let data = IdCardData {
            first_name: " Ion ".into(),
            last_name: "Popescu".into(),
            cnp: "1800101221144".into(),
            fields: vec![],
        };
        let rec = NewDocumentRecord::from_id_card(&data, "ROMANIA\nPOPESCU");
        assert_eq!(rec.kind, DocumentKind::IdCard);
        assert_eq!(rec.first_name, "Ion");
        assert!(rec.cleaned_text.is_empty());
        assert!(rec.summary.is_empty());
        assert_eq!(rec.raw_text, "ROMANIA\nPOPESCU");
    }

    #[test]
    fn handwritten_record_copies_fields() {
        let data = HandwrittenData {
            raw_text: "Subsemnatul Ion".into(),
            extracted_text: "Subsemnatul Ion.".into(),
            summary: "Cerere".into(),
            first_name: "Ion".into(),
            last_name: "Popescu".into(),
            cnp: String::new(),
        };
        let record = NewDocumentRecord::from_handwritten(&data).into_record();
        assert_eq!(record.kind, DocumentKind::Handwritten);
        assert_eq!(record.cleaned_text, "Subsemnatul Ion.");
        assert_eq!(record.summary, "Cerere");
        assert!(record.cnp.is_empty());
    }
}
