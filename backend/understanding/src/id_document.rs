//! Field mapping for the prebuilt ID document model.

use ropsdoc_core::{AnalyzeResult, AnalyzedDocument, ExtractedField, IdCardData};
use tracing::debug;

pub const FIRST_NAME: &str = "FirstName";
pub const LAST_NAME: &str = "LastName";
pub const PERSONAL_NUMBER: &str = "PersonalNumber";

/// Map an ID analysis into card data.
///
/// When the service reports several documents the last one wins. A result
/// without documents yields empty fields, which the caller reports as a
/// missing CNP.
pub fn id_card_from_result(result: &AnalyzeResult) -> IdCardData {
    let Some(document) = result.documents.last() else {
        debug!("ID analysis returned no documents");
        return IdCardData::default();
    };

    debug!(doc_type = %document.doc_type, fields = document.fields.len(), "Mapping ID document");

    IdCardData {
        first_name: field_text(document, FIRST_NAME),
        last_name: field_text(document, LAST_NAME),
        cnp: digits_only(&field_text(document, PERSONAL_NUMBER)),
        fields: preview_fields(document),
    }
}

fn field_text(document: &AnalyzedDocument, name: &str) -> String {
    document
        .fields
        .get(name)
        .map(|f| f.text())
        .unwrap_or_default()
}

/// Keep only ASCII digits; OCR often inserts spaces or separators in the CNP.
pub fn digits_only(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

fn preview_fields(document: &AnalyzedDocument) -> Vec<ExtractedField> {
    // BTreeMap iteration keeps the preview sorted by field name.
    document
        .fields
        .iter()
        .map(|(name, field)| ExtractedField {
            name: name.clone(),
            value: field.text(),
            confidence: field.confidence,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn result(documents: serde_json::Value) -> AnalyzeResult {
        serde_json::from_value(json!({ "content": "ROMANIA", "documents": documents })).unwrap()
    }

    #[test]
    fn maps_names_and_cnp() {
        let r = result(json!([{
            "docType": "idDocument.nationalIdentityCard",
            "fields": {
                "FirstName": {"type": "string", "valueString": " Ion ", "confidence": 0.95},
                "LastName": {"type": "string", "valueString": "Popescu", "confidence": 0.93},
                "PersonalNumber": {"type": "string", "content": "1800101 221144", "confidence": 0.9}
            }
        }]));

        let card = id_card_from_result(&r);
        assert_eq!(card.first_name, "Ion");
        assert_eq!(card.last_name, "Popescu");
        assert_eq!(card.cnp, "1800101221144");
        let names: Vec<_> = card.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["FirstName", "LastName", "PersonalNumber"]);
        assert_eq!(card.fields[0].confidence, Some(0.95));
    }

    #[test]
    fn missing_fields_are_empty() {
        let r = result(json!([{ "fields": { "FirstName": {"valueString": "Ana"} } }]));
        let card = id_card_from_result(&r);
        assert_eq!(card.first_name, "Ana");
        assert!(card.last_name.is_empty());
        assert!(card.cnp.is_empty());
    }

    #[test]
    fn no_documents_yields_default() {
        assert_eq!(id_card_from_result(&result(json!([]))), IdCardData::default());
    }

    #[test]
    fn last_document_wins() {
        let r = result(json!([
            { "fields": { "FirstName": {"valueString": "First"} } },
            { "fields": { "FirstName": {"valueString": "Second"} } }
        ]));
        assert_eq!(id_card_from_result(&r).first_name, "Second");
    }
}
