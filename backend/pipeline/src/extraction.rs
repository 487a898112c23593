use serde::{Deserialize, Serialize};
use uuid::Uuid;

use ropsdoc_core::{CnpStatus, DocumentKind, HandwrittenData, IdCardData};

/// Result of processing an ID card upload, held until the user saves it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdCardExtraction {
    pub extraction_id: Uuid,
    pub filename: String,
    /// Full OCR content of the card.
    pub raw_text: String,
    pub data: IdCardData,
    pub cnp_status: CnpStatus,
}

/// Result of processing a handwritten document upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandwrittenExtraction {
    pub extraction_id: Uuid,
    pub filename: String,
    pub data: HandwrittenData,
    pub cnp_status: CnpStatus,
}

impl IdCardExtraction {
    pub const KIND: DocumentKind = DocumentKind::IdCard;

    /// Only a card with a valid CNP may become a record.
    pub fn is_savable(&self) -> bool {
        CnpStatus::of(&self.data.cnp) == CnpStatus::Valid
    }
}

impl HandwrittenExtraction {
    pub const KIND: DocumentKind = DocumentKind::Handwritten;

    /// Notes without a CNP are fine; a CNP that is present must be valid.
    pub fn is_savable(&self) -> bool {
        CnpStatus::of(&self.data.cnp) != CnpStatus::Invalid
    }
}
