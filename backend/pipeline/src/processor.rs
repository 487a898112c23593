//! The document processor: one upload in, one extraction out, one record per save.
//!
//! Every step runs sequentially. A failure at any step aborts the request and
//! surfaces as a [`DocError`]; nothing is retried.

use std::sync::Arc;
use std::time::Instant;

use ropsdoc_core::{
    AnalysisModel, AnalyzeResult, CnpStatus, DocError, DocumentAnalyzer, DocumentKind, DocumentRecord,
    HandwrittenData, NewDocumentRecord, PreparedDocument,
};
use ropsdoc_llm::TextRefiner;
use ropsdoc_logging::{ProcessingEvent, ProcessingEventLogger};
use ropsdoc_storage::RecordStore;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::extraction::{HandwrittenExtraction, IdCardExtraction};

pub struct DocumentProcessor {
    analyzer: Arc<dyn DocumentAnalyzer>,
    refiner: TextRefiner,
    store: Arc<dyn RecordStore>,
}

impl DocumentProcessor {
    pub fn new(analyzer: Arc<dyn DocumentAnalyzer>, refiner: TextRefiner, store: Arc<dyn RecordStore>) -> Self {
        Self { analyzer, refiner, store }
    }

    pub fn analyzer_name(&self) -> &str {
        self.analyzer.name()
    }

    pub fn llm_provider_name(&self) -> &str {
        self.refiner.provider_name()
    }

    /// Extract name and CNP from an ID card image.
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn process_id_card(&self, filename: &str, bytes: &[u8]) -> Result<IdCardExtraction, DocError> {
        let extraction_id = Uuid::new_v4();
        let result = self
            .prepare_and_analyze(extraction_id, DocumentKind::IdCard, AnalysisModel::IdDocument, filename, bytes)
            .await?;

        let data = ropsdoc_understanding::id_card_from_result(&result);
        let cnp_status = CnpStatus::of(&data.cnp);
        if cnp_status != CnpStatus::Valid {
            warn!(%extraction_id, ?cnp_status, "ID card CNP did not pass validation");
        }

        Ok(IdCardExtraction {
            extraction_id,
            filename: filename.to_string(),
            raw_text: result.content,
            data,
            cnp_status,
        })
    }

    /// Read a handwritten document, clean the text, and extract its fields.
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn process_handwritten(&self, filename: &str, bytes: &[u8]) -> Result<HandwrittenExtraction, DocError> {
        let extraction_id = Uuid::new_v4();
        let kind = DocumentKind::Handwritten;
        let result = self
            .prepare_and_analyze(extraction_id, kind, AnalysisModel::Read, filename, bytes)
            .await?;
        let raw_text = ropsdoc_understanding::read_text_from_result(&result);

        let started = Instant::now();
        let extracted_text = self
            .refiner
            .clean_text(&raw_text)
            .await
            .inspect_err(|e| self.log_failure(extraction_id, kind, "clean_text", e))?;
        self.log_refined(extraction_id, "clean_text", started);

        let started = Instant::now();
        let fields = self
            .refiner
            .extract_fields(&extracted_text)
            .await
            .inspect_err(|e| self.log_failure(extraction_id, kind, "extract_fields", e))?;
        self.log_refined(extraction_id, "extract_fields", started);

        let data = HandwrittenData {
            raw_text,
            extracted_text,
            summary: fields.summary,
            first_name: fields.first_name,
            last_name: fields.last_name,
            cnp: fields.cnp,
        };
        let cnp_status = CnpStatus::of(&data.cnp);

        Ok(HandwrittenExtraction {
            extraction_id,
            filename: filename.to_string(),
            data,
            cnp_status,
        })
    }

    /// Persist an ID card extraction. Refused unless the CNP is valid.
    pub async fn save_id_card(&self, extraction: &IdCardExtraction) -> Result<DocumentRecord, DocError> {
        if !extraction.is_savable() {
            return Err(DocError::Validation(
                "the CNP is missing or invalid; the ID card was not saved".to_string(),
            ));
        }
        let record = NewDocumentRecord::from_id_card(&extraction.data, extraction.raw_text.clone());
        self.insert(extraction.extraction_id, record).await
    }

    /// Persist a handwritten extraction exactly as extracted.
    pub async fn save_handwritten(&self, extraction: &HandwrittenExtraction) -> Result<DocumentRecord, DocError> {
        if !extraction.is_savable() {
            return Err(DocError::Validation(
                "the extracted CNP is invalid; the document was not saved".to_string(),
            ));
        }
        let record = NewDocumentRecord::from_handwritten(&extraction.data);
        self.insert(extraction.extraction_id, record).await
    }

    pub async fn recent_records(&self, kind: Option<DocumentKind>, limit: usize) -> Result<Vec<DocumentRecord>, DocError> {
        self.store
            .list_recent(kind, limit)
            .await
            .map_err(|e| DocError::Storage(format!("{e:#}")))
    }

    pub async fn record(&self, id: Uuid) -> Result<DocumentRecord, DocError> {
        self.store
            .get(id)
            .await
            .map_err(|e| DocError::Storage(format!("{e:#}")))?
            .ok_or_else(|| DocError::NotFound(format!("record {id}")))
    }

    pub async fn record_count(&self) -> Result<usize, DocError> {
        self.store.count().await.map_err(|e| DocError::Storage(format!("{e:#}")))
    }

    // -----------------------------------------------------------------------
    // Steps
    // -----------------------------------------------------------------------

    async fn prepare_and_analyze(
        &self,
        extraction_id: Uuid,
        kind: DocumentKind,
        model: AnalysisModel,
        filename: &str,
        bytes: &[u8],
    ) -> Result<AnalyzeResult, DocError> {
        let document: PreparedDocument = ropsdoc_media::prepare_upload(filename, bytes)
            .inspect_err(|e| self.log_failure(extraction_id, kind, "upload", e))?;
        self.log(extraction_id, kind, ProcessingEvent::UploadAccepted {
            filename: document.filename.clone(),
            content_type: document.content_type.to_string(),
            size: document.len(),
        });

        let started = Instant::now();
        let result = self
            .analyzer
            .analyze(model, &document)
            .await
            .map_err(|e| DocError::Ocr(format!("{e:#}")))
            .inspect_err(|e| self.log_failure(extraction_id, kind, "analyze", e))?;

        self.log(extraction_id, kind, ProcessingEvent::Analyzed {
            model: model.model_id().to_string(),
            latency_ms: started.elapsed().as_millis() as u64,
            text_len: result.content.chars().count(),
        });
        Ok(result)
    }

    async fn insert(&self, extraction_id: Uuid, record: NewDocumentRecord) -> Result<DocumentRecord, DocError> {
        let kind = record.kind;
        let saved = self
            .store
            .insert(record)
            .await
            .map_err(|e| DocError::Storage(format!("{e:#}")))
            .inspect_err(|e| self.log_failure(extraction_id, kind, "save", e))?;

        info!(%extraction_id, record_id = %saved.id, %kind, "Saved document record");
        self.log(extraction_id, kind, ProcessingEvent::Saved {
            record_id: saved.id.to_string(),
            cnp: saved.cnp.clone(),
        });
        Ok(saved)
    }

    // -----------------------------------------------------------------------
    // Events
    // -----------------------------------------------------------------------

    fn log(&self, extraction_id: Uuid, kind: DocumentKind, event: ProcessingEvent) {
        ProcessingEventLogger::log_event(&extraction_id.to_string(), kind.as_str(), event);
    }

    fn log_refined(&self, extraction_id: Uuid, step: &str, started: Instant) {
        self.log(extraction_id, DocumentKind::Handwritten, ProcessingEvent::Refined {
            provider: self.refiner.provider_name().to_string(),
            step: step.to_string(),
            latency_ms: started.elapsed().as_millis() as u64,
        });
    }

    fn log_failure(&self, extraction_id: Uuid, kind: DocumentKind, stage: &str, error: &DocError) {
        self.log(extraction_id, kind, ProcessingEvent::Failed {
            stage: stage.to_string(),
            error_msg: error.to_string(),
        });
    }
}
