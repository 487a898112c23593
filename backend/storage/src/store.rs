use std::sync::RwLock;

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use ropsdoc_core::{DocumentKind, DocumentRecord, NewDocumentRecord};

/// Abstract interface for document record persistence.
///
/// Records are append-only: there is no update or delete.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert a record, assigning its id and creation time.
    async fn insert(&self, record: NewDocumentRecord) -> Result<DocumentRecord>;

    /// Fetch a record by id.
    async fn get(&self, id: Uuid) -> Result<Option<DocumentRecord>>;

    /// Most recent records first, optionally restricted to one kind.
    async fn list_recent(&self, kind: Option<DocumentKind>, limit: usize) -> Result<Vec<DocumentRecord>>;

    /// Total number of stored records.
    async fn count(&self) -> Result<usize>;
}

/// Simple in-memory store for tests and ephemeral runs.
#[derive(Default)]
pub struct InMemoryRecordStore {
    records: RwLock<Vec<DocumentRecord>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn insert(&self, record: NewDocumentRecord) -> Result<DocumentRecord> {
        let record = record.into_record();
        self.records.write().unwrap().push(record.clone());
        Ok(record)
    }

    async fn get(&self, id: Uuid) -> Result<Option<DocumentRecord>> {
        let records = self.records.read().unwrap();
        Ok(records.iter().find(|r| r.id == id).cloned())
    }

    async fn list_recent(&self, kind: Option<DocumentKind>, limit: usize) -> Result<Vec<DocumentRecord>> {
        let records = self.records.read().unwrap();
        // Insertion order is creation order, so walk backwards.
        Ok(records
            .iter()
            .rev()
            .filter(|r| kind.map_or(true, |k| r.kind == k))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.records.read().unwrap().len())
    }
}
