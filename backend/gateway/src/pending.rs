//! Registry of extractions waiting to be saved.
//!
//! An extraction is taken out of the registry when it is saved, so each
//! processed upload can produce at most one record. Entries expire after a TTL.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use ropsdoc_core::DocumentKind;
use ropsdoc_pipeline::{HandwrittenExtraction, IdCardExtraction};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub enum PendingExtraction {
    IdCard(IdCardExtraction),
    Handwritten(HandwrittenExtraction),
}

impl PendingExtraction {
    pub fn id(&self) -> Uuid {
        match self {
            PendingExtraction::IdCard(e) => e.extraction_id,
            PendingExtraction::Handwritten(e) => e.extraction_id,
        }
    }

    pub fn kind(&self) -> DocumentKind {
        match self {
            PendingExtraction::IdCard(_) => IdCardExtraction::KIND,
            PendingExtraction::Handwritten(_) => HandwrittenExtraction::KIND,
        }
    }
}

/// A pending extraction together with the time it was first registered.
#[derive(Debug)]
pub struct PendingEntry {
    pub extraction: PendingExtraction,
    inserted_at: Instant,
}

#[derive(Clone)]
pub struct PendingRegistry {
    entries: Arc<RwLock<HashMap<Uuid, PendingEntry>>>,
    ttl: Duration,
}

impl PendingRegistry {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Hold an extraction until it is saved or expires.
    pub async fn insert(&self, extraction: PendingExtraction) {
        let mut w = self.entries.write().await;
        let ttl = self.ttl;
        w.retain(|_, entry| entry.inserted_at.elapsed() < ttl);
        w.insert(extraction.id(), PendingEntry { extraction, inserted_at: Instant::now() });
    }

    /// Remove and return the extraction if it exists, has the given kind, and has not expired.
    pub async fn take(&self, id: Uuid, kind: DocumentKind) -> Option<PendingEntry> {
        let mut w = self.entries.write().await;
        let entry = w.get(&id)?;
        if entry.extraction.kind() != kind {
            return None;
        }
        let entry = w.remove(&id)?;
        if entry.inserted_at.elapsed() >= self.ttl {
            debug!(%id, "Pending extraction expired");
            return None;
        }
        Some(entry)
    }

    /// Put back an entry whose save failed so the user can try again.
    ///
    /// The entry keeps its original registration time, so retries never extend its lifetime.
    pub async fn restore(&self, entry: PendingEntry) {
        let mut w = self.entries.write().await;
        w.insert(entry.extraction.id(), entry);
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
