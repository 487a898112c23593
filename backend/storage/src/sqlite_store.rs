/// SQLite-backed document record store.
///
/// Uses `rusqlite` to persist `DocumentRecord` rows in a `document_records`
/// table. All statements are parameterized; the store only ever issues INSERT
/// and SELECT against that table.
use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension};
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use ropsdoc_core::{DocumentKind, DocumentRecord, NewDocumentRecord};

use crate::store::RecordStore;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS document_records (
         id           TEXT PRIMARY KEY,
         kind         TEXT NOT NULL,
         raw_text     TEXT NOT NULL,
         cleaned_text TEXT NOT NULL,
         summary      TEXT NOT NULL,
         first_name   TEXT NOT NULL,
         last_name    TEXT NOT NULL,
         cnp          TEXT NOT NULL,
         created_at   TEXT NOT NULL
     );
     CREATE INDEX IF NOT EXISTS idx_document_records_kind ON document_records(kind);
     CREATE INDEX IF NOT EXISTS idx_document_records_created ON document_records(created_at);";

const SELECT_COLUMNS: &str =
    "SELECT id, kind, raw_text, cleaned_text, summary, first_name, last_name, cnp, created_at
     FROM document_records";

pub struct SqliteRecordStore {
    conn: Mutex<Connection>,
}

impl SqliteRecordStore {
    /// Create or open a database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path.as_ref())
            .context("Failed to open SQLite records database")?;

        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .context("Failed to enable WAL journal")?;
        conn.execute_batch(SCHEMA)
            .context("Failed to initialize document_records schema")?;

        info!("SqliteRecordStore opened at {:?}", path.as_ref());
        Ok(Self { conn: Mutex::new(conn) })
    }

    /// Open an in-memory database (for tests).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn: Mutex::new(conn) })
    }
}

#[async_trait]
impl RecordStore for SqliteRecordStore {
    async fn insert(&self, record: NewDocumentRecord) -> Result<DocumentRecord> {
        let record = record.into_record();
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO document_records
                 (id, kind, raw_text, cleaned_text, summary, first_name, last_name, cnp, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                record.id.to_string(),
                record.kind.as_str(),
                record.raw_text,
                record.cleaned_text,
                record.summary,
                record.first_name,
                record.last_name,
                record.cnp,
                record.created_at.to_rfc3339_opts(SecondsFormat::Micros, true),
            ],
        )
        .context("Failed to insert document record")?;
        debug!(id = %record.id, kind = %record.kind, "Inserted document record");
        Ok(record)
    }

    async fn get(&self, id: Uuid) -> Result<Option<DocumentRecord>> {
        let conn = self.conn.lock().await;
        let sql = format!("{SELECT_COLUMNS} WHERE id = ?1");
        let record = conn
            .query_row(&sql, params![id.to_string()], row_to_record)
            .optional()
            .context("Failed to load document record")?;
        Ok(record)
    }

    async fn list_recent(&self, kind: Option<DocumentKind>, limit: usize) -> Result<Vec<DocumentRecord>> {
        let conn = self.conn.lock().await;
        let limit = limit as i64;

        // rowid breaks ties between rows written in the same microsecond.
        let records = match kind {
            Some(kind) => {
                let sql = format!(
                    "{SELECT_COLUMNS} WHERE kind = ?1 ORDER BY created_at DESC, rowid DESC LIMIT ?2"
                );
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt
                    .query_map(params![kind.as_str(), limit], row_to_record)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                rows
            }
            None => {
                let sql = format!("{SELECT_COLUMNS} ORDER BY created_at DESC, rowid DESC LIMIT ?1");
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt
                    .query_map(params![limit], row_to_record)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                rows
            }
        };

        Ok(records)
    }

    async fn count(&self) -> Result<usize> {
        let conn = self.conn.lock().await;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM document_records", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

// ---------------------------------------------------------------------------
// Row deserialization helper
// ---------------------------------------------------------------------------

fn conversion_error<E>(index: usize, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(err))
}

fn row_to_record(row: &rusqlite::Row) -> rusqlite::Result<DocumentRecord> {
    let id_str: String = row.get(0)?;
    let kind_str: String = row.get(1)?;
    let created_at_str: String = row.get(8)?;

    let id = Uuid::parse_str(&id_str).map_err(|e| conversion_error(0, e))?;
    let kind: DocumentKind = kind_str.parse().map_err(|e| conversion_error(1, e))?;
    let created_at = DateTime::parse_from_rfc3339(&created_at_str)
        .map_err(|e| conversion_error(8, e))?
        .with_timezone(&Utc);

    Ok(DocumentRecord {
        id,
        kind,
        raw_text: row.get(2)?,
        cleaned_text: row.get(3)?,
        summary: row.get(4)?,
        first_name: row.get(5)?,
        last_name: row.get(6)?,
        cnp: row.get(7)?,
        created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handwritten(first_name: &str) -> NewDocumentRecord {
        NewDocumentRecord {
            kind: DocumentKind::Handwritten,
            raw_text: "subsemnatul ion".to_string(),
            cleaned_text: "Subsemnatul Ion.".to_string(),
            summary: "Cerere".to_string(),
            first_name: first_name.to_string(),
            last_name: "Popescu".to_string(),
            cnp: "1800101221144".to_string(),
        }
    }

    #[tokio::test]
    async fn test_sqlite_store_roundtrip() {
        let store = SqliteRecordStore::in_memory().expect("in-memory db");
        let inserted = store.insert(handwritten("Ion")).await.unwrap();

        let loaded = store.get(inserted.id).await.unwrap().expect("record exists");
        assert_eq!(loaded.id, inserted.id);
        assert_eq!(loaded.kind, DocumentKind::Handwritten);
        assert_eq!(loaded.cleaned_text, "Subsemnatul Ion.");
        assert_eq!(loaded.cnp, "1800101221144");
        assert_eq!(loaded.created_at.timestamp_micros(), inserted.created_at.timestamp_micros());

        assert!(store.get(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn lists_newest_first_and_filters_kind() {
        let store = SqliteRecordStore::in_memory().unwrap();
        store.insert(handwritten("Ion")).await.unwrap();
        store
            .insert(NewDocumentRecord { kind: DocumentKind::IdCard, ..handwritten("Ana") })
            .await
            .unwrap();
        store.insert(handwritten("Maria")).await.unwrap();

        let all = store.list_recent(None, 10).await.unwrap();
        let names: Vec<_> = all.iter().map(|r| r.first_name.as_str()).collect();
        assert_eq!(names, ["Maria", "Ana", "Ion"]);

        let notes = store.list_recent(Some(DocumentKind::Handwritten), 10).await.unwrap();
        assert_eq!(notes.len(), 2);
        assert!(notes.iter().all(|r| r.kind == DocumentKind::Handwritten));

        assert_eq!(store.list_recent(None, 1).await.unwrap().len(), 1);
        assert_eq!(store.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.db");

        let id = {
            let store = SqliteRecordStore::open(&path).unwrap();
            store.insert(handwritten("Ion")).await.unwrap().id
        };

        let reopened = SqliteRecordStore::open(&path).unwrap();
        assert_eq!(reopened.get(id).await.unwrap().unwrap().first_name, "Ion");
    }
}
