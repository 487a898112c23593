pub mod sqlite_store;
pub mod store;

pub use sqlite_store::SqliteRecordStore;
pub use store::{InMemoryRecordStore, RecordStore};
