//! CLI Records Command

use anyhow::Result;

use ropsdoc_config::AppConfig;
use ropsdoc_core::{validate_cnp, DocumentKind};
use ropsdoc_storage::{RecordStore, SqliteRecordStore};

use crate::terminal_output::{cnp_cell, note_info, render_table, Column};

pub async fn run(config: &AppConfig, kind: Option<DocumentKind>, limit: usize) -> Result<()> {
    let store = SqliteRecordStore::open(&config.database.path)?;
    let records = store.list_recent(kind, limit.max(1)).await?;

    if records.is_empty() {
        note_info(&format!("No records in {}", config.database.path));
        return Ok(());
    }

    let columns = vec![
        Column::left("Created"),
        Column::left("Kind"),
        Column::left("First name"),
        Column::left("Last name"),
        Column::left("CNP"),
        Column::left("Summary").max_width(40),
        Column::left("ID"),
    ];
    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|r| {
            vec![
                r.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                r.kind.to_string(),
                r.first_name.clone(),
                r.last_name.clone(),
                cnp_cell(&r.cnp, validate_cnp(&r.cnp)),
                r.summary.clone(),
                r.id.to_string(),
            ]
        })
        .collect();

    print!("{}", render_table(&columns, &rows));
    Ok(())
}
