//! CLI Process Command: run the pipeline once on a local file.

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::json;

use ropsdoc_config::AppConfig;
use ropsdoc_core::DocumentKind;

use crate::runtime::{build_processor, ensure_valid, open_store};
use crate::terminal_output::note_success;

pub async fn run(config: &AppConfig, kind: DocumentKind, file: &Path, save: bool) -> Result<()> {
    ensure_valid(config)?;

    let bytes = tokio::fs::read(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let filename = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.display().to_string());

    let processor = build_processor(config, open_store(config, !save)?);

    let output = match kind {
        DocumentKind::IdCard => {
            let extraction = processor.process_id_card(&filename, &bytes).await?;
            let record = if save { Some(processor.save_id_card(&extraction).await?) } else { None };
            json!({ "extraction": extraction, "record": record })
        }
        DocumentKind::Handwritten => {
            let extraction = processor.process_handwritten(&filename, &bytes).await?;
            let record = if save { Some(processor.save_handwritten(&extraction).await?) } else { None };
            json!({ "extraction": extraction, "record": record })
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    if save {
        note_success(&format!("Saved to {}", config.database.path));
    }
    Ok(())
}
