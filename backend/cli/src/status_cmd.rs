//! CLI Status Command

use anyhow::{Context, Result};

use ropsdoc_gateway::HealthReport;

use crate::terminal_output::{note_error, note_success, note_warn};

pub async fn run(base_url: &str) -> Result<()> {
    let url = format!("{}/api/health", base_url.trim_end_matches('/'));
    println!("\n📊 ROPSDoc status ({url})\n");

    let response = match reqwest::get(&url).await {
        Ok(response) => response,
        Err(e) => {
            note_error(&format!("ROPSDoc is not reachable at {base_url}: {e}"));
            return Ok(());
        }
    };
    let health: HealthReport = response
        .error_for_status()?
        .json()
        .await
        .context("Unexpected health response")?;

    if health.status == "ok" {
        note_success(&format!("Status: {}", health.status));
    } else {
        note_warn(&format!("Status: {}", health.status));
    }
    println!("  Version:             {}", health.version);
    println!("  Uptime:              {}s", health.uptime_seconds);
    match health.record_count {
        Some(count) => println!("  Records:             {count}"),
        None => println!("  Records:             unavailable"),
    }
    println!("  Pending extractions: {}", health.pending_extractions);
    println!("  Analyzer:            {}", health.analyzer);
    println!("  LLM provider:        {}", health.llm_provider);

    Ok(())
}
