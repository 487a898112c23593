//! CLI Serve Command

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;

use ropsdoc_config::AppConfig;
use ropsdoc_gateway::{start_server, GatewayState};

use crate::runtime::{build_processor, ensure_valid, open_store};

pub async fn run(config: AppConfig, ephemeral: bool) -> Result<()> {
    ensure_valid(&config)?;

    let addr: SocketAddr = config
        .server
        .address()
        .parse()
        .with_context(|| format!("Invalid bind address '{}'", config.server.address()))?;

    info!(
        addr = %addr,
        db = %config.database.path,
        ephemeral,
        "Starting ROPSDoc server"
    );

    let store = open_store(&config, ephemeral)?;
    let processor = Arc::new(build_processor(&config, store));
    let state = GatewayState::new(
        processor,
        Duration::from_secs(config.server.pending_ttl_secs),
        config.server.max_upload_bytes,
    );

    start_server(addr, state).await
}
