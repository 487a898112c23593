mod doctor_cmd;
mod process_cmd;
mod records_cmd;
mod runtime;
mod serve_cmd;
mod status_cmd;
mod terminal_output;

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};

use ropsdoc_core::DocumentKind;

#[derive(Parser)]
#[command(name = "ropsdoc")]
#[command(about = "ROPSDoc: ID card and handwritten document processing service")]
#[command(version)]
struct Cli {
    /// YAML config file; values may reference ${ENV_VARS}
    #[arg(short, long, global = true, env = "ROPSDOC_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web UI and JSON API
    Serve {
        /// Port to bind the HTTP server to
        #[arg(short, long)]
        port: Option<u16>,
        /// Address to bind the HTTP server to
        #[arg(short, long)]
        bind: Option<String>,
        /// Keep records in memory instead of the database file
        #[arg(long)]
        ephemeral: bool,
    },
    /// Process one document and print the extraction as JSON
    Process {
        /// Document kind: id-card or handwritten
        kind: DocumentKind,
        /// PDF, JPG, JPEG or PNG file
        file: PathBuf,
        /// Save the extraction as a record
        #[arg(long)]
        save: bool,
    },
    /// List recently saved records
    Records {
        /// Only show records of this kind
        #[arg(short, long)]
        kind: Option<DocumentKind>,
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },
    /// Check configuration and print the effective (redacted) settings
    Doctor,
    /// Query the health endpoint of a running server
    Status {
        /// Base URL of the server (defaults to the configured port on localhost)
        #[arg(long)]
        url: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = ropsdoc_config::load(cli.config.as_deref()).await?;

    ropsdoc_logging::init_logger(
        &config.logging.level,
        config.logging.dir.as_deref().map(Path::new),
        config.logging.json,
    );

    match cli.command {
        Commands::Serve { port, bind, ephemeral } => {
            let mut config = config;
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(bind) = bind {
                config.server.bind = bind;
            }
            serve_cmd::run(config, ephemeral).await?;
        }
        Commands::Process { kind, file, save } => {
            process_cmd::run(&config, kind, &file, save).await?;
        }
        Commands::Records { kind, limit } => {
            records_cmd::run(&config, kind, limit).await?;
        }
        Commands::Doctor => {
            if !doctor_cmd::run(&config) {
                std::process::exit(1);
            }
        }
        Commands::Status { url } => {
            let url = url.unwrap_or_else(|| format!("http://127.0.0.1:{}", config.server.port));
            status_cmd::run(&url).await?;
        }
    }

    Ok(())
}
