//! css-beacon
//!
//! # Architecture Overview
//!
//! ```text
//!     Client GET/HEAD          ┌───────────────────────────────────────────────┐
//!     ─────────────────────────┼─▶ http server ──▶ whitelist ──▶ 403           │
//!                              │                      │                        │
//!                              │                      ▼                        │
//!                              │               request buffer ──(full)──▶ flush│──▶ requests_<ts>.json
//!                              │                      │                        │
//!     200 text/css, empty      │                      ▼                        │
//!     ◀────────────────────────┼──────────────── fixed response                │
//!                              └───────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;

use css_beacon::config::load_config;
use css_beacon::http::BeaconServer;
use css_beacon::lifecycle::{startup, Shutdown};
use css_beacon::observability::logging;

#[derive(Parser)]
#[command(name = "css-beacon", version)]
#[command(about = "Serves an empty stylesheet to whitelisted domains and logs each hit", long_about = None)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, env = "BEACON_CONFIG", default_value = "config.toml")]
    config: PathBuf,

    /// Override `server.port` from the configuration file
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = load_config(&cli.config)?;
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    logging::init_logging(&config.observability.log_level);

    tracing::info!(
        config = %cli.config.display(),
        port = config.server.port,
        queue_size = config.queue.size,
        log_directory = %config.server.request_log_directory.display(),
        whitelisted_domains = ?config.server.whitelisted_domains,
        "Configuration loaded"
    );

    let listener = startup::start(&config).await?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    shutdown.trigger_on_signal();

    let server = BeaconServer::new(&config);
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
