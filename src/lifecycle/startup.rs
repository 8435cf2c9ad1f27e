//! Startup orchestration.
//!
//! # Responsibilities
//! - Create the request log directory (with parents)
//! - Start the metrics exporter when enabled
//! - Bind the listener last, so traffic only arrives once ready

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::BeaconConfig;
use crate::observability::metrics;

/// Fatal errors raised before the server starts accepting connections.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to create log directory {path}: {source}")]
    LogDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid metrics address {0:?}")]
    MetricsAddress(String),

    #[error("failed to start metrics exporter: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),
}

/// Create `path` and any missing parents.
pub fn prepare_log_directory(path: &Path) -> Result<(), StartupError> {
    std::fs::create_dir_all(path).map_err(|source| StartupError::LogDirectory {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), "Request log directory ready");
    Ok(())
}

/// Bind the configured `host:port`.
pub async fn bind_listener(config: &BeaconConfig) -> Result<TcpListener, StartupError> {
    let address = config.bind_address();
    TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind { address, source })
}

/// Run every startup step in order and return the bound listener.
pub async fn start(config: &BeaconConfig) -> Result<TcpListener, StartupError> {
    prepare_log_directory(&config.server.request_log_directory)?;

    let observability = &config.observability;
    if observability.metrics_enabled {
        let addr: SocketAddr = observability
            .metrics_address
            .parse()
            .map_err(|_| StartupError::MetricsAddress(observability.metrics_address.clone()))?;
        metrics::init_metrics(addr)?;
    }

    let listener = bind_listener(config).await?;
    let port = listener
        .local_addr()
        .map(|addr| addr.port())
        .unwrap_or(config.server.port);
    tracing::info!(port, "Serving on port");

    Ok(listener)
}
