//! Configuration schema definitions.
//!
//! Mirrors the TOML layout:
//!
//! ```toml
//! [server]
//! port = 8000
//! request_log_directory = "logs"
//! whitelisted_domains = ["example.com"]
//!
//! [queue]
//! size = 100
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration for the beacon.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct BeaconConfig {
    /// Listener, log directory and whitelist.
    pub server: ServerConfig,

    /// Request buffer sizing.
    pub queue: QueueConfig,

    /// Logging and metrics settings.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl BeaconConfig {
    /// Address the listener binds to, `host:port`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Bind host (default: all interfaces).
    #[serde(default = "default_host")]
    pub host: String,

    /// TCP port to listen on.
    pub port: u16,

    /// Directory receiving `requests_<timestamp>.json` flush files.
    pub request_log_directory: PathBuf,

    /// Domains allowed to trigger logging and receive a 200.
    pub whitelisted_domains: Vec<String>,

    /// Longest a request waits on the buffer before it is answered, in
    /// seconds. The append itself is never cancelled.
    #[serde(default = "default_append_timeout_secs")]
    pub append_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: 8000,
            request_log_directory: PathBuf::from("request_logs"),
            whitelisted_domains: Vec::new(),
            append_timeout_secs: default_append_timeout_secs(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_append_timeout_secs() -> u64 {
    30
}

/// Request buffer configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QueueConfig {
    /// Number of records held in memory before a flush.
    pub size: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self { size: 100 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
