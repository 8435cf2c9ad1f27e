//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

use css_beacon::config::BeaconConfig;
use css_beacon::http::BeaconServer;
use css_beacon::lifecycle::Shutdown;
use css_beacon::RequestBuffer;

/// A beacon running on an ephemeral localhost port.
pub struct TestBeacon {
    pub addr: SocketAddr,
    pub buffer: Arc<RequestBuffer>,
    pub shutdown: Shutdown,
    pub handle: JoinHandle<std::io::Result<()>>,
}

impl TestBeacon {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Config for tests: localhost, given log directory, whitelist and capacity.
pub fn test_config(log_dir: &Path, domains: &[&str], capacity: usize) -> BeaconConfig {
    let mut config = BeaconConfig::default();
    config.server.host = "127.0.0.1".into();
    config.server.port = 0;
    config.server.request_log_directory = log_dir.to_path_buf();
    config.server.whitelisted_domains = domains.iter().map(|d| d.to_string()).collect();
    config.queue.size = capacity;
    config
}

/// Start a beacon server in the background.
pub async fn start_beacon(config: BeaconConfig) -> TestBeacon {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let server = BeaconServer::new(&config);
    let buffer = server.buffer();

    let handle = tokio::spawn(async move { server.run(listener, server_shutdown).await });

    TestBeacon {
        addr,
        buffer,
        shutdown,
        handle,
    }
}

/// HTTP client that never reuses connections or goes through a proxy.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

/// Send a hand-written HTTP/1.1 request and return (status, head, body).
///
/// The request should carry `Connection: close`.
pub async fn raw_request(addr: SocketAddr, request: &str) -> (u16, String, Vec<u8>) {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut response = Vec::new();
    tokio::time::timeout(Duration::from_secs(5), stream.read_to_end(&mut response))
        .await
        .expect("response timed out")
        .unwrap();

    let split = response
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .expect("no header terminator");
    let head = String::from_utf8_lossy(&response[..split]).into_owned();
    let body = response[split + 4..].to_vec();
    let status = head
        .split_whitespace()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .expect("no status code");
    (status, head, body)
}

/// Flush files in `dir`, sorted by name.
pub fn flush_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = match std::fs::read_dir(dir) {
        Ok(entries) => entries
            .map(|e| e.unwrap().path())
            .filter(|p| {
                p.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with("requests_") && n.ends_with(".json"))
            })
            .collect(),
        Err(_) => Vec::new(),
    };
    files.sort();
    files
}

/// Parse a flush file into its array of records.
pub fn read_flush(path: &Path) -> Vec<serde_json::Value> {
    let content = std::fs::read_to_string(path).unwrap();
    match serde_json::from_str(&content).unwrap() {
        serde_json::Value::Array(items) => items,
        other => panic!("flush file is not an array: {other}"),
    }
}
