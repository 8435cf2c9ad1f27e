//! Recorded request metadata.

use serde::Serialize;
use std::net::IpAddr;
use std::time::{SystemTime, UNIX_EPOCH};

/// One observed beacon hit.
///
/// Serializes as `{"time": 1700000000.25, "ip": "10.0.0.1", "user_agent": "curl/8"}`,
/// with `user_agent` set to `null` when the header was absent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestRecord {
    /// Seconds since the Unix epoch, with fractional part.
    #[serde(rename = "time")]
    pub timestamp: f64,

    /// Remote peer address of the connection.
    #[serde(rename = "ip")]
    pub client_ip: IpAddr,

    /// Verbatim `User-Agent` header value.
    pub user_agent: Option<String>,
}

impl RequestRecord {
    /// Create a record stamped with the current time.
    pub fn new(client_ip: IpAddr, user_agent: Option<String>) -> Self {
        Self {
            timestamp: unix_time_secs(),
            client_ip,
            user_agent,
        }
    }
}

/// Current time as fractional seconds since the Unix epoch.
pub fn unix_time_secs() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs_f64()
}
