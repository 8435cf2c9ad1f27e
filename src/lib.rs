//! Analytics beacon: answers whitelisted GET/HEAD requests with an empty
//! stylesheet and records who asked.
//!
//! Records (time, client IP, user agent) accumulate in a bounded in-memory
//! buffer. The request that fills the buffer writes it to
//! `requests_<unix-seconds>.json` in the log directory before it is answered.

pub mod beacon;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod security;

pub use beacon::{RequestBuffer, RequestRecord};
pub use config::BeaconConfig;
pub use http::BeaconServer;
pub use lifecycle::Shutdown;
