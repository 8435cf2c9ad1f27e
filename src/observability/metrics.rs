//! Metrics collection and exposition.
//!
//! # Metrics
//! - `beacon_requests_total` (counter): requests by method, outcome
//! - `beacon_flushes_total` (counter): flush attempts by result
//! - `beacon_flushed_records_total` (counter): records written to disk
//! - `beacon_flush_duration_seconds` (histogram): time spent writing a batch
//! - `beacon_buffer_records` (gauge): records currently held in memory

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus recorder and its HTTP scrape endpoint.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Count a handled beacon request.
pub fn record_request(method: &str, accepted: bool) {
    let outcome = if accepted { "accepted" } else { "rejected" };
    counter!(
        "beacon_requests_total",
        "method" => method.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}

/// Record one flush attempt.
pub fn record_flush(ok: bool, records: usize, started: Instant) {
    let result = if ok { "ok" } else { "error" };
    counter!("beacon_flushes_total", "result" => result).increment(1);
    histogram!("beacon_flush_duration_seconds").record(started.elapsed().as_secs_f64());
    if ok {
        counter!("beacon_flushed_records_total").increment(records as u64);
    }
}

/// Report the current buffer length.
pub fn set_buffer_len(len: usize) {
    gauge!("beacon_buffer_records").set(len as f64);
}
