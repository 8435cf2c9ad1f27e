//! The beacon request handler.

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{
        header::{CONTENT_TYPE, USER_AGENT},
        HeaderMap, Method, StatusCode, Uri,
    },
    response::{IntoResponse, Response},
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use crate::beacon::{AppendOutcome, FileFlushWriter, RequestBuffer, RequestRecord};
use crate::config::BeaconConfig;
use crate::http::request::request_id;
use crate::observability::metrics;
use crate::security::Whitelist;

/// How long a request waits on the buffer unless configured otherwise.
pub const DEFAULT_APPEND_TIMEOUT: Duration = Duration::from_secs(30);

/// Shared state injected into the handler.
#[derive(Clone, Debug)]
pub struct BeaconState {
    pub buffer: Arc<RequestBuffer>,
    pub whitelist: Arc<Whitelist>,
    /// Longest a request waits for its append (and any flush) before it is
    /// answered anyway.
    pub append_timeout: Duration,
}

impl BeaconState {
    pub fn new(buffer: RequestBuffer, whitelist: Whitelist) -> Self {
        Self {
            buffer: Arc::new(buffer),
            whitelist: Arc::new(whitelist),
            append_timeout: DEFAULT_APPEND_TIMEOUT,
        }
    }

    pub fn with_append_timeout(mut self, append_timeout: Duration) -> Self {
        self.append_timeout = append_timeout;
        self
    }

    /// Buffer flushing into the configured log directory, plus the whitelist.
    pub fn from_config(config: &BeaconConfig) -> Self {
        let writer = FileFlushWriter::new(&config.server.request_log_directory);
        Self::new(
            RequestBuffer::new(config.queue.size, writer),
            Whitelist::new(&config.server.whitelisted_domains),
        )
        .with_append_timeout(Duration::from_secs(config.server.append_timeout_secs))
    }
}

/// Handle a GET or HEAD beacon hit.
///
/// Whitelisted requests are recorded and answered with an empty stylesheet.
/// A failed flush is logged but still answered with 200; the records stay
/// buffered and the next request retries the write. An append that outlasts
/// `append_timeout` is also answered with 200 and finishes on its own.
pub async fn beacon_handler(
    State(state): State<BeaconState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let request_id = request_id(&headers).to_string();

    let domain = match state.whitelist.check(&uri, &headers) {
        Ok(domain) => domain,
        Err(denied) => {
            tracing::debug!(
                request_id = %request_id,
                peer = %peer,
                reason = %denied,
                "Beacon request rejected"
            );
            metrics::record_request(method.as_str(), false);
            return StatusCode::FORBIDDEN.into_response();
        }
    };

    let user_agent = headers
        .get(USER_AGENT)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned());
    let record = RequestRecord::new(peer.ip().to_canonical(), user_agent);

    // The append may write a file under the buffer lock, so it runs on the
    // blocking pool. It completes even if this future is dropped.
    let buffer = state.buffer.clone();
    let append = tokio::task::spawn_blocking(move || buffer.append(record));
    let result = match tokio::time::timeout(state.append_timeout, append).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(
                request_id = %request_id,
                timeout = ?state.append_timeout,
                "Buffer append still running; answering without waiting"
            );
            metrics::record_request(method.as_str(), true);
            return empty_stylesheet();
        }
    };

    match result {
        Ok(Ok(AppendOutcome::Buffered { len })) => {
            tracing::debug!(request_id = %request_id, domain = %domain, buffered = len, "Request recorded");
        }
        Ok(Ok(AppendOutcome::Flushed { path, records })) => {
            tracing::debug!(
                request_id = %request_id,
                domain = %domain,
                path = %path.display(),
                records,
                "Request recorded, buffer flushed"
            );
        }
        Ok(Err(e)) => {
            tracing::error!(
                request_id = %request_id,
                error = %e,
                "Failed to flush request buffer; records retained"
            );
        }
        Err(e) => {
            tracing::error!(request_id = %request_id, error = %e, "Buffer append task failed");
        }
    }

    metrics::record_request(method.as_str(), true);
    empty_stylesheet()
}

fn empty_stylesheet() -> Response {
    ([(CONTENT_TYPE, "text/css")], Body::empty()).into_response()
}
