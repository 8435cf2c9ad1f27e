//! Domain whitelisting.
//!
//! The domain of a request is the authority of an absolute-form request
//! target (`GET http://a.example/x HTTP/1.1`) when one is present, and the
//! `Host` header otherwise. RFC 9112 §3.2.2 requires a server to ignore
//! `Host` in the absolute-form case, so the two never disagree in practice.
//!
//! Both configured entries and request domains go through
//! [`normalize_domain`]: ports and a trailing dot are dropped, case is
//! folded, IDNs are converted to punycode.

use axum::http::{header::HOST, HeaderMap, Uri};
use std::collections::HashSet;
use thiserror::Error;
use url::Url;

/// Why a request was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessDenied {
    /// The domain is well formed but not whitelisted.
    #[error("domain {domain:?} is not whitelisted")]
    DomainRejected { domain: String },

    /// No usable domain could be read from the request.
    #[error("request target has no usable domain")]
    MalformedTarget,
}

/// Set of domains allowed to use the beacon.
#[derive(Debug, Clone, Default)]
pub struct Whitelist {
    domains: HashSet<String>,
}

impl Whitelist {
    /// Build a whitelist from configured entries.
    ///
    /// Entries that cannot be normalized are skipped with a warning;
    /// config validation rejects them before this point.
    pub fn new<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let domains = domains
            .into_iter()
            .filter_map(|entry| {
                let entry = entry.as_ref();
                let normalized = normalize_domain(entry);
                if normalized.is_none() {
                    tracing::warn!(entry = %entry, "Ignoring invalid whitelist entry");
                }
                normalized
            })
            .collect();
        Self { domains }
    }

    /// Whether a normalized domain is whitelisted.
    pub fn contains(&self, domain: &str) -> bool {
        self.domains.contains(domain)
    }

    /// Number of distinct whitelisted domains.
    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    /// Resolve the request's domain and check it against the whitelist.
    ///
    /// Returns the matched domain on success.
    pub fn check(&self, uri: &Uri, headers: &HeaderMap) -> Result<String, AccessDenied> {
        let domain = request_domain(uri, headers).ok_or(AccessDenied::MalformedTarget)?;
        if self.contains(&domain) {
            Ok(domain)
        } else {
            Err(AccessDenied::DomainRejected { domain })
        }
    }
}

/// Extract the normalized domain a request is addressed to.
pub fn request_domain(uri: &Uri, headers: &HeaderMap) -> Option<String> {
    if let Some(authority) = uri.authority() {
        return normalize_domain(authority.as_str());
    }

    let host = headers.get(HOST)?.to_str().ok()?;
    normalize_domain(host)
}

/// Normalize a `host[:port]` string for comparison.
///
/// Returns `None` for anything that is not a bare host with an optional port.
pub fn normalize_domain(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty()
        || raw
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '/' | '\\' | '@' | '?' | '#'))
    {
        return None;
    }

    let url = Url::parse(&format!("http://{raw}/")).ok()?;
    let host = url.host_str()?.trim_end_matches('.');
    if host.is_empty() {
        return None;
    }
    Some(host.to_ascii_lowercase())
}
