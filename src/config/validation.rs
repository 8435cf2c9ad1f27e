//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (queue size, append timeout)
//! - Check that whitelist entries are usable host names
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: BeaconConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use thiserror::Error;
use tracing_subscriber::filter::LevelFilter;

use crate::config::schema::BeaconConfig;
use crate::security::whitelist::normalize_domain;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("queue.size must be at least 1")]
    ZeroQueueSize,

    #[error("server.request_log_directory must not be empty")]
    EmptyLogDirectory,

    #[error("server.append_timeout_secs must be at least 1")]
    ZeroAppendTimeout,

    #[error("invalid whitelisted domain {0:?}")]
    InvalidDomain(String),

    #[error("invalid observability.metrics_address {0:?}")]
    InvalidMetricsAddress(String),

    #[error("invalid observability.log_level {0:?}")]
    InvalidLogLevel(String),
}

/// Check a parsed configuration, collecting every problem found.
pub fn validate_config(config: &BeaconConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.queue.size == 0 {
        errors.push(ValidationError::ZeroQueueSize);
    }

    if config.server.request_log_directory.as_os_str().is_empty() {
        errors.push(ValidationError::EmptyLogDirectory);
    }

    if config.server.append_timeout_secs == 0 {
        errors.push(ValidationError::ZeroAppendTimeout);
    }

    for domain in &config.server.whitelisted_domains {
        if normalize_domain(domain).is_none() {
            errors.push(ValidationError::InvalidDomain(domain.clone()));
        }
    }

    let observability = &config.observability;
    if observability.metrics_enabled
        && observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            observability.metrics_address.clone(),
        ));
    }

    if observability.log_level.parse::<LevelFilter>().is_err() {
        errors.push(ValidationError::InvalidLogLevel(observability.log_level.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
