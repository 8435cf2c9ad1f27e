//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! handler + buffer produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → stdout
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through every request span
//! - Metrics are cheap no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
