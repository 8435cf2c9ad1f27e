//! Structured logging.
//!
//! Uses `tracing` with a `fmt` subscriber. `RUST_LOG` takes precedence over
//! the configured level.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber. Call once, before anything logs.
pub fn init_logging(level: &str) {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn default_filter(level: &str) -> String {
    format!("css_beacon={level},tower_http={level}")
}
