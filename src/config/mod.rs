//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (read & deserialize)
//!     → validation.rs (semantic checks)
//!     → BeaconConfig (validated, immutable)
//!     → handed to the server once at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no reload path
//! - The beacon's core settings are required, ambient settings have defaults
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::BeaconConfig;
pub use schema::ObservabilityConfig;
pub use schema::QueueConfig;
pub use schema::ServerConfig;
