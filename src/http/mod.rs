//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, graceful shutdown)
//!     → request.rs (request ID assignment and propagation)
//!     → handler.rs (whitelist check, record, append, fixed response)
//!     → Send to client
//! ```

pub mod handler;
pub mod request;
pub mod server;

pub use handler::{beacon_handler, BeaconState};
pub use request::{UuidRequestId, X_REQUEST_ID};
pub use server::BeaconServer;
