//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → whitelist.rs (extract target domain, check membership)
//!     → Pass to beacon handler, or 403
//! ```
//!
//! # Design Decisions
//! - Fail closed: an unreadable target domain is treated as not whitelisted
//! - No trust in client input: domains are normalized before comparison

pub mod whitelist;

pub use whitelist::{request_domain, AccessDenied, Whitelist};
