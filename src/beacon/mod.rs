//! Request buffering subsystem.
//!
//! # Data Flow
//! ```text
//! whitelisted request
//!     → record.rs (RequestRecord: time, ip, user agent)
//!     → buffer.rs (append under lock; at capacity → flush)
//!     → writer.rs (requests_<unix-seconds>.json in the log directory)
//! ```
//!
//! # Design Decisions
//! - One mutex guards append-and-maybe-flush, so exactly one request
//!   crosses each capacity boundary
//! - Flush is synchronous with the request that fills the buffer
//! - The buffer is cleared only after the file is written

pub mod buffer;
pub mod record;
pub mod writer;

pub use buffer::{AppendOutcome, RequestBuffer};
pub use record::RequestRecord;
pub use writer::{FileFlushWriter, FlushError, FlushWriter};
