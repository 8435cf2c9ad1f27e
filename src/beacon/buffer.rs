//! Bounded request buffer with flush-on-capacity.

use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use crate::beacon::record::RequestRecord;
use crate::beacon::writer::{FlushError, FlushWriter};
use crate::observability::metrics;

/// Result of a successful [`RequestBuffer::append`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppendOutcome {
    /// The record was stored; `len` records are now buffered.
    Buffered { len: usize },
    /// The record filled the buffer and all `records` were written to `path`.
    Flushed { path: PathBuf, records: usize },
}

impl AppendOutcome {
    pub fn is_flushed(&self) -> bool {
        matches!(self, AppendOutcome::Flushed { .. })
    }
}

/// Fixed-capacity, append-only buffer drained by a [`FlushWriter`].
///
/// `append` is one critical section: push, and if the buffer reached
/// capacity, write everything and clear. Concurrent callers are serialized,
/// so each capacity boundary is crossed by exactly one of them.
///
/// A failed write keeps every record. The next append finds the buffer at
/// or past capacity and tries again with all of them, so records are never
/// dropped. The cost is memory: while writes keep failing the buffer grows
/// past `capacity` without limit. Each failed attempt in that state logs a
/// warning with the overflow, and [`RequestBuffer::overflow`] reports it.
pub struct RequestBuffer {
    capacity: usize,
    records: Mutex<Vec<RequestRecord>>,
    writer: Box<dyn FlushWriter>,
}

impl RequestBuffer {
    /// Create an empty buffer. A capacity of zero is treated as one.
    pub fn new(capacity: usize, writer: impl FlushWriter + 'static) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            records: Mutex::new(Vec::with_capacity(capacity)),
            writer: Box::new(writer),
        }
    }

    /// Append a record, flushing synchronously when the buffer is full.
    ///
    /// On `Err` the record is retained along with everything before it.
    pub fn append(&self, record: RequestRecord) -> Result<AppendOutcome, FlushError> {
        let mut records = self.lock();
        records.push(record);

        if records.len() < self.capacity {
            metrics::set_buffer_len(records.len());
            return Ok(AppendOutcome::Buffered { len: records.len() });
        }

        let started = Instant::now();
        let count = records.len();
        match self.writer.write_batch(&records) {
            Ok(path) => {
                records.clear();
                metrics::record_flush(true, count, started);
                metrics::set_buffer_len(0);
                tracing::info!(path = %path.display(), records = count, "Flushed request buffer");
                Ok(AppendOutcome::Flushed {
                    path,
                    records: count,
                })
            }
            Err(e) => {
                metrics::record_flush(false, count, started);
                metrics::set_buffer_len(count);
                if count > self.capacity {
                    tracing::warn!(
                        records = count,
                        capacity = self.capacity,
                        overflow = count - self.capacity,
                        "Request buffer over capacity while flushes fail"
                    );
                }
                Err(e)
            }
        }
    }

    /// Number of buffered records.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Records held before a flush is forced.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Records held beyond `capacity`; non-zero only while flushes fail.
    pub fn overflow(&self) -> usize {
        self.lock().len().saturating_sub(self.capacity)
    }

    // Every mutation leaves the vector consistent, so a panic in another
    // holder does not invalidate it.
    fn lock(&self) -> MutexGuard<'_, Vec<RequestRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for RequestBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestBuffer")
            .field("capacity", &self.capacity)
            .field("len", &self.len())
            .finish()
    }
}
