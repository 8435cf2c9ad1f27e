//! Flushing buffered records to disk.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

use crate::beacon::record::RequestRecord;

/// Error type for flush operations.
#[derive(Debug, Error)]
pub enum FlushError {
    /// The flush file could not be created, written or moved into place.
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The records could not be encoded as JSON.
    #[error("failed to serialize records: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Destination for a full buffer.
///
/// Implementations are called with the buffer lock held, once per capacity
/// boundary. An `Err` leaves the records in the buffer.
pub trait FlushWriter: Send + Sync {
    /// Persist `records` in order, returning where they went.
    fn write_batch(&self, records: &[RequestRecord]) -> Result<PathBuf, FlushError>;
}

/// Writes each batch to `requests_<unix-seconds>.json` inside a directory.
///
/// The array is written to a hidden temporary file first and renamed into
/// place, so readers never see a partial file. A second flush within the
/// same second replaces the first file.
#[derive(Debug, Clone)]
pub struct FileFlushWriter {
    directory: PathBuf,
}

impl FileFlushWriter {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// Final path of a flush made at `unix_secs`.
    pub fn file_path(&self, unix_secs: u64) -> PathBuf {
        self.directory.join(format!("requests_{unix_secs}.json"))
    }

    fn write_to(&self, path: &Path, records: &[RequestRecord]) -> Result<(), FlushError> {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let tmp_path = self.directory.join(format!(".{file_name}.tmp"));

        let io_err = |path: &Path| {
            let path = path.to_path_buf();
            move |source: std::io::Error| FlushError::Io { path, source }
        };

        let file = File::create(&tmp_path).map_err(io_err(&tmp_path))?;
        let mut writer = BufWriter::new(file);
        if let Err(e) = serde_json::to_writer(&mut writer, records) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }
        let file = writer
            .into_inner()
            .map_err(|e| e.into_error())
            .map_err(io_err(&tmp_path))?;
        file.sync_all().map_err(io_err(&tmp_path))?;
        drop(file);

        fs::rename(&tmp_path, path).map_err(|source| {
            let _ = fs::remove_file(&tmp_path);
            FlushError::Io {
                path: path.to_path_buf(),
                source,
            }
        })
    }
}

impl FlushWriter for FileFlushWriter {
    fn write_batch(&self, records: &[RequestRecord]) -> Result<PathBuf, FlushError> {
        let unix_secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        let path = self.file_path(unix_secs);
        self.write_to(&path, records)?;
        Ok(path)
    }
}
