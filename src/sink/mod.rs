//! Serialization sinks for generated datasets.
//!
//! Provides:
//! - `DatasetSink`: Trait implemented by each output format
//! - `JsonlSink`: One JSON object per line
//! - `ParquetSink`: Compressed columnar table (behind the `parquet` feature)
//!
//! K_i: Every sink writes to `<path>.tmp` and renames into place, so a failed
//! write never leaves a partial dataset behind.

mod jsonl;
#[cfg(feature = "parquet")]
mod columnar;

pub use jsonl::*;
#[cfg(feature = "parquet")]
pub use columnar::*;

use crate::models::{Compression, DatagenError, GeneratedRow, OutputFormat, Result};
use std::ffi::OsString;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Summary of a completed write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkReport {
    pub path: PathBuf,
    pub format: OutputFormat,
    pub rows: usize,
    pub bytes: u64,
}

/// An output format for an ordered batch of rows.
pub trait DatasetSink {
    /// Format this sink produces.
    fn format(&self) -> OutputFormat;

    /// Serialize `rows`, in order, into an open file.
    fn write_file(&self, rows: &[GeneratedRow], file: File) -> Result<()>;

    /// Write `rows` to `path` atomically.
    fn write(&self, rows: &[GeneratedRow], path: &Path) -> Result<SinkReport> {
        write_atomic(path, |file| self.write_file(rows, file))?;

        let bytes = fs::metadata(path)
            .map_err(|e| DatagenError::io("reading output metadata", e))?
            .len();

        Ok(SinkReport {
            path: path.to_path_buf(),
            format: self.format(),
            rows: rows.len(),
            bytes,
        })
    }
}

/// Select the sink for a format.
///
/// B_i(backend compiled in) → Result. Parquet output needs the `parquet`
/// feature; without it this fails before any rows are generated.
pub fn open_sink(format: OutputFormat, compression: Compression) -> Result<Box<dyn DatasetSink>> {
    match format {
        OutputFormat::Jsonl => Ok(Box::new(JsonlSink)),
        OutputFormat::Parquet => parquet_sink(compression),
    }
}

#[cfg(feature = "parquet")]
fn parquet_sink(compression: Compression) -> Result<Box<dyn DatasetSink>> {
    Ok(Box::new(ParquetSink::new(compression)))
}

#[cfg(not(feature = "parquet"))]
fn parquet_sink(_compression: Compression) -> Result<Box<dyn DatasetSink>> {
    Err(DatagenError::BackendUnavailable("parquet"))
}

/// Temporary sibling path used while writing `path`.
pub fn temp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}

/// Run `write` against a temp file, then rename it over `path`.
///
/// On failure the temp file is removed and `path` is left untouched.
fn write_atomic<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(File) -> Result<()>,
{
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| DatagenError::io("creating output directory", e))?;
    }

    let temp = temp_path(path);
    let file = File::create(&temp).map_err(|e| DatagenError::io("creating temp output", e))?;

    if let Err(e) = write(file) {
        if let Err(cleanup) = fs::remove_file(&temp) {
            warn!(path = %temp.display(), error = %cleanup, "Failed to remove temp output");
        }
        return Err(e);
    }

    fs::rename(&temp, path).map_err(|e| DatagenError::io("renaming output", e))?;
    debug!(path = %path.display(), "Output committed");
    Ok(())
}
