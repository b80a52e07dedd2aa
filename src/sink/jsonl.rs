//! Newline-delimited JSON sink.

use super::DatasetSink;
use crate::models::{DatagenError, GeneratedRow, OutputFormat, Result};
use std::fs::File;
use std::io::{BufWriter, Write};

/// Writes one JSON object per row, one row per line, in row order.
///
/// Non-finite floats (an overflowed fold, for example) serialize as `null`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonlSink;

impl DatasetSink for JsonlSink {
    fn format(&self) -> OutputFormat {
        OutputFormat::Jsonl
    }

    fn write_file(&self, rows: &[GeneratedRow], file: File) -> Result<()> {
        let mut writer = BufWriter::new(file);

        for row in rows {
            serde_json::to_writer(&mut writer, row).map_err(|e| {
                DatagenError::Serialization(format!("Failed to serialize row: {e}"))
            })?;
            writer
                .write_all(b"\n")
                .map_err(|e| DatagenError::io("writing output", e))?;
        }

        writer
            .flush()
            .map_err(|e| DatagenError::io("flushing output", e))?;
        writer
            .get_ref()
            .sync_all()
            .map_err(|e| DatagenError::io("syncing output", e))?;

        Ok(())
    }
}
