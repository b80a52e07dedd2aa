//! Parquet sink: rows → Arrow record batch → compressed Parquet file.

use super::DatasetSink;
use crate::models::{Compression, DatagenError, GeneratedRow, OutputFormat, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression as ParquetCompression, GzipLevel, ZstdLevel};
use parquet::file::properties::WriterProperties;
use std::fs::File;
use std::sync::Arc;

/// Arrow schema of a dataset row. Column order follows `ROW_FIELDS`.
pub fn row_schema() -> Schema {
    Schema::new(vec![
        Field::new("input_x", DataType::Float64, false),
        Field::new("phi_fold", DataType::Float64, false),
        Field::new("qrt_wave", DataType::Float64, false),
        Field::new("mst_state", DataType::Float64, false),
        Field::new("tupt_gated", DataType::Float64, false),
        Field::new("binet_n", DataType::Int64, false),
        Field::new("binet_val", DataType::Float64, false),
        Field::new("lattice_norm", DataType::Float64, false),
        Field::new("phi_const", DataType::Float64, false),
        Field::new("label", DataType::Utf8, false),
    ])
}

/// Convert rows into a single record batch.
pub fn rows_to_record_batch(rows: &[GeneratedRow]) -> std::result::Result<RecordBatch, ArrowError> {
    fn f64_column(rows: &[GeneratedRow], get: impl Fn(&GeneratedRow) -> f64) -> ArrayRef {
        Arc::new(Float64Array::from(rows.iter().map(get).collect::<Vec<f64>>()))
    }

    let columns: Vec<ArrayRef> = vec![
        f64_column(rows, |r| r.input_x),
        f64_column(rows, |r| r.phi_fold),
        f64_column(rows, |r| r.qrt_wave),
        f64_column(rows, |r| r.mst_state),
        f64_column(rows, |r| r.tupt_gated),
        Arc::new(Int64Array::from(
            rows.iter().map(|r| r.binet_n).collect::<Vec<i64>>(),
        )),
        f64_column(rows, |r| r.binet_val),
        f64_column(rows, |r| r.lattice_norm),
        f64_column(rows, |r| r.phi_const),
        Arc::new(StringArray::from(
            rows.iter().map(|r| r.label.as_str()).collect::<Vec<&str>>(),
        )),
    ];

    RecordBatch::try_new(Arc::new(row_schema()), columns)
}

/// Writes the batch as one Parquet file with the configured compression.
#[derive(Debug, Clone, Copy)]
pub struct ParquetSink {
    compression: Compression,
}

impl ParquetSink {
    pub fn new(compression: Compression) -> Self {
        Self { compression }
    }

    fn writer_properties(&self) -> WriterProperties {
        let codec = match self.compression {
            Compression::Gzip => ParquetCompression::GZIP(GzipLevel::default()),
            Compression::Snappy => ParquetCompression::SNAPPY,
            Compression::Zstd => ParquetCompression::ZSTD(ZstdLevel::default()),
            Compression::None => ParquetCompression::UNCOMPRESSED,
        };
        WriterProperties::builder().set_compression(codec).build()
    }
}

impl Default for ParquetSink {
    fn default() -> Self {
        Self::new(Compression::Gzip)
    }
}

impl DatasetSink for ParquetSink {
    fn format(&self) -> OutputFormat {
        OutputFormat::Parquet
    }

    fn write_file(&self, rows: &[GeneratedRow], file: File) -> Result<()> {
        let batch = rows_to_record_batch(rows)
            .map_err(|e| DatagenError::Serialization(format!("Building record batch: {e}")))?;

        let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(self.writer_properties()))
            .map_err(|e| DatagenError::Serialization(format!("Opening parquet writer: {e}")))?;
        writer
            .write(&batch)
            .map_err(|e| DatagenError::Serialization(format!("Writing parquet batch: {e}")))?;
        writer
            .close()
            .map_err(|e| DatagenError::Serialization(format!("Closing parquet writer: {e}")))?;

        Ok(())
    }
}
