//! Sample, row and statistics types for nrcgen.
//!
//! K_i: These types represent the core data flow through the generator.

use super::{DatagenError, NumericError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Distribution a sample point was drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleSource {
    Uniform,
    Normal,
    /// Fibonacci value scaled by a random factor
    Structured,
}

/// One input to row generation.
///
/// K_i: Immutable once drawn; consumed exactly once.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplePoint {
    /// Scalar input value
    pub x: f64,

    /// Auxiliary index, `(position mod cycle) + 1`
    pub index: u32,

    /// Sampling block the point came from
    pub source: SampleSource,
}

/// Stability label.
///
/// K_i: Closed set; every point gets exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    /// The residue gate zeroed the point
    Excluded,
    /// Small wave amplitude close to the origin
    Resonant,
    Stable,
}

impl Label {
    /// All labels, in serialization order.
    pub const ALL: [Label; 3] = [Label::Excluded, Label::Resonant, Label::Stable];

    /// Classify a point from its input, damped-oscillation value and gate
    /// output. `Excluded` takes precedence over everything else.
    pub fn classify(x: f64, qrt_val: f64, gated: f64) -> Self {
        if gated == 0.0 {
            return Self::Excluded;
        }
        if qrt_val.abs() < 0.5 && x.abs() < 3.0 {
            return Self::Resonant;
        }
        Self::Stable
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Excluded => "excluded",
            Self::Resonant => "resonant",
            Self::Stable => "stable",
        }
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One dataset row.
///
/// K_i: Field names and order are the output schema shared by every sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedRow {
    /// Sampled input value
    pub input_x: f64,

    /// Fold operator output
    pub phi_fold: f64,

    /// Damped-oscillation output
    pub qrt_wave: f64,

    /// Bounded-step output
    pub mst_state: f64,

    /// Residue-gate output
    pub tupt_gated: f64,

    /// Auxiliary index
    pub binet_n: i64,

    /// Binet value at the auxiliary index
    pub binet_val: f64,

    /// Norm of the lattice projection of the input
    pub lattice_norm: f64,

    /// φ at 15 decimals
    pub phi_const: f64,

    pub label: Label,
}

/// Field names of [`GeneratedRow`], in column order.
pub const ROW_FIELDS: [&str; 10] = [
    "input_x",
    "phi_fold",
    "qrt_wave",
    "mst_state",
    "tupt_gated",
    "binet_n",
    "binet_val",
    "lattice_norm",
    "phi_const",
    "label",
];

/// Result of computing one sample point.
///
/// B_i: A point either yields a row or a numeric failure. The filtering
/// stage keeps rows and counts skips; nothing is raised.
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    Row(GeneratedRow),
    Skipped {
        point: SamplePoint,
        error: NumericError,
    },
}

impl RowOutcome {
    pub fn is_row(&self) -> bool {
        matches!(self, Self::Row(_))
    }

    pub fn into_row(self) -> Option<GeneratedRow> {
        match self {
            Self::Row(row) => Some(row),
            Self::Skipped { .. } => None,
        }
    }
}

/// A point dropped during generation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkippedPoint {
    /// Position in the sampled sequence
    pub position: usize,
    pub point: SamplePoint,
    pub error: NumericError,
}

/// Ordered batch of generated rows.
///
/// K_i: `rows.len() + skipped.len()` equals the number of points consumed,
/// and rows keep sample order.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub rows: Vec<GeneratedRow>,
    pub skipped: Vec<SkippedPoint>,
}

impl Dataset {
    /// Number of points consumed.
    pub fn requested(&self) -> usize {
        self.rows.len() + self.skipped.len()
    }

    /// Count of rows per label, with every label present.
    pub fn label_counts(&self) -> BTreeMap<Label, usize> {
        let mut counts: BTreeMap<Label, usize> = Label::ALL.iter().map(|&l| (l, 0)).collect();
        for row in &self.rows {
            *counts.entry(row.label).or_default() += 1;
        }
        counts
    }
}

/// Sizes of the three sampling blocks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockSizes {
    pub uniform: usize,
    pub normal: usize,
    pub structured: usize,
}

impl BlockSizes {
    /// Split `rows` into `⌊R/3⌋`, `⌊R/3⌋` and the remainder.
    pub fn partition(rows: usize) -> Self {
        let third = rows / 3;
        Self {
            uniform: third,
            normal: third,
            structured: rows - 2 * third,
        }
    }

    pub fn total(&self) -> usize {
        self.uniform + self.normal + self.structured
    }
}

/// Statistics for a generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunStats {
    /// Unique run identifier
    pub run_id: String,

    /// When generation started
    pub generated_at: DateTime<Utc>,

    /// RNG seed
    pub seed: u64,

    /// Rows requested
    pub requested_rows: usize,

    /// Rows written
    pub generated_rows: usize,

    /// Points dropped as numerically degenerate
    pub skipped_rows: usize,

    /// Sampling block sizes
    pub blocks: BlockSizes,

    /// Rows per label
    pub label_counts: BTreeMap<Label, usize>,

    /// Total runtime in seconds
    pub runtime_secs: f64,

    /// Rows per second throughput
    pub rows_per_sec: f64,
}

impl RunStats {
    /// Start a stats record for a run.
    pub fn new(seed: u64, requested_rows: usize) -> Self {
        Self {
            run_id: uuid::Uuid::new_v4().to_string(),
            generated_at: Utc::now(),
            seed,
            requested_rows,
            generated_rows: 0,
            skipped_rows: 0,
            blocks: BlockSizes::partition(requested_rows),
            label_counts: BTreeMap::new(),
            runtime_secs: 0.0,
            rows_per_sec: 0.0,
        }
    }

    /// Record the outcome of a finished batch.
    pub fn record(&mut self, dataset: &Dataset) {
        self.generated_rows = dataset.rows.len();
        self.skipped_rows = dataset.skipped.len();
        self.label_counts = dataset.label_counts();
    }

    /// Calculate derived stats.
    pub fn finalize(&mut self, runtime_secs: f64) {
        self.runtime_secs = runtime_secs;
        if runtime_secs > 0.0 {
            self.rows_per_sec = self.generated_rows as f64 / runtime_secs;
        }
    }

    /// Write the stats as pretty-printed JSON.
    pub fn export_json(&self, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|e| DatagenError::io("creating stats file", e))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)
            .map_err(|e| DatagenError::Serialization(format!("Serializing stats: {e}")))?;
        writer
            .flush()
            .map_err(|e| DatagenError::io("flushing stats file", e))
    }
}
