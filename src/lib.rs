//! nrcgen - Synthetic golden-ratio dataset generation.
//!
//! ## Architecture
//!
//! nrcgen is a sequential batch job built from pure parts:
//! - **math**: Closed-form transforms (fold, damped wave, bounded step,
//!   residue gate, lattice projection) over scalars or sequences
//! - **pipeline**: Seeded sampling and row generation
//! - **sink**: JSONL and Parquet writers
//!
//! ## Pipeline
//!
//! Sample (uniform → normal → structured) → Compute rows → Drop degenerate
//! points → Write in sample order
//!
//! ## Epistemic Design
//!
//! - K_i (Knowledge): Compile-time enforced invariants (types, enums)
//! - B_i (Beliefs): Per-row numeric outcomes as typed results
//! - I^R (Resolvable): User-configurable parameters
//! - I^B (Bounded): Numeric overflow, counted and skipped

pub mod math;
pub mod models;
pub mod pipeline;
pub mod sink;

// Re-exports for convenience
pub use models::{
    Config, DatagenError, Dataset, GeneratedRow, Label, NumericError, OutputFormat, Result,
    RowOutcome, RunStats, SamplePoint,
};
pub use pipeline::{DatasetGenerator, Sampler};
pub use sink::{open_sink, DatasetSink, JsonlSink, SinkReport};
