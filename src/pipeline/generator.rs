//! Synthetic dataset generation pipeline.
//!
//! Pipeline flow:
//! Config → Sampler → points → compute_row → RowOutcome filter → Sink
//!
//! K_i: Every row depends only on its own (x, index) and the constant
//! bundle. Rows keep sample order; degenerate points are dropped and
//! counted, never substituted.

use crate::math::{
    apply_exclusion_gate, binet, mst_step, phi_infinity_fold, qrt_damping, round_to,
    ConstantSet, LatticeProjector,
};
use crate::models::{
    Config, Dataset, GeneratedRow, Label, NumericError, Result, RowOutcome, RunStats, SamplePoint,
    SkippedPoint,
};
use crate::pipeline::Sampler;
use crate::sink::{DatasetSink, SinkReport};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Decimal places kept for every float field except `phi_const`.
pub const ROW_PRECISION: usize = 8;

/// Decimal places kept for `phi_const`.
pub const PHI_CONST_PRECISION: usize = 15;

const PROGRESS_TEMPLATE: &str =
    "[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} ({percent}%) {msg}";

/// Dataset generator for one configured batch.
pub struct DatasetGenerator {
    config: Config,
    projector: LatticeProjector,
    show_progress: bool,
}

impl DatasetGenerator {
    /// Create a generator from a validated configuration.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let projector = LatticeProjector::new(config.generation.lattice_dim);
        Ok(Self {
            show_progress: config.output.progress,
            config,
            projector,
        })
    }

    /// Enable or disable the progress bar.
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Draw the configured number of sample points.
    pub fn sample_points(&self) -> Result<Vec<SamplePoint>> {
        Sampler::new(&self.config.sampling)
            .draw(self.config.generation.rows, self.config.generation.seed)
    }

    /// Compute one row, or the numeric error that disqualifies the point.
    pub fn compute_row(&self, point: &SamplePoint) -> RowOutcome {
        match self.try_compute_row(point) {
            Ok(row) => RowOutcome::Row(row),
            Err(error) => RowOutcome::Skipped {
                point: *point,
                error,
            },
        }
    }

    fn try_compute_row(&self, point: &SamplePoint) -> std::result::Result<GeneratedRow, NumericError> {
        let x = point.x;
        if !x.is_finite() {
            return Err(NumericError::NonFinite { op: "sample", input: x });
        }

        let qrt_val = qrt_damping(x);
        let mst_val = mst_step(x.abs() + self.config.sampling.mst_offset)?;
        let gated = apply_exclusion_gate(x);
        let fold = phi_infinity_fold(x, self.config.generation.fold_iterations);

        let n = i32::try_from(point.index).unwrap_or(i32::MAX);
        let binet_val = binet(n);
        if !binet_val.is_finite() {
            return Err(NumericError::Overflow {
                op: "binet",
                input: f64::from(point.index),
            });
        }

        let lattice_norm = self.projector.norm(x);

        Ok(GeneratedRow {
            input_x: round_to(x, ROW_PRECISION),
            phi_fold: round_to(fold, ROW_PRECISION),
            qrt_wave: round_to(qrt_val, ROW_PRECISION),
            mst_state: round_to(mst_val, ROW_PRECISION),
            tupt_gated: round_to(gated, ROW_PRECISION),
            binet_n: i64::from(point.index),
            binet_val: round_to(binet_val, ROW_PRECISION),
            lattice_norm: round_to(lattice_norm, ROW_PRECISION),
            phi_const: round_to(ConstantSet::get().phi, PHI_CONST_PRECISION),
            label: Label::classify(x, qrt_val, gated),
        })
    }

    /// Compute rows for explicit points, in order, dropping degenerate ones.
    pub fn generate_from_points(&self, points: &[SamplePoint]) -> Dataset {
        let pb = progress_bar(points.len() as u64, self.show_progress);
        let mut dataset = Dataset::default();

        for (position, point) in points.iter().enumerate() {
            match self.compute_row(point) {
                RowOutcome::Row(row) => dataset.rows.push(row),
                RowOutcome::Skipped { point, error } => {
                    debug!(position, x = point.x, %error, "Skipping degenerate point");
                    dataset.skipped.push(SkippedPoint {
                        position,
                        point,
                        error,
                    });
                }
            }
            pb.inc(1);
        }

        pb.finish_with_message(format!(
            "{} rows, {} skipped",
            dataset.rows.len(),
            dataset.skipped.len()
        ));

        info!(
            generated = dataset.rows.len(),
            skipped = dataset.skipped.len(),
            "Generated {} valid rows ({} skipped as degenerate)",
            dataset.rows.len(),
            dataset.skipped.len()
        );

        dataset
    }

    /// Sample and compute the configured batch.
    pub fn generate(&self) -> Result<Dataset> {
        let g = &self.config.generation;
        info!(
            rows = g.rows,
            seed = g.seed,
            fold_iterations = g.fold_iterations,
            lattice_dim = self.projector.dim(),
            "Starting dataset generation"
        );

        let points = self.sample_points()?;
        Ok(self.generate_from_points(&points))
    }

    /// Generate the batch and hand it to `sink` at `output_path`.
    pub fn run(&self, sink: &dyn DatasetSink, output_path: &Path) -> Result<(RunStats, SinkReport)> {
        let start = Instant::now();
        let mut stats = RunStats::new(self.config.generation.seed, self.config.generation.rows);

        let dataset = self.generate()?;
        stats.record(&dataset);

        let report = sink.write(&dataset.rows, output_path)?;
        stats.finalize(start.elapsed().as_secs_f64());

        info!(
            rows = report.rows,
            bytes = report.bytes,
            format = %report.format,
            path = %report.path.display(),
            "Saved dataset"
        );
        info!(labels = ?stats.label_counts, "Label distribution");

        Ok((stats, report))
    }
}

fn progress_bar(len: u64, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(len);
    match ProgressStyle::default_bar().template(PROGRESS_TEMPLATE) {
        Ok(style) => pb.set_style(style.progress_chars("##-")),
        Err(e) => warn!(error = %e, "Invalid progress template, using default style"),
    }
    pb
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SampleSource;

    fn generator(rows: usize, seed: u64) -> DatasetGenerator {
        let mut config = Config::default();
        config.generation.rows = rows;
        config.generation.seed = seed;
        DatasetGenerator::new(config).unwrap().with_progress(false)
    }

    fn point(x: f64, index: u32) -> SamplePoint {
        SamplePoint {
            x,
            index,
            source: SampleSource::Uniform,
        }
    }

    #[test]
    fn test_row_fields_for_known_point() {
        let g = generator(0, 0);
        let row = g.compute_row(&point(0.0, 1)).into_row().unwrap();

        assert_eq!(row.input_x, 0.0);
        assert_eq!(row.qrt_wave, 1.0);
        assert_eq!(row.tupt_gated, 0.0);
        assert_eq!(row.label, Label::Excluded);
        assert_eq!(row.binet_n, 1);
        assert_eq!(row.binet_val, 1.0);
        assert_eq!(row.lattice_norm, 0.0);
        assert_eq!(row.phi_const, 1.618_033_988_749_895);
    }

    #[test]
    fn test_floats_are_rounded() {
        let g = generator(0, 0);
        let row = g.compute_row(&point(1.234_567_891_234, 2)).into_row().unwrap();
        for v in [row.input_x, row.qrt_wave, row.mst_state, row.lattice_norm] {
            assert_eq!(round_to(v, ROW_PRECISION), v);
        }
        assert_eq!(row.input_x, 1.234_567_89);
    }

    #[test]
    fn test_overflow_point_is_skipped() {
        let g = generator(0, 0);
        match g.compute_row(&point(1000.0, 1)) {
            RowOutcome::Skipped { error, .. } => assert_eq!(error.op(), "mst_step"),
            other => panic!("expected skip, got {other:?}"),
        }
    }

    #[test]
    fn test_non_finite_point_is_skipped() {
        let g = generator(0, 0);
        assert!(!g.compute_row(&point(f64::NAN, 1)).is_row());
        assert!(!g.compute_row(&point(f64::NEG_INFINITY, 1)).is_row());
    }

    #[test]
    fn test_generate_from_points_keeps_order_and_counts_skips() {
        let g = generator(0, 0);
        let points = [point(0.5, 1), point(800.0, 2), point(-1.5, 3), point(2.5, 4)];
        let dataset = g.generate_from_points(&points);

        assert_eq!(dataset.rows.len(), 3);
        assert_eq!(dataset.skipped.len(), 1);
        assert_eq!(dataset.skipped[0].position, 1);
        assert_eq!(dataset.requested(), points.len());

        let xs: Vec<f64> = dataset.rows.iter().map(|r| r.input_x).collect();
        assert_eq!(xs, vec![0.5, -1.5, 2.5]);
    }

    #[test]
    fn test_generate_is_deterministic() {
        let a = generator(60, 42).generate().unwrap();
        let b = generator(60, 42).generate().unwrap();
        assert_eq!(a.rows, b.rows);
        assert_eq!(a.skipped, b.skipped);
        assert_eq!(a.requested(), 60);
    }

    #[test]
    fn test_large_structured_values_are_skipped() {
        // Fibonacci values past ~F(15) scaled into the sinh overflow range
        let dataset = generator(300, 42).generate().unwrap();
        assert!(!dataset.skipped.is_empty());
        assert!(dataset
            .skipped
            .iter()
            .all(|s| s.point.source == SampleSource::Structured));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = Config::default();
        config.sampling.normal_std_dev = 0.0;
        assert!(DatasetGenerator::new(config).is_err());

        let mut config = Config::default();
        config.sampling.uniform_range = (-1e308, 1e308);
        assert!(DatasetGenerator::new(config).is_err());
    }
}
