//! End-to-end generation tests through the public API.

use nrcgen::models::{SampleSource, ROW_FIELDS};
use nrcgen::{Config, DatasetGenerator, DatasetSink, JsonlSink, Label, OutputFormat};
use std::fs;
use tempfile::TempDir;

fn generator(rows: usize, seed: u64) -> DatasetGenerator {
    let mut config = Config::default();
    config.generation.rows = rows;
    config.generation.seed = seed;
    DatasetGenerator::new(config).unwrap().with_progress(false)
}

#[test]
fn same_seed_produces_byte_identical_jsonl() {
    let temp_dir = TempDir::new().unwrap();
    let first = temp_dir.path().join("first.jsonl");
    let second = temp_dir.path().join("second.jsonl");

    let (stats_a, _) = generator(30, 42).run(&JsonlSink, &first).unwrap();
    let (stats_b, _) = generator(30, 42).run(&JsonlSink, &second).unwrap();

    let a = fs::read(&first).unwrap();
    let b = fs::read(&second).unwrap();
    assert!(!a.is_empty());
    assert_eq!(a, b);
    assert_eq!(stats_a.generated_rows, stats_b.generated_rows);
    assert_eq!(stats_a.label_counts, stats_b.label_counts);
    // Separate runs still get separate identities
    assert_ne!(stats_a.run_id, stats_b.run_id);
}

#[test]
fn different_seed_changes_output() {
    let a = generator(30, 42).generate().unwrap();
    let b = generator(30, 43).generate().unwrap();
    assert_ne!(a.rows, b.rows);
}

#[test]
fn nine_rows_split_into_three_blocks() {
    let g = generator(9, 7);
    let points = g.sample_points().unwrap();

    let sources: Vec<SampleSource> = points.iter().map(|p| p.source).collect();
    assert_eq!(
        sources,
        vec![
            SampleSource::Uniform,
            SampleSource::Uniform,
            SampleSource::Uniform,
            SampleSource::Normal,
            SampleSource::Normal,
            SampleSource::Normal,
            SampleSource::Structured,
            SampleSource::Structured,
            SampleSource::Structured,
        ]
    );

    let dataset = g.generate_from_points(&points);
    assert_eq!(dataset.rows.len(), 9);
    assert!(dataset.skipped.is_empty());

    for (row, point) in dataset.rows.iter().zip(&points) {
        let value = serde_json::to_value(row).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), ROW_FIELDS.len());
        for field in ROW_FIELDS {
            assert!(object.contains_key(field), "missing {field}");
        }
        assert!(matches!(
            object["label"].as_str(),
            Some("excluded" | "resonant" | "stable")
        ));
        assert_eq!(row.binet_n, i64::from(point.index));
    }
}

#[test]
fn injected_overflow_point_is_dropped() {
    let g = generator(9, 7);
    let mut points = g.sample_points().unwrap();
    points[4].x = 1000.0;

    let dataset = g.generate_from_points(&points);
    assert_eq!(dataset.rows.len(), 8);
    assert_eq!(dataset.skipped.len(), 1);
    assert_eq!(dataset.skipped[0].position, 4);
    assert_eq!(dataset.skipped[0].error.op(), "mst_step");

    // Surviving rows keep sample order
    let expected: Vec<f64> = points
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != 4)
        .map(|(_, p)| nrcgen::math::round_to(p.x, 8))
        .collect();
    let kept: Vec<f64> = dataset.rows.iter().map(|r| r.input_x).collect();
    assert_eq!(kept, expected);
}

#[test]
fn run_reports_skip_count() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("data.jsonl");

    // Large structured block reaches the sinh overflow range
    let (stats, report) = generator(600, 1).run(&JsonlSink, &path).unwrap();
    assert_eq!(stats.generated_rows + stats.skipped_rows, 600);
    assert!(stats.skipped_rows > 0);
    assert_eq!(report.rows, stats.generated_rows);

    let lines = fs::read_to_string(&path).unwrap().lines().count();
    assert_eq!(lines, stats.generated_rows);
}

#[test]
fn labels_cover_closed_set() {
    let dataset = generator(3000, 42).generate().unwrap();
    let counts = dataset.label_counts();
    assert_eq!(counts.keys().copied().collect::<Vec<_>>(), Label::ALL.to_vec());
    assert_eq!(counts.values().sum::<usize>(), dataset.rows.len());
    // The structured block contains F(0) = 0, which the gate excludes
    assert!(counts[&Label::Excluded] > 0);
    assert!(counts[&Label::Stable] > 0);
    assert!(counts[&Label::Resonant] > 0);
}

#[cfg(feature = "parquet")]
#[test]
fn parquet_output_matches_jsonl_rows() {
    use arrow::array::{Array, Float64Array, StringArray};
    use nrcgen::sink::ParquetSink;
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("data.parquet");
    let g = generator(90, 42);
    let dataset = g.generate().unwrap();

    let sink = ParquetSink::default();
    assert_eq!(sink.format(), OutputFormat::Parquet);
    sink.write(&dataset.rows, &path).unwrap();

    let reader = ParquetRecordBatchReaderBuilder::try_new(fs::File::open(&path).unwrap())
        .unwrap()
        .build()
        .unwrap();
    let mut xs = Vec::new();
    let mut labels = Vec::new();
    for batch in reader {
        let batch = batch.unwrap();
        let x_col = batch
            .column_by_name("input_x")
            .unwrap()
            .as_any()
            .downcast_ref::<Float64Array>()
            .unwrap();
        let label_col = batch
            .column_by_name("label")
            .unwrap()
            .as_any()
            .downcast_ref::<StringArray>()
            .unwrap();
        for i in 0..batch.num_rows() {
            xs.push(x_col.value(i));
            labels.push(label_col.value(i).to_string());
        }
        assert_eq!(label_col.null_count(), 0);
    }

    let expected_xs: Vec<f64> = dataset.rows.iter().map(|r| r.input_x).collect();
    let expected_labels: Vec<String> = dataset.rows.iter().map(|r| r.label.to_string()).collect();
    assert_eq!(xs, expected_xs);
    assert_eq!(labels, expected_labels);
}
