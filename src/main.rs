//! nrcgen CLI - Synthetic golden-ratio dataset generation.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use nrcgen::math::{
    apply_exclusion_gate, binet, mst_step, phi_infinity_fold, qrt_damping, ConstantSet,
    LatticeProjector,
};
use nrcgen::models::{default_output_path, Compression};
use nrcgen::{open_sink, Config, DatasetGenerator, Label, OutputFormat};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "nrcgen")]
#[command(version)]
#[command(about = "Synthetic golden-ratio dataset generation (JSONL / Parquet)")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to configuration file (optional; built-in defaults otherwise)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a labeled dataset
    Generate {
        /// Number of data rows [default: 50000]
        #[arg(short, long)]
        rows: Option<usize>,

        /// Output file path [default: dataset.<format>]
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format [default: parquet, or inferred from --output]
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// RNG seed for reproducibility [default: 42]
        #[arg(short, long)]
        seed: Option<u64>,

        /// Parquet compression [default: gzip]
        #[arg(long, value_enum)]
        compression: Option<Compression>,

        /// Fold iterations [default: 5]
        #[arg(long)]
        iterations: Option<u32>,

        /// Write run statistics as JSON to this path
        #[arg(long)]
        stats: Option<PathBuf>,

        /// Disable the progress bar
        #[arg(long)]
        no_progress: bool,
    },

    /// Evaluate every transform at a single point
    Inspect {
        /// Input value
        #[arg(allow_negative_numbers = true)]
        x: f64,

        /// Fibonacci index for the Binet value
        #[arg(short = 'n', long, default_value = "1", allow_negative_numbers = true)]
        fib_n: i32,

        /// Fold iterations
        #[arg(short, long, default_value = "5")]
        iterations: u32,
    },

    /// Validate configuration file
    Validate,

    /// Show example configuration
    Example,
}

fn setup_logging(verbose: bool) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set subscriber")
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    match path {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Failed to load config from {path:?}")),
        None => Ok(Config::default()),
    }
}

fn print_example_config() {
    let example = r#"# nrcgen configuration file

[generation]
rows = 50000
seed = 42
fold_iterations = 5
lattice_dim = 2048

[sampling]
uniform_range = [-10.0, 10.0]
normal_mean = 0.0
normal_std_dev = 2.0
structured_factor_range = [0.1, 1.0]
fibonacci_period = 20
index_cycle = 30
mst_offset = 1e-8

[output]
# path = "${DATA_DIR}/nrc_dataset.parquet"
format = "parquet"   # or "jsonl"
compression = "gzip" # gzip | snappy | zstd | none
# stats_path = "nrc_dataset.stats.json"
progress = true
"#;
    println!("{example}");
}

fn inspect(x: f64, fib_n: i32, iterations: u32) {
    let c = ConstantSet::get();
    let qrt = qrt_damping(x);
    let gated = apply_exclusion_gate(x);
    let label = Label::classify(x, qrt, gated);
    let mst = match mst_step(x.abs() + 1e-8) {
        Ok(v) => format!("{v:.4}"),
        Err(e) => format!("error: {e}"),
    };

    println!("φ (golden ratio):    {:.15}", c.phi);
    println!("QRT wave:            {qrt:.8}");
    println!("MST step:            {mst}");
    println!("TUPT gate:           {gated:.4}");
    println!("φ fold ({iterations} iter):     {:.6}", phi_infinity_fold(x, iterations));
    println!("Binet F({fib_n}):          {:.4}", binet(fib_n));
    println!("Lattice norm:        {:.6}", LatticeProjector::default().norm(x));
    println!("Label:               {label}");
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose)?;

    match cli.command {
        Commands::Example => {
            print_example_config();
        }

        Commands::Inspect { x, fib_n, iterations } => {
            if !x.is_finite() {
                bail!("x must be finite, got {x}");
            }
            inspect(x, fib_n, iterations);
        }

        Commands::Validate => {
            let Some(path) = cli.config.as_ref() else {
                bail!("No config file given (use --config <PATH>)");
            };
            let config = load_config(Some(path))?;

            info!("Configuration is valid");
            info!(
                "  Rows: {} (seed {})",
                config.generation.rows, config.generation.seed
            );
            info!(
                "  Output: {} ({})",
                config.output.resolved_path().display(),
                config.output.format
            );
        }

        Commands::Generate {
            rows,
            output,
            format,
            seed,
            compression,
            iterations,
            stats,
            no_progress,
        } => {
            let mut config = load_config(cli.config.as_ref())?;

            // CLI overrides config
            if let Some(rows) = rows {
                config.generation.rows = rows;
            }
            if let Some(seed) = seed {
                config.generation.seed = seed;
            }
            if let Some(iterations) = iterations {
                config.generation.fold_iterations = iterations;
            }
            if let Some(compression) = compression {
                config.output.compression = compression;
            }
            if let Some(stats) = stats {
                config.output.stats_path = Some(stats);
            }
            if no_progress {
                config.output.progress = false;
            }

            let format = format
                .or_else(|| output.as_deref().and_then(OutputFormat::from_path))
                .unwrap_or(config.output.format);
            config.output.format = format;

            let output_path = match output {
                Some(path) => path,
                None if config.output.path.is_some() => config.output.resolved_path(),
                None => default_output_path(format),
            };

            // Fail on a missing backend before spending time on generation
            let sink = open_sink(format, config.output.compression)?;

            println!("\n{}", "=".repeat(60));
            println!("  nrcgen synthetic dataset generator");
            println!(
                "  Rows: {}  |  Format: {}  |  Seed: {}",
                config.generation.rows, format, config.generation.seed
            );
            println!("{}\n", "=".repeat(60));

            let stats_path = config.output.stats_path.clone();
            let generator = DatasetGenerator::new(config)?;
            let (stats, report) = generator
                .run(sink.as_ref(), &output_path)
                .with_context(|| format!("Failed to generate dataset at {output_path:?}"))?;

            if let Some(path) = stats_path {
                stats
                    .export_json(&path)
                    .with_context(|| format!("Failed to write stats to {path:?}"))?;
                info!(path = %path.display(), "Saved run statistics");
            }

            println!("\n=== Dataset Generation Complete ===");
            println!("Run:         {}", stats.run_id);
            println!("Requested:   {}", stats.requested_rows);
            println!("Generated:   {}", stats.generated_rows);
            println!("Skipped:     {}", stats.skipped_rows);
            for (label, count) in &stats.label_counts {
                println!("  {:<10} {count}", format!("{label}:"));
            }
            println!("Size:        {} bytes", report.bytes);
            println!("Throughput:  {:.0} rows/s", stats.rows_per_sec);
            println!("Runtime:     {:.2}s", stats.runtime_secs);
            println!("Output:      {:?}", report.path);
        }
    }

    Ok(())
}
