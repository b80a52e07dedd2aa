//! Configuration models for nrcgen.
//!
//! All I^R (resolvable ignorance) is parameterized here.
//! Every field has a default, so a config file is optional; CLI flags
//! override whatever the file sets.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Top-level configuration for nrcgen.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Batch size, seed and transform parameters
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Sampling distributions
    #[serde(default)]
    pub sampling: SamplingConfig,

    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,
}

/// Generation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Number of sample points to draw
    #[serde(default = "default_rows")]
    pub rows: usize,

    /// RNG seed
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Iterations of the fold recurrence
    #[serde(default = "default_fold_iterations")]
    pub fold_iterations: u32,

    /// Dimension of the lattice projection used for `lattice_norm`
    #[serde(default = "default_lattice_dim")]
    pub lattice_dim: usize,
}

fn default_rows() -> usize {
    50_000
}

fn default_seed() -> u64 {
    42
}

fn default_fold_iterations() -> u32 {
    crate::math::DEFAULT_FOLD_ITERATIONS
}

fn default_lattice_dim() -> usize {
    crate::math::LATTICE_DIM
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            rows: default_rows(),
            seed: default_seed(),
            fold_iterations: default_fold_iterations(),
            lattice_dim: default_lattice_dim(),
        }
    }
}

/// Sampling configuration.
///
/// K_i: The batch is always split into uniform, normal and structured
/// blocks, in that order. Only the distribution parameters are tunable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplingConfig {
    /// Half-open range `[low, high)` of the uniform block
    #[serde(default = "default_uniform_range")]
    pub uniform_range: (f64, f64),

    /// Mean of the normal block
    #[serde(default)]
    pub normal_mean: f64,

    /// Standard deviation of the normal block
    #[serde(default = "default_normal_std_dev")]
    pub normal_std_dev: f64,

    /// Range of the random factor applied to Fibonacci values in the
    /// structured block
    #[serde(default = "default_structured_factor_range")]
    pub structured_factor_range: (f64, f64),

    /// Structured block uses Fibonacci index `i mod fibonacci_period`
    #[serde(default = "default_fibonacci_period")]
    pub fibonacci_period: u32,

    /// Auxiliary index cycles through `1..=index_cycle`
    #[serde(default = "default_index_cycle")]
    pub index_cycle: u32,

    /// Offset added to `|x|` before the bounded-step operator
    #[serde(default = "default_mst_offset")]
    pub mst_offset: f64,
}

fn default_uniform_range() -> (f64, f64) {
    (-10.0, 10.0)
}

fn default_normal_std_dev() -> f64 {
    2.0
}

fn default_structured_factor_range() -> (f64, f64) {
    (0.1, 1.0)
}

fn default_fibonacci_period() -> u32 {
    20
}

fn default_index_cycle() -> u32 {
    30
}

fn default_mst_offset() -> f64 {
    1e-8
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            uniform_range: default_uniform_range(),
            normal_mean: 0.0,
            normal_std_dev: default_normal_std_dev(),
            structured_factor_range: default_structured_factor_range(),
            fibonacci_period: default_fibonacci_period(),
            index_cycle: default_index_cycle(),
            mst_offset: default_mst_offset(),
        }
    }
}

/// Serialization format of the dataset file.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Compressed columnar table
    #[default]
    Parquet,
    /// One JSON object per line
    Jsonl,
}

impl OutputFormat {
    /// File extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Parquet => "parquet",
            Self::Jsonl => "jsonl",
        }
    }

    /// Guess the format from a path's extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
            "parquet" => Some(Self::Parquet),
            "jsonl" | "ndjson" => Some(Self::Jsonl),
            _ => None,
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// Parquet column compression.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    #[default]
    Gzip,
    Snappy,
    Zstd,
    None,
}

/// Output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Output file path; `${VAR}` placeholders are expanded.
    /// Defaults to `dataset.<ext>` for the chosen format.
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Output format
    #[serde(default)]
    pub format: OutputFormat,

    /// Compression for Parquet output
    #[serde(default)]
    pub compression: Compression,

    /// Optional path for a JSON run-statistics report
    #[serde(default)]
    pub stats_path: Option<PathBuf>,

    /// Show a progress bar while generating
    #[serde(default = "default_true")]
    pub progress: bool,
}

fn default_true() -> bool {
    true
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: None,
            format: OutputFormat::default(),
            compression: Compression::default(),
            stats_path: None,
            progress: true,
        }
    }
}

impl OutputConfig {
    /// The output path with environment placeholders expanded, or the
    /// default `dataset.<ext>`.
    pub fn resolved_path(&self) -> PathBuf {
        match &self.path {
            Some(path) => PathBuf::from(expand_env_vars(&path.to_string_lossy())),
            None => default_output_path(self.format),
        }
    }
}

/// `dataset.<ext>` for the given format.
pub fn default_output_path(format: OutputFormat) -> PathBuf {
    PathBuf::from(format!("dataset.{}", format.extension()))
}

/// Whether `[lo, hi)` is a usable sampling range: finite ends, `lo < hi`,
/// and a width that is itself finite.
pub fn is_sampling_range(lo: f64, hi: f64) -> bool {
    lo.is_finite() && hi.is_finite() && lo < hi && (hi - lo).is_finite()
}

fn check_range(field: &'static str, (lo, hi): (f64, f64)) -> Result<(), ConfigError> {
    if is_sampling_range(lo, hi) {
        Ok(())
    } else {
        Err(ConfigError::invalid(
            field,
            format!("expected finite low < high with finite width, got [{lo}, {hi}]"),
        ))
    }
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// B_i(file exists) → Result
    /// B_i(file is valid TOML) → Result
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_owned(),
            source: e,
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_owned(),
            source: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Check parameter ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let s = &self.sampling;

        check_range("sampling.uniform_range", s.uniform_range)?;
        check_range("sampling.structured_factor_range", s.structured_factor_range)?;

        if !s.normal_mean.is_finite() {
            return Err(ConfigError::invalid(
                "sampling.normal_mean",
                "must be finite",
            ));
        }

        if !(s.normal_std_dev.is_finite() && s.normal_std_dev > 0.0) {
            return Err(ConfigError::invalid(
                "sampling.normal_std_dev",
                format!("must be positive, got {}", s.normal_std_dev),
            ));
        }

        if s.fibonacci_period == 0 {
            return Err(ConfigError::invalid(
                "sampling.fibonacci_period",
                "must be at least 1",
            ));
        }

        if s.index_cycle == 0 {
            return Err(ConfigError::invalid(
                "sampling.index_cycle",
                "must be at least 1",
            ));
        }

        if !(s.mst_offset.is_finite() && s.mst_offset >= 0.0) {
            return Err(ConfigError::invalid(
                "sampling.mst_offset",
                "must be finite and non-negative",
            ));
        }

        if self.generation.lattice_dim == 0 {
            return Err(ConfigError::invalid(
                "generation.lattice_dim",
                "must be at least 1",
            ));
        }

        Ok(())
    }
}

/// Expand environment variables in a string.
///
/// Supports ${VAR_NAME} syntax.
/// If the variable is not set, the placeholder is left unchanged.
pub fn expand_env_vars(s: &str) -> String {
    static RE: OnceLock<regex::Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        regex::Regex::new(r"\$\{([^}]+)\}").expect("placeholder pattern is a valid regex")
    });

    let mut result = s.to_string();
    for cap in re.captures_iter(s) {
        let var_name = &cap[1];
        if let Ok(value) = std::env::var(var_name) {
            result = result.replace(&cap[0], &value);
        }
    }

    result
}

/// Configuration errors.
///
/// Epistemic origin:
/// - B_i falsified: File not found, parse error
/// - I^R unresolved: Parameter outside its valid range
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}
