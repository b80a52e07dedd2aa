//! Error types for nrcgen.
//!
//! Epistemic taxonomy:
//! - B_i falsified: Expected failures (bad input, bad config)
//! - I^B materialized: Per-row numeric degeneracy, sink I/O failures

use thiserror::Error;

/// Top-level error type for nrcgen.
#[derive(Debug, Error)]
pub enum DatagenError {
    // ═══════════════════════════════════════════════════════════════════
    // B_i FALSIFIED — Belief proven wrong (expected failures)
    // ═══════════════════════════════════════════════════════════════════

    #[error("Configuration error: {0}")]
    Config(#[from] super::ConfigError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization backend unavailable: {0} (rebuild with the '{0}' feature)")]
    BackendUnavailable(&'static str),

    // ═══════════════════════════════════════════════════════════════════
    // I^B MATERIALIZED — Bounded ignorance became known-bad
    // ═══════════════════════════════════════════════════════════════════

    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Per-point numeric failure.
///
/// I^B: Raised by a transform for one sample point. The generator drops the
/// point and counts it; it never aborts the batch.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum NumericError {
    #[error("{op} overflowed for input {input}")]
    Overflow { op: &'static str, input: f64 },

    #[error("{op} domain error for input {input}: {reason}")]
    Domain {
        op: &'static str,
        input: f64,
        reason: &'static str,
    },

    #[error("{op} received non-finite input {input}")]
    NonFinite { op: &'static str, input: f64 },
}

impl NumericError {
    /// Name of the operation that failed.
    pub fn op(&self) -> &'static str {
        match self {
            Self::Overflow { op, .. } | Self::Domain { op, .. } | Self::NonFinite { op, .. } => op,
        }
    }

    /// Input value that triggered the failure.
    pub fn input(&self) -> f64 {
        match self {
            Self::Overflow { input, .. }
            | Self::Domain { input, .. }
            | Self::NonFinite { input, .. } => *input,
        }
    }
}

impl DatagenError {
    /// Create an IO error with context.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Whether the process should report this as a missing backend.
    pub fn is_backend_unavailable(&self) -> bool {
        matches!(self, Self::BackendUnavailable(_))
    }
}

/// Result type alias for nrcgen.
pub type Result<T> = std::result::Result<T, DatagenError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_error_accessors() {
        let err = NumericError::Overflow {
            op: "mst_step",
            input: 800.0,
        };
        assert_eq!(err.op(), "mst_step");
        assert_eq!(err.input(), 800.0);
        assert!(err.to_string().contains("overflowed"));
    }

    #[test]
    fn test_io_context() {
        let err = DatagenError::io(
            "writing output",
            std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
        );
        assert_eq!(err.to_string(), "IO error: writing output");
    }

    #[test]
    fn test_backend_unavailable_message() {
        let err = DatagenError::BackendUnavailable("parquet");
        assert!(err.is_backend_unavailable());
        assert!(err.to_string().contains("parquet"));
    }
}
