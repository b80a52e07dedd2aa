//! Core data models for nrcgen.
//!
//! Epistemic mapping:
//! - K_i (Knowledge): Concrete types with compile-time guarantees
//! - B_i (Beliefs): Per-row outcomes wrapped in typed results
//! - I^R (Resolvable): Config parameters
//! - I^B (Bounded): Error variants, numeric degeneracy counted not raised

mod config;
mod error;
mod sample;

pub use config::*;
pub use error::*;
pub use sample::*;
