//! Pipeline module - sampling and dataset generation.

mod generator;
mod sampler;

pub use generator::*;
pub use sampler::*;
