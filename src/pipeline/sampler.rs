//! Sample point generation.
//!
//! K_i: One seeded RNG draws the uniform block, then the normal block, then
//! the structured factors. Same seed and config → same points, in order.

use crate::math::binet;
use crate::models::{
    is_sampling_range, BlockSizes, DatagenError, Result, SamplePoint, SampleSource, SamplingConfig,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal, Uniform};

/// Draws the three sampling blocks for a batch.
pub struct Sampler<'a> {
    config: &'a SamplingConfig,
}

impl<'a> Sampler<'a> {
    pub fn new(config: &'a SamplingConfig) -> Self {
        Self { config }
    }

    /// Draw `rows` points with the given seed.
    ///
    /// Order: `⌊R/3⌋` uniform, `⌊R/3⌋` normal, remainder structured. Point at
    /// position `p` gets auxiliary index `(p mod index_cycle) + 1`.
    pub fn draw(&self, rows: usize, seed: u64) -> Result<Vec<SamplePoint>> {
        let blocks = BlockSizes::partition(rows);
        let mut rng = StdRng::seed_from_u64(seed);

        let uniform = self.uniform_dist()?;
        let normal = Normal::new(self.config.normal_mean, self.config.normal_std_dev)
            .map_err(|e| DatagenError::InvalidInput(format!("normal distribution: {e}")))?;
        let factor = self.factor_dist()?;
        let period = self.config.fibonacci_period.max(1) as usize;

        let mut values: Vec<(f64, SampleSource)> = Vec::with_capacity(rows);
        values.extend((0..blocks.uniform).map(|_| (uniform.sample(&mut rng), SampleSource::Uniform)));
        values.extend((0..blocks.normal).map(|_| (normal.sample(&mut rng), SampleSource::Normal)));
        values.extend((0..blocks.structured).map(|i| {
            let fib = binet((i % period) as i32);
            (fib * factor.sample(&mut rng), SampleSource::Structured)
        }));

        let cycle = self.config.index_cycle.max(1) as usize;
        Ok(values
            .into_iter()
            .enumerate()
            .map(|(position, (x, source))| SamplePoint {
                x,
                index: (position % cycle) as u32 + 1,
                source,
            })
            .collect())
    }

    fn uniform_dist(&self) -> Result<Uniform<f64>> {
        let (lo, hi) = self.config.uniform_range;
        if !is_sampling_range(lo, hi) {
            return Err(DatagenError::InvalidInput(format!(
                "uniform range [{lo}, {hi}) is empty or too wide"
            )));
        }
        Ok(Uniform::new(lo, hi))
    }

    fn factor_dist(&self) -> Result<Uniform<f64>> {
        let (lo, hi) = self.config.structured_factor_range;
        if !is_sampling_range(lo, hi) {
            return Err(DatagenError::InvalidInput(format!(
                "structured factor range [{lo}, {hi}) is empty or too wide"
            )));
        }
        Ok(Uniform::new(lo, hi))
    }
}
