//! Closed-form transforms used to build dataset rows.
//!
//! Every operation here is pure. Scalar transforms accept either one `f64`
//! or a homogeneous sequence and return the same shape (see [`Elementwise`]).

mod constants;
mod gate;
mod lattice;
mod mst;
mod phi;
mod qrt;

pub use constants::*;
pub use gate::*;
pub use lattice::*;
pub use mst::*;
pub use phi::*;
pub use qrt::*;

use crate::models::NumericError;

/// Shape-preserving application of a scalar function.
///
/// Implemented for a single `f64` and for slices/vectors of `f64`, so each
/// transform is written once and works on both.
pub trait Elementwise {
    /// Same shape as the input, holding `f64` values.
    type Output;

    /// Apply `f` to every element.
    fn map_each<F>(self, f: F) -> Self::Output
    where
        F: Fn(f64) -> f64;

    /// Apply a fallible `f` to every element, stopping at the first error.
    fn try_map_each<F>(self, f: F) -> Result<Self::Output, NumericError>
    where
        F: Fn(f64) -> Result<f64, NumericError>;
}

impl Elementwise for f64 {
    type Output = f64;

    fn map_each<F>(self, f: F) -> f64
    where
        F: Fn(f64) -> f64,
    {
        f(self)
    }

    fn try_map_each<F>(self, f: F) -> Result<f64, NumericError>
    where
        F: Fn(f64) -> Result<f64, NumericError>,
    {
        f(self)
    }
}

impl Elementwise for &[f64] {
    type Output = Vec<f64>;

    fn map_each<F>(self, f: F) -> Vec<f64>
    where
        F: Fn(f64) -> f64,
    {
        self.iter().map(|&x| f(x)).collect()
    }

    fn try_map_each<F>(self, f: F) -> Result<Vec<f64>, NumericError>
    where
        F: Fn(f64) -> Result<f64, NumericError>,
    {
        self.iter().map(|&x| f(x)).collect()
    }
}

impl Elementwise for &Vec<f64> {
    type Output = Vec<f64>;

    fn map_each<F>(self, f: F) -> Vec<f64>
    where
        F: Fn(f64) -> f64,
    {
        self.as_slice().map_each(f)
    }

    fn try_map_each<F>(self, f: F) -> Result<Vec<f64>, NumericError>
    where
        F: Fn(f64) -> Result<f64, NumericError>,
    {
        self.as_slice().try_map_each(f)
    }
}

impl Elementwise for Vec<f64> {
    type Output = Vec<f64>;

    fn map_each<F>(mut self, f: F) -> Vec<f64>
    where
        F: Fn(f64) -> f64,
    {
        for x in self.iter_mut() {
            *x = f(*x);
        }
        self
    }

    fn try_map_each<F>(mut self, f: F) -> Result<Vec<f64>, NumericError>
    where
        F: Fn(f64) -> Result<f64, NumericError>,
    {
        for x in self.iter_mut() {
            *x = f(*x)?;
        }
        Ok(self)
    }
}

/// Round to a fixed number of decimal places.
///
/// Correctly rounded from the exact binary value, ties to even, so
/// `round_to(0.125, 2)` is `0.12`. Non-finite values and values with no
/// fractional bits (|x| ≥ 2⁵²) are returned unchanged.
pub fn round_to(x: f64, places: usize) -> f64 {
    if !x.is_finite() || x.abs() >= 4_503_599_627_370_496.0 {
        return x;
    }
    format!("{x:.places$}").parse().unwrap_or(x)
}
