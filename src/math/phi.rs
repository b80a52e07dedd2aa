//! Golden-ratio recurrences: the fold operator and Binet's closed form.

use super::{ConstantSet, Elementwise};

/// Default number of fold iterations.
pub const DEFAULT_FOLD_ITERATIONS: u32 = 5;

/// Fold operator: `x ← φⁿ·x + 1/√5` for `n = 1..=iterations`.
///
/// Overflow to ±∞ for large inputs or iteration counts is accepted and
/// propagated as-is.
pub fn phi_infinity_fold<T: Elementwise>(x: T, iterations: u32) -> T::Output {
    let c = ConstantSet::get();
    x.map_each(|mut v| {
        for n in 1..=iterations {
            v = c.phi.powi(n as i32) * v + c.fold_offset;
        }
        v
    })
}

/// Fold with [`DEFAULT_FOLD_ITERATIONS`].
pub fn phi_fold<T: Elementwise>(x: T) -> T::Output {
    phi_infinity_fold(x, DEFAULT_FOLD_ITERATIONS)
}

/// Binet's formula: `Fₙ = (φⁿ − (−φ)⁻ⁿ) / √5`.
///
/// Exact to within rounding for small `n`; defined for negative `n` too.
/// Saturates to ±∞ once |n| passes ~1475.
pub fn binet(n: i32) -> f64 {
    let c = ConstantSet::get();
    // (−φ)⁻ⁿ as a reciprocal so that n = i32::MIN needs no negation
    (c.phi.powi(n) - (-c.phi).powi(n).recip()) / c.sqrt_5
}
