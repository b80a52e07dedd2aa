//! Residue-exclusion gate.

use super::{Elementwise, TUPT_MODULUS, TUPT_PATTERN};

/// Zero any value whose residue mod 2187 is divisible by 3, 6, 7 or 9.
///
/// The residue uses floored modulo, so negative inputs map into
/// `[0, 2187]`. All four divisors are tested independently. Values that pass
/// are returned unchanged; applying the gate twice equals applying it once.
pub fn apply_exclusion_gate<T: Elementwise>(x: T) -> T::Output {
    x.map_each(|v| if is_excluded(v) { 0.0 } else { v })
}

/// Whether the gate would zero `x`.
pub fn is_excluded(x: f64) -> bool {
    let residue = x.rem_euclid(TUPT_MODULUS);
    TUPT_PATTERN
        .iter()
        .any(|&d| residue % f64::from(d) == 0.0)
}
