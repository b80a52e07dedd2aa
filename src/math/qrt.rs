//! Damped-oscillation ("QRT wave") operator.

use super::{ConstantSet, Elementwise};

/// `sin(φ·√2·51.853·x) · exp(−x²/φ) + cos(π/φ·x)`
///
/// Total over finite reals. The Gaussian factor drives the sine term to zero
/// as |x| grows, leaving the cosine baseline.
pub fn qrt_damping<T: Elementwise>(x: T) -> T::Output {
    let c = ConstantSet::get();
    x.map_each(|v| {
        let oscillation = (c.qrt_sin_freq * v).sin();
        let damping = (-(v * v) / c.phi).exp();
        oscillation * damping + (c.qrt_cos_freq * v).cos()
    })
}

/// The undamped cosine baseline the wave converges to.
pub fn qrt_baseline(x: f64) -> f64 {
    (ConstantSet::get().qrt_cos_freq * x).cos()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qrt_at_origin() {
        // sin(0)·1 + cos(0)
        assert_eq!(qrt_damping(0.0), 1.0);
    }

    #[test]
    fn test_qrt_bounded_far_from_origin() {
        let eps = 1e-9;
        let mut x = 10.0;
        while x < 500.0 {
            for v in [x, -x] {
                let q = qrt_damping(v);
                assert!(q.abs() <= 1.0 + eps, "qrt({v}) = {q}");
            }
            x += 0.37;
        }
    }

    #[test]
    fn test_qrt_converges_to_baseline() {
        for x in [6.0, 12.5, -20.0, 100.0] {
            assert!((qrt_damping(x) - qrt_baseline(x)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_qrt_batch_shape() {
        let xs = [-3.0, -1.0, 0.0, 1.0, 3.0];
        let out = qrt_damping(xs.as_slice());
        assert_eq!(out.len(), xs.len());
        assert_eq!(out[2], 1.0);
    }
}
