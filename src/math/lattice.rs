//! Deterministic scalar → fixed-length vector projection.

use super::{ConstantSet, LATTICE_DIM};

/// Projects a scalar onto a decaying, rotating basis:
/// `Lᵢ(x) = x · φ^(−i/N) · cos(i · θ)`, θ = 51.853° in radians.
///
/// The basis is computed once at construction and shared by every call.
#[derive(Debug, Clone)]
pub struct LatticeProjector {
    basis: Vec<f64>,
    basis_norm: f64,
}

impl LatticeProjector {
    /// Projector with an explicit dimension.
    pub fn new(dim: usize) -> Self {
        let c = ConstantSet::get();
        let n = dim as f64;
        let basis: Vec<f64> = (0..dim)
            .map(|i| {
                let i = i as f64;
                c.phi.powf(-i / n) * (i * c.giza_rad).cos()
            })
            .collect();
        let basis_norm = basis.iter().map(|b| b * b).sum::<f64>().sqrt();
        Self { basis, basis_norm }
    }

    /// Output dimension.
    pub fn dim(&self) -> usize {
        self.basis.len()
    }

    /// The projection of `x = 1`.
    pub fn basis(&self) -> &[f64] {
        &self.basis
    }

    pub fn project(&self, x: f64) -> Vec<f64> {
        self.basis.iter().map(|b| x * b).collect()
    }

    /// One `dim()`-length row per input, in input order.
    pub fn project_batch(&self, xs: &[f64]) -> Vec<Vec<f64>> {
        xs.iter().map(|&x| self.project(x)).collect()
    }

    /// Euclidean norm of `project(x)`, computed as `|x| · ‖basis‖`.
    pub fn norm(&self, x: f64) -> f64 {
        x.abs() * self.basis_norm
    }
}

impl Default for LatticeProjector {
    fn default() -> Self {
        Self::new(LATTICE_DIM)
    }
}

/// Euclidean length of a vector.
pub fn l2_norm(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projection_length() {
        let p = LatticeProjector::default();
        assert_eq!(p.dim(), 2048);
        assert_eq!(p.project(3.7).len(), 2048);
        assert_eq!(p.project(0.0).len(), 2048);
    }

    #[test]
    fn test_first_element_is_input() {
        // φ⁰ · cos(0) = 1
        let p = LatticeProjector::default();
        assert_eq!(p.project(-4.25)[0], -4.25);
    }

    #[test]
    fn test_norm_scales_linearly() {
        let p = LatticeProjector::default();
        let base = p.norm(1.5);
        for c in [0.5, 2.0, 10.0, 1234.5] {
            let scaled = p.norm(1.5 * c);
            assert!((scaled - c * base).abs() <= 1e-12 * scaled.max(1.0));
        }
    }

    #[test]
    fn test_norm_matches_projected_vector() {
        let p = LatticeProjector::default();
        for x in [-9.0, 0.3, 2.0, 77.7] {
            let direct = l2_norm(&p.project(x));
            assert!((direct - p.norm(x)).abs() < 1e-9 * direct.max(1.0));
        }
    }

    #[test]
    fn test_envelope_decays() {
        let p = LatticeProjector::default();
        let c = ConstantSet::get();
        for (i, b) in p.basis().iter().enumerate() {
            let envelope = c.phi.powf(-(i as f64) / 2048.0);
            assert!(b.abs() <= envelope + 1e-15);
        }
        assert!(p.basis()[2047].abs() < 1.0 / c.phi + 1e-12);
    }

    #[test]
    fn test_batch_is_rectangular() {
        let p = LatticeProjector::new(16);
        let rows = p.project_batch(&[1.0, 2.0, 3.0]);
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| r.len() == 16));
        assert_eq!(rows[1], p.project(2.0));
    }
}
