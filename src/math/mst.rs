//! Bounded-step ("MST") operator.

use super::{ConstantSet, Elementwise, MST_MODULUS};
use crate::models::NumericError;

/// `|floor(1000·sinh(x)) + ln(x² + 1) + φˣ| mod 24389`
///
/// Fails when an intermediate term leaves the finite range (sinh or the φ
/// power overflow, usually for |x| beyond ~703) or when the log argument is
/// invalid. Callers that sample unbounded inputs must expect `Err`.
pub fn mst_step<T: Elementwise>(x: T) -> Result<T::Output, NumericError> {
    x.try_map_each(mst_step_scalar)
}

fn mst_step_scalar(x: f64) -> Result<f64, NumericError> {
    const OP: &str = "mst_step";

    if x.is_nan() {
        return Err(NumericError::NonFinite { op: OP, input: x });
    }

    let sinh_term = (1000.0 * x.sinh()).floor();
    if !sinh_term.is_finite() {
        return Err(NumericError::Overflow { op: OP, input: x });
    }

    let log_arg = x * x + 1.0;
    if !log_arg.is_finite() {
        return Err(NumericError::Overflow { op: OP, input: x });
    }
    if log_arg <= 0.0 {
        return Err(NumericError::Domain {
            op: OP,
            input: x,
            reason: "logarithm of a non-positive value",
        });
    }

    let power_term = ConstantSet::get().phi.powf(x);
    if !power_term.is_finite() {
        return Err(NumericError::Overflow { op: OP, input: x });
    }

    let total = sinh_term + log_arg.ln() + power_term;
    Ok(total.abs() % MST_MODULUS)
}
