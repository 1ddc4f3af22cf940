//! Common checks shared by the cycle solvers.

use crate::error::{CycleError, SolveResult};
use tk_core::numeric::{ensure_finite, is_efficiency, is_positive_finite};

/// Ensure a derived value is finite, returning it or a domain error.
pub fn check_finite(value: f64, what: &'static str) -> SolveResult<f64> {
    ensure_finite(value, what).map_err(|_| CycleError::Domain { what })
}

/// Ensure a caller-supplied value is positive and finite.
pub fn require_positive(value: f64, what: &'static str) -> SolveResult<f64> {
    if is_positive_finite(value) {
        Ok(value)
    } else {
        Err(CycleError::InvalidInput { what })
    }
}

/// Ensure an efficiency lies in (0, 1].
pub fn require_efficiency(value: f64, what: &'static str) -> SolveResult<f64> {
    if is_efficiency(value) {
        Ok(value)
    } else {
        Err(CycleError::InvalidInput { what })
    }
}

/// Ensure a derived quantity used as a divisor is positive and finite.
pub fn positive_divisor(value: f64, what: &'static str) -> SolveResult<f64> {
    if is_positive_finite(value) {
        Ok(value)
    } else {
        Err(CycleError::Domain { what })
    }
}
