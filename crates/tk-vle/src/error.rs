//! Error types for equilibrium calculations.

use thiserror::Error;
use tk_core::TkError;

pub type EquilibriumResult<T> = Result<T, VleError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum VleError {
    #[error("Invalid input: {what}")]
    InvalidInput { what: &'static str },

    /// Logarithm of a non-positive argument, non-finite intermediate, or a
    /// zero total pressure.
    #[error("Domain error: {what}")]
    Domain { what: &'static str },

    #[error("Convergence failed for {what} after {iterations} iterations")]
    ConvergenceFailed {
        what: &'static str,
        iterations: usize,
    },
}

impl From<VleError> for TkError {
    fn from(e: VleError) -> Self {
        match e {
            VleError::InvalidInput { what } => TkError::InvalidInput { what: what.into() },
            VleError::Domain { what } => TkError::Domain { what: what.into() },
            VleError::ConvergenceFailed { .. } => TkError::ConvergenceFailed {
                what: e.to_string(),
            },
        }
    }
}
