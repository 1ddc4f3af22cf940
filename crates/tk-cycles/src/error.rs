//! Error types for cycle solvers.

use thiserror::Error;
use tk_core::error::TkError;
use tk_props::PropertyError;

/// Errors that can occur while solving a cycle.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CycleError {
    /// A caller-supplied parameter violates a documented constraint.
    #[error("Invalid input: {what}")]
    InvalidInput { what: &'static str },

    #[error("Property lookup failed: {0}")]
    PropertyLookup(#[from] PropertyError),

    /// A derived quantity is non-finite or a denominator is not positive.
    #[error("Domain error: {what}")]
    Domain { what: &'static str },
}

pub type SolveResult<T> = Result<T, CycleError>;

impl From<CycleError> for TkError {
    fn from(e: CycleError) -> Self {
        match e {
            CycleError::InvalidInput { what } => TkError::InvalidInput { what: what.into() },
            CycleError::PropertyLookup(inner) => TkError::PropertyLookup {
                message: inner.to_string(),
            },
            CycleError::Domain { what } => TkError::Domain { what: what.into() },
        }
    }
}
