use thiserror::Error;

pub type TkResult<T> = Result<T, TkError>;

/// Error taxonomy shared by every calculation in the workspace.
///
/// All variants are terminal for the call that produced them: the core never
/// retries and never returns partial results.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TkError {
    /// A caller-supplied parameter violates a documented constraint.
    #[error("Invalid input: {what}")]
    InvalidInput { what: String },

    /// The property provider could not resolve a requested state.
    #[error("Property lookup failed: {message}")]
    PropertyLookup { message: String },

    /// A mathematical operation would be undefined (log of a non-positive
    /// argument, division by zero).
    #[error("Domain error: {what}")]
    Domain { what: String },

    /// A result or intermediate came out NaN or infinite.
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    /// An iterative solve ran out of iterations or lost its bracket.
    #[error("Convergence failed: {what}")]
    ConvergenceFailed { what: String },
}

impl TkError {
    pub fn invalid_input(what: impl Into<String>) -> Self {
        Self::InvalidInput { what: what.into() }
    }

    pub fn domain(what: impl Into<String>) -> Self {
        Self::Domain { what: what.into() }
    }

    /// Short machine-friendly category label, used by the CLI batch output.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput { .. } => "invalid_input",
            Self::PropertyLookup { .. } => "property_lookup",
            Self::Domain { .. } => "domain",
            Self::NonFinite { .. } => "non_finite",
            Self::ConvergenceFailed { .. } => "convergence_failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_constraint() {
        let err = TkError::invalid_input("condenser pressure must be below boiler pressure");
        assert!(err.to_string().contains("condenser pressure"));
        assert_eq!(err.kind(), "invalid_input");
    }

    #[test]
    fn domain_kind() {
        assert_eq!(TkError::domain("ln(0)").kind(), "domain");
    }
}
