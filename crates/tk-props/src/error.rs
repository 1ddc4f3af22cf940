//! Property lookup errors.

use thiserror::Error;
use tk_core::TkError;

/// Result type for property lookups.
pub type PropertyResult<T> = Result<T, PropertyError>;

/// Errors that can occur while resolving a thermodynamic state.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PropertyError {
    /// Non-physical values (non-positive pressure, NaN enthalpy, etc.).
    #[error("Non-physical value for {what}")]
    NonPhysical { what: &'static str },

    /// The requested state lies outside the data the provider covers.
    #[error("Value out of range for {what}")]
    OutOfRange { what: &'static str },

    /// Invalid argument.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// Operation not supported by this provider.
    #[error("Not supported: {what}")]
    NotSupported { what: &'static str },

    #[error("Unknown refrigerant '{name}'")]
    UnknownRefrigerant { name: String },

    /// Backend (CoolProp) error.
    #[error("Backend error: {message}")]
    Backend { message: String },
}

impl From<PropertyError> for TkError {
    fn from(err: PropertyError) -> Self {
        match err {
            PropertyError::NonPhysical { .. }
            | PropertyError::InvalidArg { .. }
            | PropertyError::UnknownRefrigerant { .. } => TkError::InvalidInput {
                what: err.to_string(),
            },
            PropertyError::OutOfRange { .. }
            | PropertyError::NotSupported { .. }
            | PropertyError::Backend { .. } => TkError::PropertyLookup {
                message: err.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = PropertyError::NonPhysical { what: "pressure" };
        assert!(err.to_string().contains("pressure"));

        let err = PropertyError::Backend {
            message: "CoolProp failed".into(),
        };
        assert!(err.to_string().contains("CoolProp"));
    }

    #[test]
    fn error_to_tk_error() {
        let err: TkError = PropertyError::OutOfRange {
            what: "temperature below saturation",
        }
        .into();
        assert!(matches!(err, TkError::PropertyLookup { .. }));

        let err: TkError = PropertyError::UnknownRefrigerant {
            name: "R999".into(),
        }
        .into();
        assert!(matches!(err, TkError::InvalidInput { ref what } if what.contains("R999")));
    }
}
