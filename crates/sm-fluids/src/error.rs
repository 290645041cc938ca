//! Fluid property errors.

use sm_core::CoreError;
use thiserror::Error;

/// Result type for fluid operations.
pub type FluidResult<T> = Result<T, FluidError>;

/// Errors that can occur during fluid property calculations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FluidError {
    /// Non-physical values (negative density, pressure, etc.).
    #[error("Non-physical value for {what}")]
    NonPhysical { what: &'static str },

    /// Invalid argument.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// Species name not present in the model's species catalog.
    #[error("Unknown species '{name}'")]
    UnknownSpecies { name: String },

    /// Malformed composition or species text.
    #[error("Parse error: {message}")]
    Parse { message: String },
}

impl From<FluidError> for CoreError {
    fn from(err: FluidError) -> Self {
        match err {
            FluidError::NonPhysical { what } => CoreError::Invariant { what },
            FluidError::InvalidArg { what } => CoreError::InvalidArg { what },
            FluidError::UnknownSpecies { .. } => CoreError::InvalidArg {
                what: "unknown species",
            },
            FluidError::Parse { .. } => CoreError::InvalidArg {
                what: "composition text",
            },
        }
    }
}
