//! Error types for mixer solving.

use sm_core::CoreError;
use sm_fluids::FluidError;
use thiserror::Error;

/// Errors that abort a solve.
///
/// Running out of iterations is not an error; it is reported through
/// [`crate::ConvergenceStatus::MaxIterationsExceeded`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    /// Malformed caller input, detected before any property evaluation.
    #[error("Invalid input: {what}")]
    InvalidInput { what: String },

    /// The property model rejected a query.
    #[error("Property evaluation failed: {0}")]
    PropertyEvaluation(#[from] FluidError),
}

pub type SolverResult<T> = Result<T, SolverError>;

impl SolverError {
    pub(crate) fn invalid(what: impl Into<String>) -> Self {
        SolverError::InvalidInput { what: what.into() }
    }
}

impl From<SolverError> for CoreError {
    fn from(e: SolverError) -> Self {
        match e {
            SolverError::InvalidInput { what: _ } => CoreError::InvalidArg {
                what: "solver input",
            },
            SolverError::PropertyEvaluation(fluid) => fluid.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fluid_errors_convert() {
        let err: SolverError = FluidError::UnknownSpecies { name: "Q".into() }.into();
        assert!(matches!(err, SolverError::PropertyEvaluation(_)));
        assert!(err.to_string().contains("'Q'"));
    }

    #[test]
    fn solver_error_to_core_error() {
        let core: CoreError = SolverError::invalid("no streams").into();
        assert!(matches!(core, CoreError::InvalidArg { .. }));

        let core: CoreError =
            SolverError::PropertyEvaluation(FluidError::NonPhysical { what: "T" }).into();
        assert!(matches!(core, CoreError::Invariant { what: "T" }));
    }
}
