//! Convergence settings.

use crate::error::{SolverError, SolverResult};
use sm_core::numeric::ensure_positive;

/// Tolerance and iteration budget for the energy-balance iteration.
///
/// No `Default`: callers state both values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConvergenceConfig {
    tolerance: f64,
    max_iterations: usize,
}

impl ConvergenceConfig {
    /// `tolerance` is the relative enthalpy residual accepted as converged.
    /// `max_iterations` counts enthalpy evaluations of the mixture, the
    /// initial guess included.
    pub fn new(tolerance: f64, max_iterations: usize) -> SolverResult<Self> {
        let tolerance = ensure_positive(tolerance, "tolerance")
            .map_err(|e| SolverError::invalid(format!("{e} (tolerance = {tolerance})")))?;
        if max_iterations == 0 {
            return Err(SolverError::invalid("max_iterations must be at least 1"));
        }
        Ok(Self {
            tolerance,
            max_iterations,
        })
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }
}
