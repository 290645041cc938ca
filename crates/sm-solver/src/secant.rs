//! Scalar secant iteration with a step limiter.

use crate::config::ConvergenceConfig;
use crate::error::SolverResult;
use tracing::debug;

/// Relative size of the forward-difference probe used for the first slope.
const FD_REL_STEP: f64 = 1e-6;

/// Largest step as a fraction of the current iterate magnitude.
const MAX_STEP_FRACTION: f64 = 0.5;

/// Secant iteration result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SecantResult {
    /// Iterate with the smallest |residual| seen
    pub x: f64,
    /// Residual at `x`
    pub residual: f64,
    /// Number of residual evaluations at iterates, the initial guess included
    pub iterations: usize,
    /// Converged flag
    pub converged: bool,
}

/// Find a root of `residual_fn` starting at `x0`.
///
/// The first slope comes from a forward finite difference; later slopes from
/// the last two iterates. Each step is clamped to `MAX_STEP_FRACTION * |x|` so
/// a positive iterate stays positive. Probe evaluations for the finite
/// difference do not count against the budget.
///
/// Convergence is `|r| <= tolerance`. When the budget runs out the best
/// iterate is returned with `converged == false`. Errors from `residual_fn`
/// propagate unchanged.
pub fn secant_solve<F>(
    x0: f64,
    mut residual_fn: F,
    config: &ConvergenceConfig,
) -> SolverResult<SecantResult>
where
    F: FnMut(f64) -> SolverResult<f64>,
{
    let tol = config.tolerance();
    let mut x = x0;
    let mut r = residual_fn(x)?;
    let mut iterations = 1;
    debug!(iteration = iterations, x, residual = r, "secant iterate");

    let mut best = (x, r);
    let mut prev: Option<(f64, f64)> = None;

    while r.abs() > tol && iterations < config.max_iterations() {
        let secant_slope = prev
            .filter(|(xp, _)| *xp != x)
            .map(|(xp, rp)| (r - rp) / (x - xp))
            .filter(|s| s.is_finite() && *s != 0.0);

        let slope = match secant_slope {
            Some(s) => s,
            None => {
                let dx = FD_REL_STEP * x.abs().max(1.0);
                let r_probe = residual_fn(x + dx)?;
                (r_probe - r) / dx
            }
        };

        if !slope.is_finite() || slope == 0.0 {
            debug!(iteration = iterations, x, slope, "secant stalled on flat residual");
            break;
        }

        let limit = MAX_STEP_FRACTION * x.abs().max(f64::MIN_POSITIVE);
        let step = (-r / slope).clamp(-limit, limit);

        prev = Some((x, r));
        x += step;
        r = residual_fn(x)?;
        iterations += 1;
        debug!(iteration = iterations, x, step, residual = r, "secant iterate");

        if r.abs() < best.1.abs() {
            best = (x, r);
        }
    }

    let converged = best.1.abs() <= tol;
    Ok(SecantResult {
        x: best.0,
        residual: best.1,
        iterations,
        converged,
    })
}
