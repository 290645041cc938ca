//! Steady-state well-mixed mixer with a linear outlet valve.

use crate::config::ConvergenceConfig;
use crate::error::{SolverError, SolverResult};
use crate::secant::secant_solve;
use crate::solution::{ConvergenceResult, ConvergenceStatus, MixedState};
use crate::stream::Stream;
use crate::valve::Valve;
use sm_core::units::{Pressure, k, kgps};
use sm_fluids::{Composition, FluidModel, SpecEnthalpy};
use tracing::{debug, info, warn};

/// Floor for the residual denominator [J/kg], so targets near h = 0 stay well scaled.
const MIN_ENTHALPY_SCALE: f64 = 1.0;

/// Solves mass and energy balances for N streams mixing into one volume.
///
/// Borrows its property model; the solver itself holds no state between solves.
pub struct SteadyMixerSolver<'a, M: FluidModel + ?Sized> {
    model: &'a M,
}

/// Mass-weighted inlet aggregate of the streams with positive flow.
struct InletBlend {
    total_mass_flow: f64,
    composition: Composition,
    target_enthalpy: SpecEnthalpy,
    mean_temperature: f64,
}

impl<'a, M: FluidModel + ?Sized> SteadyMixerSolver<'a, M> {
    pub fn new(model: &'a M) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &M {
        self.model
    }

    /// Compute the steady mixed state.
    ///
    /// The mixer pressure is `downstream_pressure + total_mass_flow / K` and
    /// the composition is the mass-weighted blend of the inlets; both are
    /// exact. The temperature is iterated until the relative enthalpy residual
    /// `(h(T) - h_target) / max(|h_target|, 1 J/kg)` is within tolerance.
    ///
    /// Running out of iterations yields `MaxIterationsExceeded` with the best
    /// estimate, not an error.
    pub fn solve(
        &self,
        streams: &[Stream],
        valve: &Valve,
        downstream_pressure: Pressure,
        config: &ConvergenceConfig,
    ) -> SolverResult<ConvergenceResult> {
        validate_inputs(streams, downstream_pressure)?;

        let blend = self.blend_inlets(streams)?;
        let mdot = kgps(blend.total_mass_flow);
        let p_mix = valve.upstream_pressure(mdot, downstream_pressure);
        let h_target = blend.target_enthalpy;
        let scale = h_target.abs().max(MIN_ENTHALPY_SCALE);

        debug!(
            total_mass_flow = blend.total_mass_flow,
            mixer_pressure = p_mix.value,
            target_enthalpy = h_target,
            initial_temperature = blend.mean_temperature,
            "mixer balances closed"
        );

        let composition = &blend.composition;
        let outcome = secant_solve(
            blend.mean_temperature,
            |t| {
                let h = self.model.evaluate_enthalpy(k(t), p_mix, composition)?;
                Ok((h - h_target) / scale)
            },
            config,
        )?;

        let status = if outcome.converged {
            info!(
                iterations = outcome.iterations,
                temperature = outcome.x,
                residual = outcome.residual,
                "mixer converged"
            );
            ConvergenceStatus::Converged
        } else {
            warn!(
                iterations = outcome.iterations,
                temperature = outcome.x,
                residual = outcome.residual,
                tolerance = config.tolerance(),
                "mixer did not converge within the iteration budget"
            );
            ConvergenceStatus::MaxIterationsExceeded
        };

        Ok(ConvergenceResult {
            state: MixedState::new(k(outcome.x), p_mix, blend.composition),
            iterations: outcome.iterations,
            residual: outcome.residual,
            status,
            total_mass_flow: mdot,
            target_enthalpy: h_target,
        })
    }

    /// Closed-form mass, species and enthalpy balance over the active streams.
    fn blend_inlets(&self, streams: &[Stream]) -> SolverResult<InletBlend> {
        let mut total = 0.0;
        let mut enthalpy_flow = 0.0;
        let mut temperature_flow = 0.0;
        let mut parts: Vec<(Composition, f64)> = Vec::with_capacity(streams.len());

        for (i, stream) in streams.iter().enumerate() {
            let m = stream.mass_flow().value;
            if m == 0.0 {
                warn!(stream = %stream.label(i), "ignoring stream with zero mass flow");
                continue;
            }
            let y = self.model.mass_fractions(stream.composition())?;
            let h = self.model.evaluate_enthalpy(
                stream.temperature(),
                stream.pressure(),
                stream.composition(),
            )?;
            debug!(
                stream = %stream.label(i),
                mass_flow = m,
                temperature = stream.temperature().value,
                enthalpy = h,
                "inlet aggregated"
            );
            total += m;
            enthalpy_flow += m * h;
            temperature_flow += m * stream.temperature().value;
            parts.push((y, m));
        }

        let composition = Composition::blend(parts.iter().map(|(y, m)| (y, *m)))?;
        Ok(InletBlend {
            total_mass_flow: total,
            composition,
            target_enthalpy: enthalpy_flow / total,
            mean_temperature: temperature_flow / total,
        })
    }
}

/// Reject malformed input before touching the property model.
fn validate_inputs(streams: &[Stream], downstream_pressure: Pressure) -> SolverResult<()> {
    if streams.is_empty() {
        return Err(SolverError::invalid("at least one stream is required"));
    }

    let mut total = 0.0;
    for (i, stream) in streams.iter().enumerate() {
        let m = stream.mass_flow().value;
        if !m.is_finite() || m < 0.0 {
            return Err(SolverError::invalid(format!(
                "{}: mass flow must be non-negative and finite, got {m}",
                stream.label(i)
            )));
        }
        total += m;
    }
    if total <= 0.0 || !total.is_finite() {
        return Err(SolverError::invalid(
            "at least one stream must have positive mass flow",
        ));
    }

    let p = downstream_pressure.value;
    if !p.is_finite() || p <= 0.0 {
        return Err(SolverError::invalid(format!(
            "downstream pressure must be positive and finite, got {p}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sm_core::units::pa;
    use sm_fluids::{Basis, IdealGasMixture};

    fn air() -> Composition {
        Composition::parse("O2:0.21, N2:0.78, AR:0.01", Basis::Mole).unwrap()
    }

    fn solve(streams: &[Stream]) -> SolverResult<ConvergenceResult> {
        let model = IdealGasMixture::builtin();
        let valve = Valve::new(10.0).unwrap();
        let config = ConvergenceConfig::new(1e-10, 50).unwrap();
        SteadyMixerSolver::new(&model).solve(streams, &valve, pa(101_325.0), &config)
    }

    #[test]
    fn empty_stream_list_is_invalid() {
        assert!(matches!(solve(&[]), Err(SolverError::InvalidInput { .. })));
    }

    #[test]
    fn negative_flow_is_invalid() {
        let s = Stream::new(air(), k(300.0), pa(1e5), kgps(-1.0));
        assert!(matches!(solve(&[s]), Err(SolverError::InvalidInput { .. })));
    }

    #[test]
    fn non_positive_downstream_pressure_is_invalid() {
        let model = IdealGasMixture::builtin();
        let valve = Valve::new(1.0).unwrap();
        let config = ConvergenceConfig::new(1e-9, 10).unwrap();
        let s = Stream::new(air(), k(300.0), pa(1e5), kgps(1.0));
        let err = SteadyMixerSolver::new(&model).solve(&[s], &valve, pa(0.0), &config);
        assert!(matches!(err, Err(SolverError::InvalidInput { .. })));
    }

    #[test]
    fn single_stream_converges_at_guess() {
        let s = Stream::new(air(), k(350.0), pa(2e5), kgps(3.0));
        let result = solve(&[s]).unwrap();
        assert!(result.is_converged());
        assert_eq!(result.iterations, 1);
        assert_eq!(result.state.temperature().value, 350.0);
        assert_eq!(result.state.pressure().value, 101_325.0 + 0.3);
    }

    #[test]
    fn zero_flow_stream_is_ignored() {
        let hot = Stream::new(air(), k(500.0), pa(1e5), kgps(0.0));
        let cold = Stream::new(air(), k(300.0), pa(1e5), kgps(1.0));
        let result = solve(&[hot, cold]).unwrap();
        assert_eq!(result.iterations, 1);
        assert_eq!(result.state.temperature().value, 300.0);
    }

    #[test]
    fn zero_flow_stream_contributes_no_species() {
        let model = IdealGasMixture::builtin();
        let fuel = Stream::new(Composition::pure("CH4"), k(450.0), pa(1e5), kgps(0.0));
        let air_in = Stream::new(air(), k(320.0), pa(1e5), kgps(2.0));
        let result = solve(&[fuel, air_in]).unwrap();

        assert!(result.is_converged());
        assert_eq!(result.iterations, 1);
        assert_eq!(result.state.temperature().value, 320.0);

        let mixed = result.state.composition();
        let expected = model.mass_fractions(&air()).unwrap();
        assert_eq!(mixed.basis(), Basis::Mass);
        assert_eq!(mixed.fraction("CH4"), 0.0);
        assert_eq!(mixed.len(), expected.len());
        for (species, y) in expected.iter() {
            assert!(
                (mixed.fraction(species) - y).abs() < 1e-12,
                "{species}: {} vs {y}",
                mixed.fraction(species)
            );
        }
    }

    #[test]
    fn unknown_species_surfaces_as_property_error() {
        let s = Stream::new(Composition::pure("XX"), k(300.0), pa(1e5), kgps(1.0));
        assert!(matches!(
            solve(&[s]),
            Err(SolverError::PropertyEvaluation(_))
        ));
    }

    #[test]
    fn hot_and_cold_air_meet_in_between() {
        let hot = Stream::new(air(), k(600.0), pa(1e5), kgps(1.0));
        let cold = Stream::new(air(), k(300.0), pa(1e5), kgps(1.0));
        let result = solve(&[hot, cold]).unwrap();
        assert!(result.is_converged());
        let t = result.state.temperature().value;
        // cp rises with T, so the hot stream carries more enthalpy above the mean.
        assert!(t > 450.0 && t < 455.0, "T = {t}");
    }
}
