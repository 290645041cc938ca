//! Mixer solve results.

use sm_core::units::{MassRate, Pressure, Temperature};
use sm_fluids::{Composition, FluidResult, SpecEnthalpy, ThermoState};
use std::fmt;

/// Mixer contents: temperature, pressure and mass-basis composition.
#[derive(Debug, Clone, PartialEq)]
pub struct MixedState {
    temperature: Temperature,
    pressure: Pressure,
    composition: Composition,
}

impl MixedState {
    pub(crate) fn new(temperature: Temperature, pressure: Pressure, composition: Composition) -> Self {
        Self {
            temperature,
            pressure,
            composition,
        }
    }

    pub fn temperature(&self) -> Temperature {
        self.temperature
    }

    pub fn pressure(&self) -> Pressure {
        self.pressure
    }

    /// Mass fractions, normalized to sum to 1.
    pub fn composition(&self) -> &Composition {
        &self.composition
    }

    /// The mixed state as a [`ThermoState`] for further property queries.
    pub fn to_thermo_state(&self) -> FluidResult<ThermoState> {
        ThermoState::from_pt(self.pressure, self.temperature, self.composition.clone())
    }
}

/// How a solve ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvergenceStatus {
    Converged,
    MaxIterationsExceeded,
}

impl fmt::Display for ConvergenceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvergenceStatus::Converged => write!(f, "converged"),
            ConvergenceStatus::MaxIterationsExceeded => write!(f, "max iterations exceeded"),
        }
    }
}

/// Outcome of [`crate::SteadyMixerSolver::solve`].
#[derive(Debug, Clone)]
pub struct ConvergenceResult {
    /// Converged state, or the best estimate when the budget ran out
    pub state: MixedState,
    /// Mixture enthalpy evaluations used, the initial guess included
    pub iterations: usize,
    /// Relative enthalpy residual at `state`
    pub residual: f64,
    pub status: ConvergenceStatus,
    /// Total inlet (and outlet) mass flow
    pub total_mass_flow: MassRate,
    /// Mass-weighted inlet specific enthalpy [J/kg]
    pub target_enthalpy: SpecEnthalpy,
}

impl ConvergenceResult {
    pub fn is_converged(&self) -> bool {
        self.status == ConvergenceStatus::Converged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sm_core::units::{k, pa};

    #[test]
    fn status_display() {
        assert_eq!(ConvergenceStatus::Converged.to_string(), "converged");
        assert_eq!(
            ConvergenceStatus::MaxIterationsExceeded.to_string(),
            "max iterations exceeded"
        );
    }

    #[test]
    fn mixed_state_to_thermo_state() {
        let comp = Composition::new_mass_fractions([("N2", 0.7), ("O2", 0.3)]).unwrap();
        let mixed = MixedState::new(k(320.0), pa(2e5), comp.clone());
        let state = mixed.to_thermo_state().unwrap();
        assert_eq!(state.temperature().value, 320.0);
        assert_eq!(state.pressure().value, 2e5);
        assert_eq!(state.composition(), &comp);
    }
}
