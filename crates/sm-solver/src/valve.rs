//! Linear outlet valve.

use crate::error::{SolverError, SolverResult};
use sm_core::numeric::ensure_positive;
use sm_core::units::{MassRate, Pressure, kgps, pa};

/// One-way valve with `mdot = K (P_up - P_down)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Valve {
    /// Valve coefficient K [kg/(s·Pa)]
    coefficient: f64,
}

impl Valve {
    pub fn new(coefficient: f64) -> SolverResult<Self> {
        let coefficient = ensure_positive(coefficient, "valve coefficient").map_err(|e| {
            SolverError::invalid(format!("{e} (valve coefficient = {coefficient})"))
        })?;
        Ok(Self { coefficient })
    }

    pub fn coefficient(&self) -> f64 {
        self.coefficient
    }

    /// Mass flow through the valve; zero when the pressure difference is reversed.
    pub fn mass_flow(&self, p_up: Pressure, p_down: Pressure) -> MassRate {
        let dp = p_up.value - p_down.value;
        kgps((self.coefficient * dp).max(0.0))
    }

    /// Upstream pressure that drives `mdot` through the valve.
    pub fn upstream_pressure(&self, mdot: MassRate, p_down: Pressure) -> Pressure {
        pa(p_down.value + mdot.value / self.coefficient)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive_coefficient() {
        assert!(Valve::new(0.0).is_err());
        assert!(Valve::new(-2.0).is_err());
        assert!(Valve::new(f64::INFINITY).is_err());
    }

    #[test]
    fn linear_flow_law() {
        let valve = Valve::new(1e-3).unwrap();
        let mdot = valve.mass_flow(pa(102_000.0), pa(101_000.0));
        assert!((mdot.value - 1.0).abs() < 1e-12);
    }

    #[test]
    fn reverse_flow_is_blocked() {
        let valve = Valve::new(1e-3).unwrap();
        assert_eq!(valve.mass_flow(pa(100_000.0), pa(101_000.0)).value, 0.0);
    }

    #[test]
    fn upstream_pressure_inverts_flow_law() {
        let valve = Valve::new(10.0).unwrap();
        let p_down = pa(101_325.0);
        let p_up = valve.upstream_pressure(kgps(4.0), p_down);
        assert_eq!(p_up.value, 101_325.0 + 0.4);
        assert!((valve.mass_flow(p_up, p_down).value - 4.0).abs() < 1e-9);
    }
}
