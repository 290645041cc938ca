//! Thermodynamic state definitions.

use crate::composition::Composition;
use crate::error::{FluidError, FluidResult};
use sm_core::units::{Pressure, Temperature};

/// Specific enthalpy [J/kg].
///
/// Not part of uom's standard set, so we use f64 with clear documentation.
pub type SpecEnthalpy = f64;

/// Specific entropy [J/(kg·K)].
pub type SpecEntropy = f64;

/// Specific heat capacity [J/(kg·K)].
pub type SpecHeatCapacity = f64;

/// Thermodynamic state: pressure, temperature, and composition.
///
/// This is the minimal set of independent properties for an ideal-gas mixture.
/// Derived properties (density, enthalpy, etc.) are computed on demand
/// via the `FluidModel` trait.
#[derive(Debug, Clone, PartialEq)]
pub struct ThermoState {
    p: Pressure,
    t: Temperature,
    comp: Composition,
}

impl ThermoState {
    /// Create a state from pressure, temperature, and composition.
    ///
    /// Validates that pressure and temperature are positive and finite.
    pub fn from_pt(p: Pressure, t: Temperature, comp: Composition) -> FluidResult<Self> {
        let p_val = p.value;
        if !p_val.is_finite() || p_val <= 0.0 {
            return Err(FluidError::NonPhysical {
                what: "pressure must be positive and finite",
            });
        }

        let t_val = t.value;
        if !t_val.is_finite() || t_val <= 0.0 {
            return Err(FluidError::NonPhysical {
                what: "temperature must be positive and finite",
            });
        }

        Ok(Self { p, t, comp })
    }

    pub fn pressure(&self) -> Pressure {
        self.p
    }

    pub fn temperature(&self) -> Temperature {
        self.t
    }

    pub fn composition(&self) -> &Composition {
        &self.comp
    }
}
