//! Fluid property model trait and validation helpers.

use crate::composition::{Basis, Composition};
use crate::error::FluidResult;
use crate::state::{SpecEnthalpy, SpecEntropy, SpecHeatCapacity, ThermoState};
use sm_core::units::{Density, Pressure, Temperature, Velocity};

/// Cached thermodynamic properties from a single state.
///
/// Batches the property queries a report needs into one call.
#[derive(Clone, Debug)]
pub struct ThermoPropertyPack {
    /// Pressure [Pa]
    pub p: Pressure,

    /// Temperature [K]
    pub t: Temperature,

    /// Density [kg/m³]
    pub rho: Density,

    /// Specific enthalpy [J/kg]
    pub h: SpecEnthalpy,

    /// Specific entropy [J/(kg·K)]
    pub s: SpecEntropy,

    /// Specific heat capacity at constant pressure [J/(kg·K)]
    pub cp: SpecHeatCapacity,

    /// Specific heat capacity at constant volume [J/(kg·K)]
    pub cv: SpecHeatCapacity,

    /// Heat capacity ratio γ = cp/cv (dimensionless)
    pub gamma: f64,

    /// Frozen speed of sound [m/s]
    pub a: Velocity,

    /// Mean molar mass [kg/kmol]
    pub molar_mass: f64,
}

impl ThermoPropertyPack {
    /// Return a summary string of all contained properties (for debugging).
    pub fn summary(&self) -> String {
        format!(
            "Pack(P={:.0}Pa,T={:.2}K,ρ={:.4}kg/m³,h={:.1}J/kg,cp={:.1}J/kg·K,γ={:.4},a={:.1}m/s,M={:.3})",
            self.p.value,
            self.t.value,
            self.rho.value,
            self.h,
            self.cp,
            self.gamma,
            self.a.value,
            self.molar_mass
        )
    }
}

/// Trait for fluid property models.
///
/// Evaluation goes through `&self`, so an implementation holding scratch state must
/// use its own synchronisation or be owned per caller. Implementations must be
/// thread-safe (Send + Sync) and must report failures as errors, never as NaN.
pub trait FluidModel: Send + Sync {
    /// Get the model name (for debugging/logging).
    fn name(&self) -> &str;

    /// Molar mass [kg/kmol] of a single species.
    fn species_molar_mass(&self, species: &str) -> FluidResult<f64>;

    /// Check that every species in `comp` can be evaluated by this model.
    fn check_composition(&self, comp: &Composition) -> FluidResult<()>;

    fn supports_composition(&self, comp: &Composition) -> bool {
        self.check_composition(comp).is_ok()
    }

    /// Create a thermodynamic state from pressure, temperature and composition.
    fn state(&self, p: Pressure, t: Temperature, comp: Composition) -> FluidResult<ThermoState> {
        let state = ThermoState::from_pt(p, t, comp)?;
        self.check_composition(state.composition())?;
        Ok(state)
    }

    /// Mean molar mass [kg/kmol] of a composition on either basis.
    fn mean_molar_mass(&self, comp: &Composition) -> FluidResult<f64> {
        comp.mean_molar_mass(|s| self.species_molar_mass(s))
    }

    /// The composition expressed as mass fractions.
    fn mass_fractions(&self, comp: &Composition) -> FluidResult<Composition> {
        comp.to_basis(Basis::Mass, |s| self.species_molar_mass(s))
    }

    /// The composition expressed as mole fractions.
    fn mole_fractions(&self, comp: &Composition) -> FluidResult<Composition> {
        comp.to_basis(Basis::Mole, |s| self.species_molar_mass(s))
    }

    /// Compute density [kg/m³] at the given state.
    fn rho(&self, state: &ThermoState) -> FluidResult<Density>;

    /// Compute specific enthalpy [J/kg] at the given state.
    fn h(&self, state: &ThermoState) -> FluidResult<SpecEnthalpy>;

    /// Compute specific entropy [J/(kg·K)] at the given state.
    fn s(&self, state: &ThermoState) -> FluidResult<SpecEntropy>;

    /// Compute specific heat capacity at constant pressure [J/(kg·K)] at the given state.
    fn cp(&self, state: &ThermoState) -> FluidResult<SpecHeatCapacity>;

    /// Compute specific heat capacity at constant volume [J/(kg·K)] at the given state.
    fn cv(&self, state: &ThermoState) -> FluidResult<SpecHeatCapacity> {
        let cp = self.cp(state)?;
        let gamma = self.gamma(state)?;
        let cv = cp / gamma;
        validation::validate_positive(cv, "cv must be positive and finite")?;
        Ok(cv)
    }

    /// Compute heat capacity ratio γ = cp/cv (dimensionless) at the given state.
    fn gamma(&self, state: &ThermoState) -> FluidResult<f64>;

    /// Compute the frozen speed of sound [m/s] at the given state.
    fn a(&self, state: &ThermoState) -> FluidResult<Velocity>;

    /// Specific enthalpy [J/kg] at (T, P, composition).
    ///
    /// This is the single query the steady mixer needs from a property backend.
    fn evaluate_enthalpy(
        &self,
        t: Temperature,
        p: Pressure,
        comp: &Composition,
    ) -> FluidResult<SpecEnthalpy> {
        let state = self.state(p, t, comp.clone())?;
        self.h(&state)
    }

    /// Compute a complete property pack in one call.
    fn property_pack(&self, state: &ThermoState) -> FluidResult<ThermoPropertyPack> {
        Ok(ThermoPropertyPack {
            p: state.pressure(),
            t: state.temperature(),
            rho: self.rho(state)?,
            h: self.h(state)?,
            s: self.s(state)?,
            cp: self.cp(state)?,
            cv: self.cv(state)?,
            gamma: self.gamma(state)?,
            a: self.a(state)?,
            molar_mass: self.mean_molar_mass(state.composition())?,
        })
    }
}

/// Checks applied to every computed property.
pub(crate) mod validation {
    use crate::error::{FluidError, FluidResult};

    /// Density, cp, cv and sound speed must be strictly positive.
    pub fn validate_positive(v: f64, what: &'static str) -> FluidResult<()> {
        if !v.is_finite() || v <= 0.0 {
            return Err(FluidError::NonPhysical { what });
        }
        Ok(())
    }

    pub fn validate_gamma(gamma: f64) -> FluidResult<()> {
        if !gamma.is_finite() || gamma < 1.0 {
            return Err(FluidError::NonPhysical {
                what: "gamma must be >= 1 and finite",
            });
        }
        Ok(())
    }

    /// Enthalpy and entropy may take any sign.
    pub fn validate_finite(v: f64, what: &'static str) -> FluidResult<()> {
        if !v.is_finite() {
            return Err(FluidError::NonPhysical { what });
        }
        Ok(())
    }
}
