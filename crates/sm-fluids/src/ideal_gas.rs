//! Ideal-gas mixture property model.
//!
//! Mixture properties are mass-weighted sums of per-species molar properties:
//!
//! ```text
//! h  = Σ y_k h_k(T) / M_k
//! cp = Σ y_k cp_k(T) / M_k
//! cv = cp - R / M̄
//! ρ  = P M̄ / (R T)
//! s  = Σ y_k / M_k (s°_k(T) - R ln(x_k P / P_ref))
//! a  = sqrt(γ R T / M̄)
//! ```

use crate::composition::Composition;
use crate::error::{FluidError, FluidResult};
use crate::model::{FluidModel, validation};
use crate::species::{SpeciesCatalog, SpeciesData};
use crate::state::{SpecEnthalpy, SpecEntropy, SpecHeatCapacity, ThermoState};
use sm_core::units::constants::{ONE_ATM_PA, R_UNIVERSAL};
use sm_core::units::{Density, Velocity, kgpm3, mps};

/// Ideal-gas mixture over a species catalog.
///
/// Immutable after construction, so one instance can serve any number of callers.
#[derive(Debug, Clone)]
pub struct IdealGasMixture {
    catalog: SpeciesCatalog,
    /// Reference pressure for standard-state entropy [Pa]
    p_ref: f64,
}

impl IdealGasMixture {
    pub fn new(catalog: SpeciesCatalog) -> Self {
        Self {
            catalog,
            p_ref: ONE_ATM_PA,
        }
    }

    /// Model over the built-in species set.
    pub fn builtin() -> Self {
        Self::new(SpeciesCatalog::builtin())
    }

    /// Add or replace one species.
    pub fn with_species(mut self, data: SpeciesData) -> Self {
        self.catalog.insert(data);
        self
    }

    pub fn catalog(&self) -> &SpeciesCatalog {
        &self.catalog
    }

    /// Resolve each species of the state to its data and mass fraction.
    fn mass_terms<'a>(&'a self, state: &ThermoState) -> FluidResult<Vec<(&'a SpeciesData, f64)>> {
        let y = self.mass_fractions(state.composition())?;
        y.iter()
            .map(|(name, frac)| self.catalog.get(name).map(|data| (data, frac)))
            .collect()
    }

    fn gas_constant(&self, state: &ThermoState) -> FluidResult<f64> {
        let m = self.mean_molar_mass(state.composition())?;
        Ok(R_UNIVERSAL / m)
    }
}

impl Default for IdealGasMixture {
    fn default() -> Self {
        Self::builtin()
    }
}

impl FluidModel for IdealGasMixture {
    fn name(&self) -> &str {
        "IdealGasMixture"
    }

    fn species_molar_mass(&self, species: &str) -> FluidResult<f64> {
        self.catalog.get(species).map(SpeciesData::molar_mass)
    }

    fn check_composition(&self, comp: &Composition) -> FluidResult<()> {
        for (name, _) in comp.iter() {
            self.catalog.get(name)?;
        }
        Ok(())
    }

    fn rho(&self, state: &ThermoState) -> FluidResult<Density> {
        let r = self.gas_constant(state)?;
        let rho = state.pressure().value / (r * state.temperature().value);
        validation::validate_positive(rho, "density must be positive and finite")?;
        Ok(kgpm3(rho))
    }

    fn h(&self, state: &ThermoState) -> FluidResult<SpecEnthalpy> {
        let t = state.temperature().value;
        let h: f64 = self
            .mass_terms(state)?
            .into_iter()
            .map(|(data, y)| y * data.thermo().h_molar(t) / data.molar_mass())
            .sum();
        validation::validate_finite(h, "enthalpy must be finite")?;
        Ok(h)
    }

    fn s(&self, state: &ThermoState) -> FluidResult<SpecEntropy> {
        let t = state.temperature().value;
        let p = state.pressure().value;
        let x = self.mole_fractions(state.composition())?;
        let mut s = 0.0;
        for (data, y) in self.mass_terms(state)? {
            let xk = x.fraction(data.name());
            if xk <= 0.0 {
                continue;
            }
            let s_molar = data.thermo().s_molar(t) - R_UNIVERSAL * (xk * p / self.p_ref).ln();
            s += y * s_molar / data.molar_mass();
        }
        validation::validate_finite(s, "entropy must be finite")?;
        Ok(s)
    }

    fn cp(&self, state: &ThermoState) -> FluidResult<SpecHeatCapacity> {
        let t = state.temperature().value;
        let cp: f64 = self
            .mass_terms(state)?
            .into_iter()
            .map(|(data, y)| y * data.thermo().cp_molar(t) / data.molar_mass())
            .sum();
        validation::validate_positive(cp, "cp must be positive and finite")?;
        Ok(cp)
    }

    fn cv(&self, state: &ThermoState) -> FluidResult<SpecHeatCapacity> {
        let cv = self.cp(state)? - self.gas_constant(state)?;
        validation::validate_positive(cv, "cv must be positive and finite")?;
        Ok(cv)
    }

    fn gamma(&self, state: &ThermoState) -> FluidResult<f64> {
        let cp = self.cp(state)?;
        let cv = self.cv(state)?;
        let gamma = cp / cv;
        validation::validate_gamma(gamma)?;
        Ok(gamma)
    }

    fn a(&self, state: &ThermoState) -> FluidResult<Velocity> {
        let gamma = self.gamma(state)?;
        let r = self.gas_constant(state)?;
        let a_sq = gamma * r * state.temperature().value;
        if !a_sq.is_finite() || a_sq <= 0.0 {
            return Err(FluidError::NonPhysical {
                what: "speed of sound squared must be positive",
            });
        }
        Ok(mps(a_sq.sqrt()))
    }
}
