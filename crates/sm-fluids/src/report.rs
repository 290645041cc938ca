//! Human-readable state report.

use crate::error::FluidResult;
use crate::model::{FluidModel, ThermoPropertyPack};
use crate::state::ThermoState;
use std::fmt;

/// One species line of a report.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeciesRow {
    pub name: String,
    pub mass_fraction: f64,
    pub mole_fraction: f64,
}

/// Snapshot of a state's properties and composition, printable as a table.
#[derive(Debug, Clone)]
pub struct StateReport {
    pub title: Option<String>,
    pub pack: ThermoPropertyPack,
    pub species: Vec<SpeciesRow>,
}

impl StateReport {
    pub fn new<M: FluidModel + ?Sized>(model: &M, state: &ThermoState) -> FluidResult<Self> {
        let pack = model.property_pack(state)?;
        let y = model.mass_fractions(state.composition())?;
        let x = model.mole_fractions(state.composition())?;
        let species = y
            .iter()
            .map(|(name, mass_fraction)| SpeciesRow {
                name: name.to_string(),
                mass_fraction,
                mole_fraction: x.fraction(name),
            })
            .collect();
        Ok(Self {
            title: None,
            pack,
            species,
        })
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

impl fmt::Display for StateReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = &self.pack;
        if let Some(title) = &self.title {
            writeln!(f, "\n  {}:\n", title)?;
        }
        writeln!(f, "{:>24}   {:>14.2} K", "temperature", p.t.value)?;
        writeln!(f, "{:>24}   {:>14.2} Pa", "pressure", p.p.value)?;
        writeln!(f, "{:>24}   {:>14.5} kg/m^3", "density", p.rho.value)?;
        writeln!(f, "{:>24}   {:>14.4} kg/kmol", "mean mol. weight", p.molar_mass)?;
        writeln!(f, "{:>24}   {:>14.5e} J/kg", "enthalpy", p.h)?;
        writeln!(f, "{:>24}   {:>14.5e} J/kg/K", "entropy", p.s)?;
        writeln!(f, "{:>24}   {:>14.2} J/kg/K", "heat capacity c_p", p.cp)?;
        writeln!(f, "{:>24}   {:>14.2} J/kg/K", "heat capacity c_v", p.cv)?;
        writeln!(f, "{:>24}   {:>14.5}", "heat capacity ratio", p.gamma)?;
        writeln!(f, "{:>24}   {:>14.2} m/s", "sound speed (frozen)", p.a.value)?;
        writeln!(f)?;
        writeln!(f, "{:>24}   {:>14}   {:>14}", "", "mass frac. Y", "mole frac. X")?;
        writeln!(f, "{:>24}   {:>14}   {:>14}", "", "------------", "------------")?;
        for row in &self.species {
            writeln!(
                f,
                "{:>24}   {:>14.6e}   {:>14.6e}",
                row.name, row.mass_fraction, row.mole_fraction
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composition::{Basis, Composition};
    use crate::ideal_gas::IdealGasMixture;
    use sm_core::units::{k, pa};

    #[test]
    fn report_lists_every_species() {
        let model = IdealGasMixture::builtin();
        let comp = Composition::parse("O2:0.21, N2:0.78, AR:0.01", Basis::Mole).unwrap();
        let state = model.state(pa(101_325.0), k(300.0), comp).unwrap();
        let report = StateReport::new(&model, &state).unwrap().with_title("Air");

        assert_eq!(report.species.len(), 3);
        let mass_sum: f64 = report.species.iter().map(|r| r.mass_fraction).sum();
        let mole_sum: f64 = report.species.iter().map(|r| r.mole_fraction).sum();
        assert!((mass_sum - 1.0).abs() < 1e-12);
        assert!((mole_sum - 1.0).abs() < 1e-12);

        let text = report.to_string();
        assert!(text.contains("Air:"));
        assert!(text.contains("temperature"));
        assert!(text.contains("AR"));
    }
}
