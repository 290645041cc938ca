//! Scenario schema definitions.

use serde::{Deserialize, Deserializer, Serialize};
use sm_fluids::{Basis, FluidResult, Nasa7, SpeciesData, SpeciesThermo};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scenario {
    pub version: u32,
    pub name: String,
    /// Species added to (or overriding) the built-in catalog.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub species: Vec<SpeciesDef>,
    #[serde(default)]
    pub streams: Vec<StreamDef>,
    pub outlet: OutletDef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solver: Option<SolverDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpeciesDef {
    pub name: String,
    /// kg/kmol
    pub molar_mass: f64,
    pub thermo: ThermoDef,
}

/// Species thermo data in molar units (J/kmol, J/(kmol·K)).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum ThermoDef {
    ConstantCp {
        #[serde(default = "default_t0")]
        t0: f64,
        #[serde(default)]
        h0: f64,
        #[serde(default)]
        s0: f64,
        cp0: f64,
    },
    Nasa7 {
        t_min: f64,
        t_mid: f64,
        t_max: f64,
        low: [f64; 7],
        high: [f64; 7],
    },
}

fn default_t0() -> f64 {
    298.15
}

impl SpeciesDef {
    pub fn to_species_data(&self) -> FluidResult<SpeciesData> {
        let thermo = match &self.thermo {
            ThermoDef::ConstantCp { t0, h0, s0, cp0 } => SpeciesThermo::ConstantCp {
                t0: *t0,
                h0: *h0,
                s0: *s0,
                cp0: *cp0,
            },
            ThermoDef::Nasa7 {
                t_min,
                t_mid,
                t_max,
                low,
                high,
            } => SpeciesThermo::Nasa7(Nasa7::new(*t_min, *t_mid, *t_max, *low, *high)?),
        };
        SpeciesData::new(self.name.clone(), self.molar_mass, thermo)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StreamDef {
    pub name: String,
    /// Compact text form, e.g. `"O2:0.21, N2:0.78, AR:0.01"` or `"CH4"`.
    pub composition: String,
    #[serde(default)]
    pub basis: BasisDef,
    #[serde(deserialize_with = "quantity_text")]
    pub temperature: String,
    #[serde(deserialize_with = "quantity_text")]
    pub pressure: String,
    /// Written as a one-key map, `{ mass: ... }` or `{ volume: ... }`.
    #[serde(with = "serde_yaml::with::singleton_map")]
    pub flow: FlowDef,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum BasisDef {
    #[default]
    Mole,
    Mass,
}

impl From<BasisDef> for Basis {
    fn from(b: BasisDef) -> Self {
        match b {
            BasisDef::Mole => Basis::Mole,
            BasisDef::Mass => Basis::Mass,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum FlowDef {
    Mass(#[serde(deserialize_with = "quantity_text")] String),
    Volume(#[serde(deserialize_with = "quantity_text")] String),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutletDef {
    /// kg/(s·Pa)
    pub valve_coefficient: f64,
    #[serde(deserialize_with = "quantity_text")]
    pub downstream_pressure: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SolverDef {
    pub tolerance: f64,
    pub max_iterations: usize,
}

/// Accept a quantity as unit-tagged text or as a bare (SI) number.
fn quantity_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(f64),
    }
    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Number(value) => value.to_string(),
    })
}
