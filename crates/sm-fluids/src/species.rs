//! Chemical species definitions and ideal-gas thermo data.
//!
//! Species are identified by name. Molar quantities use kmol, so molar
//! enthalpy is J/kmol and molar entropy / heat capacity are J/(kmol·K).

use crate::error::{FluidError, FluidResult};
use sm_core::units::constants::R_UNIVERSAL;
use std::collections::BTreeMap;

/// Two-range NASA 7-coefficient polynomial.
///
/// ```text
/// cp/R  = a0 + a1 T + a2 T^2 + a3 T^3 + a4 T^4
/// h/RT  = a0 + a1 T/2 + a2 T^2/3 + a3 T^3/4 + a4 T^4/5 + a5/T
/// s°/R  = a0 ln T + a1 T + a2 T^2/2 + a3 T^3/3 + a4 T^4/4 + a6
/// ```
///
/// Temperatures outside `[t_min, t_max]` are evaluated with the nearest range;
/// the outer bounds only record where the fit is valid.
#[derive(Debug, Clone, PartialEq)]
pub struct Nasa7 {
    t_min: f64,
    t_mid: f64,
    t_max: f64,
    low: [f64; 7],
    high: [f64; 7],
}

impl Nasa7 {
    pub fn new(
        t_min: f64,
        t_mid: f64,
        t_max: f64,
        low: [f64; 7],
        high: [f64; 7],
    ) -> FluidResult<Self> {
        let ordered = t_min > 0.0 && t_min < t_mid && t_mid < t_max;
        if !ordered || !t_max.is_finite() {
            return Err(FluidError::InvalidArg {
                what: "NASA7 ranges must satisfy 0 < t_min < t_mid < t_max",
            });
        }
        if low.iter().chain(high.iter()).any(|c| !c.is_finite()) {
            return Err(FluidError::NonPhysical {
                what: "non-finite NASA7 coefficient",
            });
        }
        Ok(Self {
            t_min,
            t_mid,
            t_max,
            low,
            high,
        })
    }

    pub fn t_min(&self) -> f64 {
        self.t_min
    }

    /// Switch temperature between the low and high ranges.
    pub fn t_mid(&self) -> f64 {
        self.t_mid
    }

    pub fn t_max(&self) -> f64 {
        self.t_max
    }

    pub fn contains(&self, t: f64) -> bool {
        (self.t_min..=self.t_max).contains(&t)
    }

    fn coeffs(&self, t: f64) -> &[f64; 7] {
        if t < self.t_mid { &self.low } else { &self.high }
    }

    /// Dimensionless heat capacity cp/R.
    pub fn cp_r(&self, t: f64) -> f64 {
        let a = self.coeffs(t);
        a[0] + t * (a[1] + t * (a[2] + t * (a[3] + t * a[4])))
    }

    /// Dimensionless enthalpy h/(R T).
    pub fn h_rt(&self, t: f64) -> f64 {
        let a = self.coeffs(t);
        a[0] + t * (a[1] / 2.0 + t * (a[2] / 3.0 + t * (a[3] / 4.0 + t * a[4] / 5.0))) + a[5] / t
    }

    /// Dimensionless standard-state entropy s°/R.
    pub fn s_r(&self, t: f64) -> f64 {
        let a = self.coeffs(t);
        a[0] * t.ln() + t * (a[1] + t * (a[2] / 2.0 + t * (a[3] / 3.0 + t * a[4] / 4.0))) + a[6]
    }
}

/// Temperature dependence of a species' standard-state properties.
#[derive(Debug, Clone, PartialEq)]
pub enum SpeciesThermo {
    Nasa7(Nasa7),
    /// Constant heat capacity about a reference temperature.
    ConstantCp {
        /// Reference temperature [K]
        t0: f64,
        /// Molar enthalpy at `t0` [J/kmol]
        h0: f64,
        /// Standard molar entropy at `t0` [J/(kmol·K)]
        s0: f64,
        /// Molar heat capacity [J/(kmol·K)]
        cp0: f64,
    },
}

impl SpeciesThermo {
    /// Molar heat capacity at constant pressure [J/(kmol·K)].
    pub fn cp_molar(&self, t: f64) -> f64 {
        match self {
            SpeciesThermo::Nasa7(poly) => R_UNIVERSAL * poly.cp_r(t),
            SpeciesThermo::ConstantCp { cp0, .. } => *cp0,
        }
    }

    /// Molar enthalpy [J/kmol].
    pub fn h_molar(&self, t: f64) -> f64 {
        match self {
            SpeciesThermo::Nasa7(poly) => R_UNIVERSAL * t * poly.h_rt(t),
            SpeciesThermo::ConstantCp { t0, h0, cp0, .. } => h0 + cp0 * (t - t0),
        }
    }

    /// Standard-state molar entropy at the reference pressure [J/(kmol·K)].
    pub fn s_molar(&self, t: f64) -> f64 {
        match self {
            SpeciesThermo::Nasa7(poly) => R_UNIVERSAL * poly.s_r(t),
            SpeciesThermo::ConstantCp { t0, s0, cp0, .. } => s0 + cp0 * (t / t0).ln(),
        }
    }

    fn validate(&self) -> FluidResult<()> {
        match self {
            SpeciesThermo::Nasa7(_) => Ok(()),
            SpeciesThermo::ConstantCp { t0, h0, s0, cp0 } => {
                if !t0.is_finite() || *t0 <= 0.0 {
                    return Err(FluidError::NonPhysical {
                        what: "reference temperature must be positive and finite",
                    });
                }
                if !cp0.is_finite() || *cp0 <= 0.0 {
                    return Err(FluidError::NonPhysical {
                        what: "cp must be positive and finite",
                    });
                }
                if !h0.is_finite() || !s0.is_finite() {
                    return Err(FluidError::NonPhysical {
                        what: "non-finite reference enthalpy or entropy",
                    });
                }
                Ok(())
            }
        }
    }
}

/// A named species with its molar mass and thermo data.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeciesData {
    name: String,
    /// Molar mass [kg/kmol]
    molar_mass: f64,
    thermo: SpeciesThermo,
}

impl SpeciesData {
    pub fn new(name: impl Into<String>, molar_mass: f64, thermo: SpeciesThermo) -> FluidResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(FluidError::InvalidArg {
                what: "species name must not be empty",
            });
        }
        if !molar_mass.is_finite() || molar_mass <= 0.0 {
            return Err(FluidError::NonPhysical {
                what: "molar mass must be positive and finite",
            });
        }
        thermo.validate()?;
        Ok(Self {
            name,
            molar_mass,
            thermo,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn molar_mass(&self) -> f64 {
        self.molar_mass
    }

    pub fn thermo(&self) -> &SpeciesThermo {
        &self.thermo
    }
}

/// Species lookup table keyed by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpeciesCatalog {
    species: BTreeMap<String, SpeciesData>,
}

impl SpeciesCatalog {
    /// Empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog with the built-in gases (GRI-Mech 3.0 thermo).
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        for (name, molar_mass, t_min, t_max, low, high) in BUILTIN {
            let poly = Nasa7 {
                t_min: *t_min,
                t_mid: 1000.0,
                t_max: *t_max,
                low: *low,
                high: *high,
            };
            catalog.species.insert(
                (*name).to_string(),
                SpeciesData {
                    name: (*name).to_string(),
                    molar_mass: *molar_mass,
                    thermo: SpeciesThermo::Nasa7(poly),
                },
            );
        }
        catalog
    }

    /// Add or replace a species. Returns the previous entry with the same name.
    pub fn insert(&mut self, data: SpeciesData) -> Option<SpeciesData> {
        self.species.insert(data.name.clone(), data)
    }

    pub fn get(&self, name: &str) -> FluidResult<&SpeciesData> {
        self.species
            .get(name)
            .ok_or_else(|| FluidError::UnknownSpecies {
                name: name.to_string(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.species.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SpeciesData> {
        self.species.values()
    }

    pub fn len(&self) -> usize {
        self.species.len()
    }

    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }
}

type BuiltinEntry = (&'static str, f64, f64, f64, [f64; 7], [f64; 7]);

// name, molar mass [kg/kmol], t_min, t_max, low (t_min..1000 K), high (1000 K..t_max)
const BUILTIN: &[BuiltinEntry] = &[
    (
        "O2",
        31.998,
        200.0,
        3500.0,
        [
            3.782_456_36,
            -2.996_734_16e-3,
            9.847_302_01e-6,
            -9.681_295_09e-9,
            3.243_728_37e-12,
            -1.063_943_56e3,
            3.657_675_73,
        ],
        [
            3.282_537_84,
            1.483_087_54e-3,
            -7.579_666_69e-7,
            2.094_705_55e-10,
            -2.167_177_94e-14,
            -1.088_457_72e3,
            5.453_231_29,
        ],
    ),
    (
        "N2",
        28.014,
        300.0,
        5000.0,
        [
            3.298_677,
            1.408_240_4e-3,
            -3.963_222e-6,
            5.641_515e-9,
            -2.444_854e-12,
            -1.020_899_9e3,
            3.950_372,
        ],
        [
            2.926_64,
            1.487_976_8e-3,
            -5.684_76e-7,
            1.009_703_8e-10,
            -6.753_351e-15,
            -9.227_977e2,
            5.980_528,
        ],
    ),
    (
        "AR",
        39.948,
        300.0,
        5000.0,
        [2.5, 0.0, 0.0, 0.0, 0.0, -7.453_75e2, 4.366],
        [2.5, 0.0, 0.0, 0.0, 0.0, -7.453_75e2, 4.366],
    ),
    (
        "CH4",
        16.043,
        200.0,
        3500.0,
        [
            5.149_876_13,
            -1.367_097_88e-2,
            4.918_005_99e-5,
            -4.847_430_26e-8,
            1.666_939_56e-11,
            -1.024_664_76e4,
            -4.641_303_76,
        ],
        [
            7.485_149_5e-2,
            1.339_094_67e-2,
            -5.732_858_09e-6,
            1.222_925_35e-9,
            -1.018_152_3e-13,
            -9.468_344_59e3,
            1.843_731_8e1,
        ],
    ),
    (
        "H2O",
        18.015,
        200.0,
        3500.0,
        [
            4.198_640_56,
            -2.036_434_1e-3,
            6.520_402_11e-6,
            -5.487_970_62e-9,
            1.771_978_17e-12,
            -3.029_372_67e4,
            -8.490_322_08e-1,
        ],
        [
            3.033_992_49,
            2.176_918_04e-3,
            -1.640_725_18e-7,
            -9.704_198_7e-11,
            1.682_009_92e-14,
            -3.000_429_71e4,
            4.966_770_1,
        ],
    ),
    (
        "CO2",
        44.009,
        200.0,
        3500.0,
        [
            2.356_773_52,
            8.984_596_77e-3,
            -7.123_562_69e-6,
            2.459_190_22e-9,
            -1.436_995_48e-13,
            -4.837_196_97e4,
            9.901_052_22,
        ],
        [
            3.857_460_29,
            4.414_370_26e-3,
            -2.214_814_04e-6,
            5.234_901_88e-10,
            -4.720_841_64e-14,
            -4.875_916_6e4,
            2.271_638_06,
        ],
    ),
    (
        "H2",
        2.016,
        200.0,
        3500.0,
        [
            2.344_331_12,
            7.980_520_75e-3,
            -1.947_815_1e-5,
            2.015_720_94e-8,
            -7.376_117_61e-12,
            -9.179_351_73e2,
            6.830_102_38e-1,
        ],
        [
            3.337_279_2,
            -4.940_247_31e-5,
            4.994_567_78e-7,
            -1.795_663_94e-10,
            2.002_553_76e-14,
            -9.501_589_22e2,
            -3.205_023_31,
        ],
    ),
    (
        "CO",
        28.010,
        200.0,
        3500.0,
        [
            3.579_533_47,
            -6.103_536_8e-4,
            1.016_814_33e-6,
            9.070_058_84e-10,
            -9.044_244_99e-13,
            -1.434_408_6e4,
            3.508_409_28,
        ],
        [
            2.715_185_61,
            2.062_527_43e-3,
            -9.988_257_71e-7,
            2.300_530_08e-10,
            -2.036_477_16e-14,
            -1.415_187_24e4,
            7.818_687_72,
        ],
    ),
];
