//! Mixture composition keyed by species name.

use crate::error::{FluidError, FluidResult};
use sm_core::numeric::{Tolerances, nearly_equal};
use std::collections::BTreeMap;
use std::fmt;

/// Fractions below this (after normalization) are dropped.
const NEGLIGIBLE_FRACTION: f64 = 1e-15;

/// Whether fractions are per mole or per unit mass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Basis {
    #[default]
    Mole,
    Mass,
}

impl fmt::Display for Basis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Basis::Mole => write!(f, "mole"),
            Basis::Mass => write!(f, "mass"),
        }
    }
}

/// Fluid composition defined by normalized fractions on a given basis.
///
/// The composition is always normalized (fractions sum to 1.0).
#[derive(Debug, Clone, PartialEq)]
pub struct Composition {
    basis: Basis,
    /// Species and their fractions (always normalized to sum=1).
    items: BTreeMap<String, f64>,
}

impl Composition {
    /// Create a pure-species composition.
    pub fn pure(species: impl Into<String>) -> Self {
        let mut items = BTreeMap::new();
        items.insert(species.into(), 1.0);
        Self {
            basis: Basis::Mole,
            items,
        }
    }

    /// Create a composition from raw fractions on `basis`.
    ///
    /// Validates that all fractions are finite, non-negative, and have a positive sum,
    /// then normalizes to sum=1. Repeated species are summed.
    pub fn new<S, I>(basis: Basis, fractions: I) -> FluidResult<Self>
    where
        S: Into<String>,
        I: IntoIterator<Item = (S, f64)>,
    {
        let mut raw: BTreeMap<String, f64> = BTreeMap::new();
        for (species, frac) in fractions {
            let species = species.into();
            if species.trim().is_empty() {
                return Err(FluidError::InvalidArg {
                    what: "empty species name",
                });
            }
            if !frac.is_finite() {
                return Err(FluidError::NonPhysical {
                    what: "non-finite fraction",
                });
            }
            if frac < 0.0 {
                return Err(FluidError::NonPhysical {
                    what: "negative fraction",
                });
            }
            *raw.entry(species).or_insert(0.0) += frac;
        }

        if raw.is_empty() {
            return Err(FluidError::InvalidArg {
                what: "empty composition",
            });
        }

        let sum: f64 = raw.values().sum();
        if sum <= 0.0 || !sum.is_finite() {
            return Err(FluidError::NonPhysical {
                what: "fractions sum to zero or non-finite",
            });
        }

        let items: BTreeMap<String, f64> = raw
            .into_iter()
            .map(|(s, f)| (s, f / sum))
            .filter(|(_, f)| *f > NEGLIGIBLE_FRACTION)
            .collect();

        if items.is_empty() {
            return Err(FluidError::NonPhysical {
                what: "all fractions negligible",
            });
        }

        Ok(Self { basis, items })
    }

    pub fn new_mole_fractions<S, I>(fractions: I) -> FluidResult<Self>
    where
        S: Into<String>,
        I: IntoIterator<Item = (S, f64)>,
    {
        Self::new(Basis::Mole, fractions)
    }

    pub fn new_mass_fractions<S, I>(fractions: I) -> FluidResult<Self>
    where
        S: Into<String>,
        I: IntoIterator<Item = (S, f64)>,
    {
        Self::new(Basis::Mass, fractions)
    }

    /// Parse the compact `"O2:0.21, N2:0.78, AR:0.01"` form.
    ///
    /// A bare species name (`"CH4"`) means a fraction of 1.
    pub fn parse(text: &str, basis: Basis) -> FluidResult<Self> {
        let mut fractions = Vec::new();
        for entry in text.split(',') {
            let entry = entry.trim();
            if entry.is_empty() {
                continue;
            }
            let (name, value) = match entry.split_once(':') {
                Some((name, value)) => {
                    let value: f64 = value.trim().parse().map_err(|_| FluidError::Parse {
                        message: format!("invalid fraction in '{}'", entry),
                    })?;
                    (name.trim(), value)
                }
                None => (entry, 1.0),
            };
            if name.is_empty() {
                return Err(FluidError::Parse {
                    message: format!("missing species name in '{}'", entry),
                });
            }
            fractions.push((name.to_string(), value));
        }
        Self::new(basis, fractions)
    }

    /// Weighted average of compositions sharing one basis, renormalized.
    ///
    /// Entries with zero weight are skipped.
    pub fn blend<'a, I>(parts: I) -> FluidResult<Self>
    where
        I: IntoIterator<Item = (&'a Composition, f64)>,
    {
        let mut basis = None;
        let mut acc: BTreeMap<String, f64> = BTreeMap::new();
        for (comp, weight) in parts {
            if !weight.is_finite() || weight < 0.0 {
                return Err(FluidError::NonPhysical {
                    what: "blend weight must be non-negative and finite",
                });
            }
            match basis {
                None => basis = Some(comp.basis),
                Some(b) if b != comp.basis => {
                    return Err(FluidError::InvalidArg {
                        what: "cannot blend compositions on different bases",
                    });
                }
                Some(_) => {}
            }
            if weight == 0.0 {
                continue;
            }
            for (species, frac) in &comp.items {
                *acc.entry(species.clone()).or_insert(0.0) += weight * frac;
            }
        }

        let basis = basis.ok_or(FluidError::InvalidArg {
            what: "nothing to blend",
        })?;
        Self::new(basis, acc)
    }

    pub fn basis(&self) -> Basis {
        self.basis
    }

    /// Fraction of a species on this composition's basis (0.0 if not present).
    pub fn fraction(&self, species: &str) -> f64 {
        self.items.get(species).copied().unwrap_or(0.0)
    }

    /// Check if this is a pure-species composition.
    ///
    /// Returns `Some(species)` if exactly one species has fraction ≈1.0.
    pub fn is_pure(&self) -> Option<&str> {
        if self.items.len() == 1 {
            let (species, frac) = self.items.iter().next()?;
            let tol = Tolerances {
                abs: 1e-10,
                rel: 1e-10,
            };
            if nearly_equal(*frac, 1.0, tol) {
                return Some(species.as_str());
            }
        }
        None
    }

    /// Iterate over all species with non-zero fractions, sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.items.iter().map(|(s, f)| (s.as_str(), *f))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn sum(&self) -> f64 {
        self.items.values().sum()
    }

    /// Mean molar mass [kg/kmol] given per-species molar masses.
    ///
    /// Mole basis: M = Σ x_i M_i. Mass basis: 1/M = Σ y_i / M_i.
    pub fn mean_molar_mass<F>(&self, molar_mass: F) -> FluidResult<f64>
    where
        F: Fn(&str) -> FluidResult<f64>,
    {
        match self.basis {
            Basis::Mole => self
                .iter()
                .map(|(s, x)| molar_mass(s).map(|m| x * m))
                .sum(),
            Basis::Mass => {
                let inv: f64 = self
                    .iter()
                    .map(|(s, y)| molar_mass(s).map(|m| y / m))
                    .sum::<FluidResult<f64>>()?;
                Ok(1.0 / inv)
            }
        }
    }

    /// Re-express the composition on `target` basis.
    pub fn to_basis<F>(&self, target: Basis, molar_mass: F) -> FluidResult<Self>
    where
        F: Fn(&str) -> FluidResult<f64>,
    {
        if target == self.basis {
            return Ok(self.clone());
        }
        let mut converted = Vec::with_capacity(self.items.len());
        for (species, frac) in self.iter() {
            let m = molar_mass(species)?;
            let weighted = match target {
                Basis::Mass => frac * m,
                Basis::Mole => frac / m,
            };
            converted.push((species.to_string(), weighted));
        }
        Self::new(target, converted)
    }
}

impl fmt::Display for Composition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (species, frac) in &self.items {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{}:{}", species, frac)?;
            first = false;
        }
        Ok(())
    }
}
