//! sm-fluids: fluid property calculations for steadymix.
//!
//! Provides:
//! - Species definitions with NASA 7-coefficient or constant-cp thermo data
//! - Composition handling (mole or mass basis, keyed by species name)
//! - Thermodynamic state representation
//! - FluidModel trait for property calculations
//! - An ideal-gas mixture backend and a printable state report
//!
//! # Example
//!
//! ```no_run
//! use sm_fluids::{Basis, Composition, FluidModel, IdealGasMixture};
//! use sm_core::units::{pa, k};
//!
//! let model = IdealGasMixture::builtin();
//! let air = Composition::parse("O2:0.21, N2:0.78, AR:0.01", Basis::Mole).unwrap();
//!
//! let state = model.state(pa(101325.0), k(300.0), air).unwrap();
//! let rho = model.rho(&state).unwrap();
//! println!("Density: {} kg/m³", rho.value);
//! ```

pub mod composition;
pub mod error;
pub mod ideal_gas;
pub mod model;
pub mod report;
pub mod species;
pub mod state;

// Re-exports for ergonomics
pub use composition::{Basis, Composition};
pub use error::{FluidError, FluidResult};
pub use ideal_gas::IdealGasMixture;
pub use model::{FluidModel, ThermoPropertyPack};
pub use report::{SpeciesRow, StateReport};
pub use species::{Nasa7, SpeciesCatalog, SpeciesData, SpeciesThermo};
pub use state::{SpecEnthalpy, SpecEntropy, SpecHeatCapacity, ThermoState};
