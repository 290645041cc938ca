//! Steady-state mixer solver for non-reacting ideal-gas streams.
//!
//! N inlet streams feed one well-mixed control volume that drains through a
//! linear valve into a downstream reservoir. Mass and species balances close
//! exactly; the energy balance is solved for the mixer temperature with a
//! secant iteration against a [`sm_fluids::FluidModel`].

pub mod config;
pub mod error;
pub mod mixer;
pub mod secant;
pub mod solution;
pub mod stream;
pub mod valve;

pub use config::ConvergenceConfig;
pub use error::{SolverError, SolverResult};
pub use mixer::SteadyMixerSolver;
pub use solution::{ConvergenceResult, ConvergenceStatus, MixedState};
pub use stream::Stream;
pub use valve::Valve;
