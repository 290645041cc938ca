//! Shared application service layer for steadymix.
//!
//! Turns scenario files into solver inputs, runs the steady mixer and
//! produces summaries for the CLI.

pub mod compile;
pub mod demo;
pub mod error;
pub mod run_service;

pub use compile::{CompiledScenario, compile_scenario};
pub use demo::demo_scenario;
pub use error::{AppError, AppResult};
pub use run_service::{
    RunOutcome, RunSummary, StreamSummary, load_scenario, run_compiled, run_scenario,
};
