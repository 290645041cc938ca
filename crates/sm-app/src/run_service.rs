//! Scenario loading and run execution.

use serde::{Deserialize, Serialize};
use sm_fluids::{FluidModel, StateReport};
use sm_project::schema::Scenario;
use sm_solver::{ConvergenceResult, SteadyMixerSolver};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Instant;
use tracing::info;

use crate::compile::{CompiledScenario, compile_scenario};
use crate::error::{AppError, AppResult};

/// Per-inlet line of a run summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamSummary {
    pub name: String,
    pub mass_flow_kg_s: f64,
    pub temperature_k: f64,
    pub pressure_pa: f64,
}

/// Serialisable digest of a solve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub scenario: String,
    pub status: String,
    pub converged: bool,
    pub iterations: usize,
    pub residual: f64,
    pub total_mass_flow_kg_s: f64,
    pub target_enthalpy_j_kg: f64,
    pub temperature_k: f64,
    pub pressure_pa: f64,
    pub density_kg_m3: f64,
    pub mean_molar_mass: f64,
    pub mass_fractions: BTreeMap<String, f64>,
    pub mole_fractions: BTreeMap<String, f64>,
    pub streams: Vec<StreamSummary>,
    pub solve_time_s: f64,
}

/// Full result of running a scenario.
pub struct RunOutcome {
    pub result: ConvergenceResult,
    pub summary: RunSummary,
    pub report: StateReport,
}

/// Load a scenario, picking YAML or JSON by file extension.
pub fn load_scenario(path: &Path) -> AppResult<Scenario> {
    if !path.exists() {
        return Err(AppError::ScenarioFileRead {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
        });
    }
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    let scenario = match ext.as_deref() {
        Some("yaml") | Some("yml") => sm_project::load_yaml(path)?,
        Some("json") => sm_project::load_json(path)?,
        _ => {
            return Err(AppError::UnsupportedFormat {
                path: path.to_path_buf(),
            });
        }
    };
    Ok(scenario)
}

/// Compile and solve a scenario.
pub fn run_scenario(scenario: &Scenario) -> AppResult<RunOutcome> {
    let compiled = compile_scenario(scenario)?;
    run_compiled(&compiled)
}

/// Solve an already compiled scenario.
pub fn run_compiled(compiled: &CompiledScenario) -> AppResult<RunOutcome> {
    info!(
        scenario = %compiled.name,
        streams = compiled.streams.len(),
        "running mixer scenario"
    );

    let started = Instant::now();
    let result = SteadyMixerSolver::new(&compiled.model).solve(
        &compiled.streams,
        &compiled.valve,
        compiled.downstream_pressure,
        &compiled.config,
    )?;
    let solve_time_s = started.elapsed().as_secs_f64();

    let state = result.state.to_thermo_state()?;
    let report = StateReport::new(&compiled.model, &state)?.with_title(compiled.name.clone());
    let mole = compiled.model.mole_fractions(result.state.composition())?;

    let summary = RunSummary {
        scenario: compiled.name.clone(),
        status: result.status.to_string(),
        converged: result.is_converged(),
        iterations: result.iterations,
        residual: result.residual,
        total_mass_flow_kg_s: result.total_mass_flow.value,
        target_enthalpy_j_kg: result.target_enthalpy,
        temperature_k: result.state.temperature().value,
        pressure_pa: result.state.pressure().value,
        density_kg_m3: report.pack.rho.value,
        mean_molar_mass: report.pack.molar_mass,
        mass_fractions: fractions(result.state.composition().iter()),
        mole_fractions: fractions(mole.iter()),
        streams: compiled
            .streams
            .iter()
            .enumerate()
            .map(|(i, s)| StreamSummary {
                name: s.label(i),
                mass_flow_kg_s: s.mass_flow().value,
                temperature_k: s.temperature().value,
                pressure_pa: s.pressure().value,
            })
            .collect(),
        solve_time_s,
    };

    info!(
        scenario = %compiled.name,
        status = %summary.status,
        temperature_k = summary.temperature_k,
        "run finished"
    );

    Ok(RunOutcome {
        result,
        summary,
        report,
    })
}

fn fractions<'a>(items: impl Iterator<Item = (&'a str, f64)>) -> BTreeMap<String, f64> {
    items.map(|(name, f)| (name.to_string(), f)).collect()
}

impl RunSummary {
    pub fn to_json(&self) -> AppResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
