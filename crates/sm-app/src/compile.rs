//! Compilation of a scenario into solver inputs.

use sm_core::units::{Pressure, k, kgps, m3ps, pa};
use sm_fluids::{Composition, IdealGasMixture};
use sm_project::schema::{FlowDef, Scenario, StreamDef};
use sm_project::{Quantity, parse_quantity, validate_scenario};
use sm_solver::{ConvergenceConfig, Stream, Valve};
use tracing::debug;

use crate::error::{AppError, AppResult};

/// Everything [`sm_solver::SteadyMixerSolver::solve`] needs for one scenario.
pub struct CompiledScenario {
    pub name: String,
    pub model: IdealGasMixture,
    pub streams: Vec<Stream>,
    pub valve: Valve,
    pub downstream_pressure: Pressure,
    pub config: ConvergenceConfig,
}

/// Validate and compile a scenario.
///
/// User species extend the built-in catalog; volume flows are converted to
/// mass flows with the model density at the stream's own state.
pub fn compile_scenario(scenario: &Scenario) -> AppResult<CompiledScenario> {
    validate_scenario(scenario)?;

    let mut model = IdealGasMixture::builtin();
    for def in &scenario.species {
        let data = def
            .to_species_data()
            .map_err(|e| AppError::Compile(format!("species {}: {}", def.name, e)))?;
        model = model.with_species(data);
    }

    let streams = scenario
        .streams
        .iter()
        .map(|def| compile_stream(&model, def))
        .collect::<AppResult<Vec<_>>>()?;

    let valve = Valve::new(scenario.outlet.valve_coefficient)?;
    let downstream_pressure = pa(quantity(
        "outlet.downstream_pressure",
        &scenario.outlet.downstream_pressure,
        Quantity::Pressure,
    )?);

    let solver = scenario
        .solver
        .as_ref()
        .ok_or_else(|| AppError::Validation("missing solver section".to_string()))?;
    let config = ConvergenceConfig::new(solver.tolerance, solver.max_iterations)?;

    Ok(CompiledScenario {
        name: scenario.name.clone(),
        model,
        streams,
        valve,
        downstream_pressure,
        config,
    })
}

fn compile_stream(model: &IdealGasMixture, def: &StreamDef) -> AppResult<Stream> {
    let composition = Composition::parse(&def.composition, def.basis.into())?;
    let field = |f: &str| format!("streams.{}.{}", def.name, f);
    let t = k(quantity(&field("temperature"), &def.temperature, Quantity::Temperature)?);
    let p = pa(quantity(&field("pressure"), &def.pressure, Quantity::Pressure)?);

    let stream = match &def.flow {
        FlowDef::Mass(text) => {
            let mdot = quantity(&field("flow.mass"), text, Quantity::MassFlow)?;
            Stream::new(composition, t, p, kgps(mdot))
        }
        FlowDef::Volume(text) => {
            let q = quantity(&field("flow.volume"), text, Quantity::VolumeFlow)?;
            Stream::from_volume_flow(model, composition, t, p, m3ps(q))?
        }
    };

    debug!(
        stream = %def.name,
        mass_flow = stream.mass_flow().value,
        temperature = t.value,
        pressure = p.value,
        "compiled stream"
    );
    Ok(stream.with_name(def.name.clone()))
}

fn quantity(field: &str, text: &str, q: Quantity) -> AppResult<f64> {
    parse_quantity(text, q).map_err(|e| AppError::Compile(format!("{}: {}", field, e)))
}
