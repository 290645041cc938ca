use clap::{Parser, Subcommand, ValueEnum};
use sm_app::{AppResult, RunOutcome, demo_scenario, load_scenario, run_scenario};
use sm_fluids::{SpeciesCatalog, SpeciesThermo};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sm-cli")]
#[command(about = "SteadyMix CLI - steady-state ideal-gas mixer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate scenario file syntax and structure
    Validate {
        /// Path to the scenario file (.yaml, .yml or .json)
        scenario_path: PathBuf,
    },
    /// Solve a scenario for its steady mixed state
    Run {
        /// Path to the scenario file (.yaml, .yml or .json)
        scenario_path: PathBuf,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Solve the built-in air/methane demonstration
    Demo {
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        /// Also write the demo scenario as YAML to this path
        #[arg(long)]
        save: Option<PathBuf>,
    },
    /// List the built-in species catalog
    Species,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { scenario_path } => cmd_validate(&scenario_path),
        Commands::Run {
            scenario_path,
            format,
        } => cmd_run(&scenario_path, format),
        Commands::Demo { format, save } => cmd_demo(format, save.as_deref()),
        Commands::Species => cmd_species(),
    }
}

fn cmd_validate(scenario_path: &Path) -> AppResult<()> {
    println!("Validating scenario: {}", scenario_path.display());
    let scenario = load_scenario(scenario_path)?;
    println!(
        "✓ Scenario '{}' is valid ({} streams)",
        scenario.name,
        scenario.streams.len()
    );
    Ok(())
}

fn cmd_run(scenario_path: &Path, format: OutputFormat) -> AppResult<()> {
    let scenario = load_scenario(scenario_path)?;
    let outcome = run_scenario(&scenario)?;
    print_outcome(&outcome, format)
}

fn cmd_demo(format: OutputFormat, save: Option<&Path>) -> AppResult<()> {
    let scenario = demo_scenario();
    if let Some(path) = save {
        sm_project::save_yaml(path, &scenario)?;
        info!(path = %path.display(), "saved demo scenario");
    }
    let outcome = run_scenario(&scenario)?;
    print_outcome(&outcome, format)
}

fn cmd_species() -> AppResult<()> {
    let catalog = SpeciesCatalog::builtin();
    println!("{:<8} {:>12}   {}", "species", "M [kg/kmol]", "thermo");
    for data in catalog.iter() {
        let thermo = match data.thermo() {
            SpeciesThermo::Nasa7(poly) => {
                format!("NASA 7-coefficient, {:.0}-{:.0} K", poly.t_min(), poly.t_max())
            }
            SpeciesThermo::ConstantCp { .. } => "constant cp".to_string(),
        };
        println!("{:<8} {:>12.4}   {}", data.name(), data.molar_mass(), thermo);
    }
    Ok(())
}

fn print_outcome(outcome: &RunOutcome, format: OutputFormat) -> AppResult<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", outcome.summary.to_json()?);
        }
        OutputFormat::Text => {
            let s = &outcome.summary;
            let mark = if s.converged { "✓" } else { "✗" };
            println!("{} Mixer {}: {}", mark, s.status, s.scenario);
            println!("  Iterations: {}", s.iterations);
            println!("  Residual: {:.3e}", s.residual);
            println!("  Total mass flow: {:.6} kg/s", s.total_mass_flow_kg_s);
            println!("  Solve time: {:.3} ms", s.solve_time_s * 1e3);
            println!("  Inlets:");
            for stream in &s.streams {
                println!(
                    "    {:<12} {:>12.6} kg/s {:>10.2} K {:>12.1} Pa",
                    stream.name, stream.mass_flow_kg_s, stream.temperature_k, stream.pressure_pa
                );
            }
            print!("{}", outcome.report);
        }
    }
    Ok(())
}
