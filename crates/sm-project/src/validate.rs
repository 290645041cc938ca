//! Scenario validation logic.

use crate::schema::{FlowDef, Scenario, StreamDef};
use crate::units::{Quantity, parse_quantity};
use sm_fluids::{Composition, SpeciesCatalog};
use std::collections::HashSet;

/// Scenario schema version this crate reads and writes.
pub const LATEST_VERSION: u32 = 1;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Duplicate name: {name} in {context}")]
    DuplicateName { name: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unknown species '{species}' in {context}")]
    UnknownSpecies { species: String, context: String },

    #[error("Missing section: {section}")]
    MissingSection { section: String },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_scenario(scenario: &Scenario) -> Result<(), ValidationError> {
    if scenario.version == 0 || scenario.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: scenario.version,
        });
    }

    let mut known: HashSet<String> = SpeciesCatalog::builtin()
        .iter()
        .map(|s| s.name().to_string())
        .collect();
    let mut user_species = HashSet::new();
    for def in &scenario.species {
        if !user_species.insert(def.name.as_str()) {
            return Err(ValidationError::DuplicateName {
                name: def.name.clone(),
                context: "species".to_string(),
            });
        }
        def.to_species_data()
            .map_err(|e| invalid(format!("species.{}", def.name), &def.name, e))?;
        known.insert(def.name.clone());
    }

    if scenario.streams.is_empty() {
        return Err(ValidationError::MissingSection {
            section: "streams".to_string(),
        });
    }
    let mut stream_names = HashSet::new();
    for stream in &scenario.streams {
        if stream.name.trim().is_empty() {
            return Err(invalid("streams.name", &stream.name, "must not be empty"));
        }
        if !stream_names.insert(stream.name.as_str()) {
            return Err(ValidationError::DuplicateName {
                name: stream.name.clone(),
                context: "streams".to_string(),
            });
        }
        validate_stream(stream, &known)?;
    }

    let outlet = &scenario.outlet;
    if !outlet.valve_coefficient.is_finite() || outlet.valve_coefficient <= 0.0 {
        return Err(invalid(
            "outlet.valve_coefficient",
            outlet.valve_coefficient,
            "must be positive and finite",
        ));
    }
    check_quantity(
        "outlet.downstream_pressure",
        &outlet.downstream_pressure,
        Quantity::Pressure,
    )?;

    let solver = scenario
        .solver
        .as_ref()
        .ok_or_else(|| ValidationError::MissingSection {
            section: "solver".to_string(),
        })?;
    if !solver.tolerance.is_finite() || solver.tolerance <= 0.0 {
        return Err(invalid(
            "solver.tolerance",
            solver.tolerance,
            "must be positive and finite",
        ));
    }
    if solver.max_iterations == 0 {
        return Err(invalid("solver.max_iterations", 0, "must be at least 1"));
    }

    Ok(())
}

fn validate_stream(stream: &StreamDef, known: &HashSet<String>) -> Result<(), ValidationError> {
    let field = |name: &str| format!("streams.{}.{}", stream.name, name);

    let comp = Composition::parse(&stream.composition, stream.basis.into())
        .map_err(|e| invalid(field("composition"), &stream.composition, e))?;
    for (species, _) in comp.iter() {
        if !known.contains(species) {
            return Err(ValidationError::UnknownSpecies {
                species: species.to_string(),
                context: format!("stream {}", stream.name),
            });
        }
    }

    check_quantity(&field("temperature"), &stream.temperature, Quantity::Temperature)?;
    check_quantity(&field("pressure"), &stream.pressure, Quantity::Pressure)?;
    match &stream.flow {
        FlowDef::Mass(text) => check_quantity(&field("flow.mass"), text, Quantity::MassFlow)?,
        FlowDef::Volume(text) => {
            check_quantity(&field("flow.volume"), text, Quantity::VolumeFlow)?
        }
    };
    Ok(())
}

fn check_quantity(field: &str, text: &str, quantity: Quantity) -> Result<f64, ValidationError> {
    parse_quantity(text, quantity).map_err(|e| invalid(field, text, e))
}

fn invalid(
    field: impl Into<String>,
    value: impl ToString,
    reason: impl ToString,
) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.into(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
