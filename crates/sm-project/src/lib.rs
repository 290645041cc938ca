//! sm-project: scenario file format and validation.

pub mod schema;
pub mod units;
pub mod validate;

pub use schema::*;
pub use units::{Quantity, UnitError, parse_quantity};
pub use validate::{LATEST_VERSION, ValidationError, validate_scenario};

use std::path::Path;

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parse and validate a scenario from YAML text.
pub fn from_yaml_str(content: &str) -> ProjectResult<Scenario> {
    let scenario: Scenario = serde_yaml::from_str(content)?;
    validate_scenario(&scenario)?;
    Ok(scenario)
}

/// Parse and validate a scenario from JSON text.
pub fn from_json_str(content: &str) -> ProjectResult<Scenario> {
    let scenario: Scenario = serde_json::from_str(content)?;
    validate_scenario(&scenario)?;
    Ok(scenario)
}

pub fn load_yaml(path: &Path) -> ProjectResult<Scenario> {
    let content = std::fs::read_to_string(path)?;
    from_yaml_str(&content)
}

pub fn save_yaml(path: &Path, scenario: &Scenario) -> ProjectResult<()> {
    validate_scenario(scenario)?;
    let content = serde_yaml::to_string(scenario)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &Path) -> ProjectResult<Scenario> {
    let content = std::fs::read_to_string(path)?;
    from_json_str(&content)
}

pub fn save_json(path: &Path, scenario: &Scenario) -> ProjectResult<()> {
    validate_scenario(scenario)?;
    let content = serde_json::to_string_pretty(scenario)?;
    std::fs::write(path, content)?;
    Ok(())
}
