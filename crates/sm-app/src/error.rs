//! Error types for the sm-app service layer.

use std::path::PathBuf;

/// Application error shared by the CLI and library callers.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Scenario error: {0}")]
    Project(String),

    #[error("Failed to read scenario file: {path}")]
    ScenarioFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Unsupported scenario format: {path} (expected .yaml, .yml or .json)")]
    UnsupportedFormat { path: PathBuf },

    #[error("Scenario validation failed: {0}")]
    Validation(String),

    #[error("Scenario compilation failed: {0}")]
    Compile(String),

    #[error("Solver error: {0}")]
    Solver(String),

    #[error("Property error: {0}")]
    Fluid(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for sm-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<sm_project::ProjectError> for AppError {
    fn from(err: sm_project::ProjectError) -> Self {
        match err {
            sm_project::ProjectError::Validation(e) => AppError::Validation(e.to_string()),
            other => AppError::Project(other.to_string()),
        }
    }
}

impl From<sm_project::ValidationError> for AppError {
    fn from(err: sm_project::ValidationError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<sm_solver::SolverError> for AppError {
    fn from(err: sm_solver::SolverError) -> Self {
        AppError::Solver(err.to_string())
    }
}

impl From<sm_fluids::FluidError> for AppError {
    fn from(err: sm_fluids::FluidError) -> Self {
        AppError::Fluid(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}
