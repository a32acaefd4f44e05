use std::path::PathBuf;

use thiserror::Error;

use ilkgen_robot::RobotError;
use ilkgen_solver::SolverError;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

/// Top-level error type of the generator.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Robot error: {0}")]
    Robot(#[from] RobotError),

    #[error("Query error: {0}")]
    Solver(#[from] SolverError),

    #[error("Cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{failed} of {total} solvers could not be generated")]
    Partial { failed: usize, total: usize },
}
