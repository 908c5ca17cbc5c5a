// strata-core/src/infrastructure/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum DatabaseError {
    #[error("DuckDB Engine Error: {0}")]
    #[diagnostic(
        code(strata::infra::database::duckdb),
        help("An error occurred while reading the warehouse catalog.")
    )]
    DuckDB(#[from] duckdb::Error),

    #[error("Warehouse connection lock poisoned")]
    #[diagnostic(code(strata::infra::database::lock))]
    LockPoisoned,
}

#[derive(Error, Debug, Diagnostic)]
pub enum InfrastructureError {
    // --- DATABASE ---
    #[error(transparent)]
    #[diagnostic(transparent)]
    Database(#[from] DatabaseError),

    // --- FILESYSTEM ---
    #[error("File System Error: {0}")]
    #[diagnostic(
        code(strata::infra::io),
        help("Check file permissions or path validity.")
    )]
    Io(#[from] std::io::Error),

    // --- CONFIG / YAML / JSON ---
    #[error("YAML Parsing Error: {0}")]
    #[diagnostic(
        code(strata::infra::yaml),
        help("Check your YAML syntax (indentation, types).")
    )]
    YamlError(#[from] serde_yaml::Error),

    #[error("JSON Parsing Error: {0}")]
    #[diagnostic(code(strata::infra::json))]
    JsonError(#[from] serde_json::Error),

    #[error("Configuration Error: {0}")]
    #[diagnostic(code(strata::infra::config))]
    ConfigError(String),

    #[error("Invalid configuration:\n{0}")]
    #[diagnostic(
        code(strata::infra::validation),
        help("Fix the listed fields in strata.yaml.")
    )]
    Validation(#[from] validator::ValidationErrors),

    #[error("Project configuration not found at '{0}'")]
    #[diagnostic(
        code(strata::infra::config_missing),
        help("Run 'strata init' to create one.")
    )]
    ConfigNotFound(String),
}

impl From<duckdb::Error> for InfrastructureError {
    fn from(err: duckdb::Error) -> Self {
        InfrastructureError::Database(DatabaseError::DuckDB(err))
    }
}
