// strata-core/src/error.rs

use crate::domain::error::DomainError;
use crate::infrastructure::error::InfrastructureError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StrataError {
    // --- DOMAIN (contract violations on metadata) ---
    #[error(transparent)]
    Domain(#[from] DomainError),

    // --- INFRASTRUCTURE (IO, parsing, warehouse) ---
    #[error(transparent)]
    Infrastructure(#[from] InfrastructureError),
}

impl From<std::io::Error> for StrataError {
    fn from(err: std::io::Error) -> Self {
        StrataError::Infrastructure(InfrastructureError::Io(err))
    }
}

impl From<duckdb::Error> for StrataError {
    fn from(err: duckdb::Error) -> Self {
        StrataError::Infrastructure(InfrastructureError::from(err))
    }
}
