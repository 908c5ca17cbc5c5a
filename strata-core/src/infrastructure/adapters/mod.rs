// strata-core/src/infrastructure/adapters/mod.rs

pub mod duckdb;
pub mod snapshot;

use std::path::Path;

use crate::infrastructure::config::{ConnectionConfig, Engine};
use crate::infrastructure::error::InfrastructureError;
use crate::ports::metadata::MetadataSource;

pub use self::duckdb::DuckDbCatalog;
pub use self::snapshot::SnapshotSource;

/// Metadata source for the configured engine.
pub fn metadata_source(
    connection: &ConnectionConfig,
) -> Result<Box<dyn MetadataSource>, InfrastructureError> {
    let project_id = connection.project_id.clone();
    match connection.engine {
        Engine::DuckDB => Ok(Box::new(
            DuckDbCatalog::open(&connection.database)?.with_project_id(project_id),
        )),
        Engine::Snapshot => Ok(Box::new(
            SnapshotSource::open(Path::new(&connection.database))?.with_project_id(project_id),
        )),
    }
}
