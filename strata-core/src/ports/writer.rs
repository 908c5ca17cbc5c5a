// strata-core/src/ports/writer.rs

use std::path::PathBuf;

use crate::domain::model::Project;
use crate::error::StrataError;

pub trait ProjectWriter {
    /// Serializes the project and returns the files it wrote.
    fn write(&self, project: &Project) -> Result<Vec<PathBuf>, StrataError>;
}
