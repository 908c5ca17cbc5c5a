// strata-core/src/ports/mod.rs

pub mod metadata;
pub mod writer;

pub use metadata::MetadataSource;
pub use writer::ProjectWriter;
