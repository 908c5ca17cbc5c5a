// strata-core/src/domain/metadata/mod.rs

pub mod column;
pub mod table;

pub use column::{ColumnMetadata, StandardType, normalize_warehouse_type};
pub use table::{TableMetadata, TableSet};
