// strata-core/src/domain/type_mapper.rs

use crate::domain::metadata::ColumnMetadata;
use crate::domain::rules::TypeMappingRule;

/// Ordered lookup over the configured type mappings.
#[derive(Debug, Clone, Default)]
pub struct TypeMapper {
    rules: Vec<TypeMappingRule>,
}

impl TypeMapper {
    pub fn new(rules: Vec<TypeMappingRule>) -> Self {
        Self { rules }
    }

    /// First rule whose warehouse type equals `warehouse_type` exactly.
    pub fn resolve(&self, warehouse_type: &str) -> Option<&TypeMappingRule> {
        self.rules.iter().find(|r| r.warehouse_type == warehouse_type)
    }

    /// Whether the column produces a field at all: time columns always do,
    /// others only through a mapping rule.
    pub fn covers(&self, column: &ColumnMetadata) -> bool {
        column.is_time_group_type() || self.resolve(&column.warehouse_type).is_some()
    }
}
