// strata-core/src/domain/model/view.rs

use serde::Serialize;

use crate::domain::model::field::{Dimension, DimensionGroup};
use crate::domain::model::measure::Measure;

/// Name of the drill set every generated view carries.
pub const DRILL_SET: &str = "detail";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSet {
    pub name: String,
    pub fields: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct View {
    pub name: String,
    /// Quoted warehouse reference, e.g. `` `project.dataset.table` ``.
    pub sql_table_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub dimensions: Vec<Dimension>,
    pub dimension_groups: Vec<DimensionGroup>,
    pub measures: Vec<Measure>,
    pub drill_set: FieldSet,
}

impl View {
    pub fn dimension(&self, name: &str) -> Option<&Dimension> {
        self.dimensions.iter().find(|d| d.name == name)
    }

    pub fn dimension_group(&self, name: &str) -> Option<&DimensionGroup> {
        self.dimension_groups.iter().find(|g| g.name == name)
    }

    pub fn measure(&self, name: &str) -> Option<&Measure> {
        self.measures.iter().find(|m| m.name == name)
    }
}
