// strata-core/src/domain/model/mod.rs

pub mod explore;
pub mod field;
pub mod measure;
pub mod project;
pub mod view;

pub use explore::{Explore, Join, JoinType, Relationship};
pub use field::{Dimension, DimensionGroup, FieldType, GroupKind, Timeframe, table_column_sql};
pub use measure::{Measure, MeasureKind};
pub use project::Project;
pub use view::{DRILL_SET, FieldSet, View};
