// strata-core/src/application/view_builder.rs

use std::collections::HashSet;
use tracing::{debug, warn};

use crate::application::measures::MeasureSynthesizer;
use crate::domain::metadata::{ColumnMetadata, StandardType, TableMetadata};
use crate::domain::model::{
    DRILL_SET, Dimension, DimensionGroup, FieldSet, FieldType, GroupKind, Measure, MeasureKind,
    Timeframe, View, table_column_sql,
};
use crate::domain::rules::{NamingRules, TargetKind, TypeMappingRule};
use crate::domain::{FieldClassifier, TypeMapper};

/// Checked in order; only one is stripped.
const TIME_SUFFIXES: [&str; 5] = ["_timestamp", "_date", "_time", "_at", "_ts"];

/// `created_at` -> `created`. A name that is only a suffix is kept whole.
pub fn strip_time_suffix(column: &str) -> &str {
    TIME_SUFFIXES
        .iter()
        .find_map(|suffix| column.strip_suffix(suffix))
        .filter(|base| !base.is_empty())
        .unwrap_or(column)
}

pub struct ViewBuilder<'a> {
    naming: &'a NamingRules,
    classifier: &'a FieldClassifier,
    mapper: &'a TypeMapper,
    measures: MeasureSynthesizer<'a>,
}

impl<'a> ViewBuilder<'a> {
    pub fn new(
        naming: &'a NamingRules,
        classifier: &'a FieldClassifier,
        mapper: &'a TypeMapper,
        measures: MeasureSynthesizer<'a>,
    ) -> Self {
        Self {
            naming,
            classifier,
            mapper,
            measures,
        }
    }

    pub fn build(&self, table: &TableMetadata) -> View {
        let name = self.naming.view_name(&table.table_id);

        let mut columns: Vec<&ColumnMetadata> = table.columns.iter().collect();
        columns.sort_by_key(|c| c.ordinal_position.unwrap_or(u32::MAX));

        let column_names: HashSet<&str> = columns.iter().map(|c| c.name.as_str()).collect();
        let mut group_names: HashSet<String> = HashSet::new();

        let mut dimensions = Vec::new();
        let mut dimension_groups = Vec::new();
        let mut mapped_measures = Vec::new();

        for column in columns {
            if column.is_time_group_type() {
                let group = self.time_group(column, &column_names, &group_names);
                group_names.insert(group.name.clone());
                dimension_groups.push(group);
                continue;
            }

            let Some(rule) = self.mapper.resolve(&column.warehouse_type) else {
                warn!(
                    view = %name,
                    column = %column.name,
                    warehouse_type = %column.warehouse_type,
                    "No type mapping found, field skipped"
                );
                continue;
            };

            match rule.target {
                TargetKind::Dimension => dimensions.push(self.dimension(column, rule)),
                TargetKind::DimensionGroup => {
                    let group = self.mapped_group(column, rule, &column_names, &group_names);
                    group_names.insert(group.name.clone());
                    dimension_groups.push(group);
                }
                TargetKind::Measure => mapped_measures.push(mapped_measure(column, rule)),
            }
        }

        let drill_fields = dimensions
            .iter()
            .filter(|d: &&Dimension| !d.hidden)
            .map(|d| d.name.clone())
            .collect();

        let mut measures = self.measures.generate(table);
        for measure in mapped_measures {
            if measures.iter().any(|m| m.name == measure.name) {
                debug!(view = %name, measure = %measure.name, "Measure name already taken");
                continue;
            }
            measures.push(measure);
        }

        View {
            name,
            sql_table_name: format!("`{}`", table.full_name()),
            description: table.description.clone(),
            dimensions,
            dimension_groups,
            measures,
            drill_set: FieldSet {
                name: DRILL_SET.to_string(),
                fields: drill_fields,
            },
        }
    }

    fn dimension(&self, column: &ColumnMetadata, rule: &TypeMappingRule) -> Dimension {
        let field_type = match rule.params.field_type.as_deref() {
            Some(t) => FieldType::from(t),
            None => FieldType::from(column.standard_type),
        };

        let mut dim = Dimension::new(&column.name, field_type);
        dim.description = column.description.clone();
        dim.primary_key = self.classifier.column_is_primary_key(column);
        dim.hidden = self.classifier.should_hide(&column.name);
        dim.params = rule.params.extra.clone();
        dim
    }

    /// Group name with the time suffix stripped, unless that name is already
    /// used by another column or group of the view.
    fn group_name(
        &self,
        column: &ColumnMetadata,
        column_names: &HashSet<&str>,
        group_names: &HashSet<String>,
    ) -> String {
        let stripped = strip_time_suffix(&column.name);
        let clashes = stripped != column.name
            && (column_names.contains(stripped) || group_names.contains(stripped));
        if clashes {
            debug!(column = %column.name, "Dimension group name taken, keeping full column name");
            return column.name.clone();
        }
        stripped.to_string()
    }

    fn time_group(
        &self,
        column: &ColumnMetadata,
        column_names: &HashSet<&str>,
        group_names: &HashSet<String>,
    ) -> DimensionGroup {
        let timeframes = if column.standard_type == StandardType::Date {
            Timeframe::DATE.to_vec()
        } else {
            Timeframe::DATETIME.to_vec()
        };

        DimensionGroup {
            name: self.group_name(column, column_names, group_names),
            kind: GroupKind::Time,
            timeframes,
            sql: table_column_sql(&column.name),
            description: column.description.clone(),
            hidden: self.classifier.should_hide(&column.name),
        }
    }

    fn mapped_group(
        &self,
        column: &ColumnMetadata,
        rule: &TypeMappingRule,
        column_names: &HashSet<&str>,
        group_names: &HashSet<String>,
    ) -> DimensionGroup {
        let mut group = self.time_group(column, column_names, group_names);
        if rule.params.field_type.as_deref() == Some("duration") {
            group.kind = GroupKind::Duration;
        }
        if let Some(list) = rule.params.timeframes.as_deref() {
            let timeframes = Timeframe::parse_list(list);
            if !timeframes.is_empty() {
                group.timeframes = timeframes;
            }
        }
        group
    }
}

fn mapped_measure(column: &ColumnMetadata, rule: &TypeMappingRule) -> Measure {
    let kind = match rule.params.field_type.as_deref().map(str::parse::<MeasureKind>) {
        Some(Ok(kind)) => kind,
        Some(Err(e)) => {
            warn!(column = %column.name, "{e}, using sum");
            MeasureKind::Sum
        }
        None => MeasureKind::Sum,
    };
    let mut measure = Measure::over_column(column.name.clone(), kind, &column.name);
    measure.description = column.description.clone();
    measure.value_format_name = rule.params.extra.get("value_format_name").cloned();
    measure
}
