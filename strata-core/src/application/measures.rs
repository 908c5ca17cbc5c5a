// strata-core/src/application/measures.rs

use tracing::warn;

use crate::domain::{FieldClassifier, TypeMapper};
use crate::domain::metadata::{ColumnMetadata, TableMetadata};
use crate::domain::model::measure::{FORMAT_INTEGER, FORMAT_PERCENT, FORMAT_USD};
use crate::domain::model::{DRILL_SET, Measure, MeasureKind};
use crate::domain::rules::{DefaultBehaviors, DefaultMeasure};

const AMOUNT_WORDS: [&str; 8] = [
    "amount", "price", "cost", "value", "revenue", "sales", "fee", "total",
];
const COUNT_WORDS: [&str; 5] = ["count", "quantity", "qty", "number", "num"];
const RATIO_WORDS: [&str; 4] = ["ratio", "rate", "percent", "pct"];

fn mentions(column: &str, vocabulary: &[&str]) -> bool {
    let lower = column.to_lowercase();
    vocabulary.iter().any(|word| lower.contains(word))
}

/// `order_amount` -> `order amount`
fn words(column: &str) -> String {
    column.replace('_', " ")
}

/// Replaces a measure of the same name in place, appends otherwise.
fn upsert(measures: &mut Vec<Measure>, measure: Measure) {
    match measures.iter_mut().find(|m| m.name == measure.name) {
        Some(existing) => *existing = measure,
        None => measures.push(measure),
    }
}

/// Only columns the mapper covers are aggregated; an unmapped column
/// appears in no output.
pub struct MeasureSynthesizer<'a> {
    classifier: &'a FieldClassifier,
    mapper: &'a TypeMapper,
    defaults: &'a DefaultBehaviors,
}

impl<'a> MeasureSynthesizer<'a> {
    pub fn new(
        classifier: &'a FieldClassifier,
        mapper: &'a TypeMapper,
        defaults: &'a DefaultBehaviors,
    ) -> Self {
        Self {
            classifier,
            mapper,
            defaults,
        }
    }

    pub fn generate(&self, table: &TableMetadata) -> Vec<Measure> {
        let mut measures = vec![Measure::count(DRILL_SET)];

        if self.defaults.measures.contains(&DefaultMeasure::CountDistinct) {
            match self.classifier.find_primary_key(table) {
                Some(pk) if !self.mapper.covers(pk) => warn!(
                    table = %table.table_key(),
                    column = %pk.name,
                    "count_distinct skipped, primary key has no type mapping"
                ),
                Some(pk) => measures.push(
                    Measure::over_column("count_distinct".to_string(), MeasureKind::CountDistinct, &pk.name)
                        .described(format!("Distinct {}", words(&pk.name))),
                ),
                None => warn!(
                    table = %table.table_key(),
                    "count_distinct requested but the table has no primary key"
                ),
            }
        }

        if self.defaults.auto_measures {
            for column in table.columns.iter().filter(|c| self.is_aggregatable(c)) {
                for measure in self.column_measures(&column.name) {
                    upsert(&mut measures, measure);
                }
            }
        }

        measures
    }

    fn is_aggregatable(&self, column: &ColumnMetadata) -> bool {
        column.is_numeric_type()
            && self.mapper.covers(column)
            && !self.classifier.should_hide(&column.name)
            && !self.classifier.column_is_primary_key(column)
            && !self.classifier.column_is_foreign_key(column)
    }

    fn column_measures(&self, column: &str) -> Vec<Measure> {
        let label = words(column);
        let total = || {
            Measure::over_column(format!("total_{column}"), MeasureKind::Sum, column)
                .described(format!("Total {label}"))
        };
        let average = || {
            Measure::over_column(format!("avg_{column}"), MeasureKind::Average, column)
                .described(format!("Average {label}"))
        };

        let mut measures = vec![
            total(),
            average(),
            Measure::over_column(format!("min_{column}"), MeasureKind::Min, column)
                .described(format!("Minimum {label}")),
            Measure::over_column(format!("max_{column}"), MeasureKind::Max, column)
                .described(format!("Maximum {label}")),
        ];

        if mentions(column, &AMOUNT_WORDS) {
            upsert(&mut measures, total().formatted(FORMAT_USD));
            upsert(&mut measures, average().formatted(FORMAT_USD));
        }
        if mentions(column, &COUNT_WORDS) {
            upsert(&mut measures, total().formatted(FORMAT_INTEGER));
        }
        if mentions(column, &RATIO_WORDS) {
            upsert(&mut measures, average().formatted(FORMAT_PERCENT));
        }
        measures
    }
}
