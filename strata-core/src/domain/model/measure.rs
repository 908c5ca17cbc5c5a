// strata-core/src/domain/model/measure.rs

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::model::field::table_column_sql;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasureKind {
    Count,
    Sum,
    Average,
    Min,
    Max,
    CountDistinct,
    /// Free SQL expression, rendered as LookML `number`.
    #[serde(rename = "number")]
    Custom,
}

impl MeasureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Count => "count",
            Self::Sum => "sum",
            Self::Average => "average",
            Self::Min => "min",
            Self::Max => "max",
            Self::CountDistinct => "count_distinct",
            Self::Custom => "number",
        }
    }
}

impl FromStr for MeasureKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "count" => Ok(Self::Count),
            "sum" => Ok(Self::Sum),
            "average" | "avg" => Ok(Self::Average),
            "min" => Ok(Self::Min),
            "max" => Ok(Self::Max),
            "count_distinct" => Ok(Self::CountDistinct),
            "number" | "custom" => Ok(Self::Custom),
            other => Err(format!("unknown measure type '{other}'")),
        }
    }
}

impl fmt::Display for MeasureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

pub const FORMAT_USD: &str = "usd";
pub const FORMAT_INTEGER: &str = "decimal_0";
pub const FORMAT_PERCENT: &str = "percent_2";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Measure {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: MeasureKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sql: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_format_name: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub drill_fields: Vec<String>,
    /// `field: expression` pairs, rendered as LookML `filters`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<(String, String)>,
}

impl Measure {
    /// The record count every view carries.
    pub fn count(drill_set: &str) -> Self {
        Self {
            name: "count".to_string(),
            kind: MeasureKind::Count,
            sql: None,
            description: Some("Count of records".to_string()),
            value_format_name: None,
            drill_fields: vec![format!("{drill_set}*")],
            filters: Vec::new(),
        }
    }

    /// Aggregate of one column.
    pub fn over_column(name: String, kind: MeasureKind, column: &str) -> Self {
        Self {
            name,
            kind,
            sql: Some(table_column_sql(column)),
            description: None,
            value_format_name: None,
            drill_fields: Vec::new(),
            filters: Vec::new(),
        }
    }

    pub fn described(mut self, description: String) -> Self {
        self.description = Some(description);
        self
    }

    pub fn formatted(mut self, value_format_name: &str) -> Self {
        self.value_format_name = Some(value_format_name.to_string());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_measure() {
        let count = Measure::count("detail");
        assert_eq!(count.kind, MeasureKind::Count);
        assert_eq!(count.description.as_deref(), Some("Count of records"));
        assert_eq!(count.drill_fields, vec!["detail*"]);
        assert!(count.sql.is_none());
    }

    #[test]
    fn test_custom_kind_renders_as_number() {
        assert_eq!(MeasureKind::Custom.as_str(), "number");
        assert_eq!(MeasureKind::CountDistinct.to_string(), "count_distinct");
        assert_eq!("avg".parse::<MeasureKind>(), Ok(MeasureKind::Average));
        assert!("median".parse::<MeasureKind>().is_err());
    }
}
