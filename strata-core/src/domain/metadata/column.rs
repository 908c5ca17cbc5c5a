// strata-core/src/domain/metadata/column.rs

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::error::DomainError;

/// Simplified category of a warehouse type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StandardType {
    #[default]
    String,
    Number,
    YesNo,
    DateTime,
    Date,
    Time,
}

impl StandardType {
    /// Lookup over BigQuery and DuckDB type names. Unknown types fall back to `String`.
    pub fn from_warehouse_type(canonical: &str) -> Self {
        match canonical {
            "INTEGER" | "INT" | "INT64" | "INT32" | "INT16" | "INT8" | "BIGINT" | "SMALLINT"
            | "TINYINT" | "HUGEINT" | "UBIGINT" | "UINTEGER" | "USMALLINT" | "UTINYINT"
            | "FLOAT" | "FLOAT64" | "DOUBLE" | "REAL" | "NUMERIC" | "BIGNUMERIC" | "DECIMAL"
            | "BIGDECIMAL" => Self::Number,
            "BOOLEAN" | "BOOL" => Self::YesNo,
            "TIMESTAMP" | "DATETIME" | "TIMESTAMPTZ" | "TIMESTAMP WITH TIME ZONE" => {
                Self::DateTime
            }
            "DATE" => Self::Date,
            "TIME" => Self::Time,
            _ => Self::String,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::YesNo => "yesno",
            Self::DateTime => "datetime",
            Self::Date => "date",
            Self::Time => "time",
        }
    }
}

impl fmt::Display for StandardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Canonical uppercase token for a raw warehouse type.
///
/// Parameter lists are dropped: `numeric(10,2)` becomes `NUMERIC`,
/// `ARRAY<INT64>` becomes `ARRAY`.
pub fn normalize_warehouse_type(raw: &str) -> String {
    let base = raw
        .split(['(', '<'])
        .next()
        .unwrap_or_default()
        .trim();
    base.to_uppercase()
}

/// One column as reported by the schema layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnMetadata {
    pub name: String,
    pub warehouse_type: String,
    pub standard_type: StandardType,
    pub is_nullable: bool,
    pub ordinal_position: Option<u32>,
    pub description: Option<String>,
    pub is_primary_key: bool,
    pub is_foreign_key: bool,
}

impl ColumnMetadata {
    /// Trims the name and normalizes the type. Rejects blank names.
    pub fn new(name: &str, warehouse_type: &str) -> Result<Self, DomainError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::EmptyIdentifier("column name"));
        }
        let warehouse_type = normalize_warehouse_type(warehouse_type);
        let standard_type = StandardType::from_warehouse_type(&warehouse_type);

        Ok(Self {
            name: name.to_string(),
            warehouse_type,
            standard_type,
            is_nullable: true,
            ordinal_position: None,
            description: None,
            is_primary_key: false,
            is_foreign_key: false,
        })
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let description = description.into();
        if !description.trim().is_empty() {
            self.description = Some(description);
        }
        self
    }

    pub fn with_nullable(mut self, is_nullable: bool) -> Self {
        self.is_nullable = is_nullable;
        self
    }

    pub fn at_position(mut self, ordinal_position: u32) -> Self {
        self.ordinal_position = Some(ordinal_position);
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.is_primary_key = true;
        self
    }

    pub fn foreign_key(mut self) -> Self {
        self.is_foreign_key = true;
        self
    }

    /// Types collapsed into a dimension group. `TIME` is deliberately absent:
    /// a time-of-day column goes through the type mapping like any other field.
    pub fn is_time_group_type(&self) -> bool {
        matches!(
            self.standard_type,
            StandardType::DateTime | StandardType::Date
        )
    }

    pub fn is_numeric_type(&self) -> bool {
        self.standard_type == StandardType::Number
    }

    pub fn is_string_type(&self) -> bool {
        matches!(
            self.warehouse_type.as_str(),
            "STRING" | "TEXT" | "VARCHAR" | "CHAR" | "BPCHAR"
        )
    }
}
