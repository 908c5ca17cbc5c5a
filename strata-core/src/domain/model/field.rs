// strata-core/src/domain/model/field.rs

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::domain::metadata::StandardType;

/// LookML dimension type.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FieldType {
    #[default]
    String,
    Number,
    YesNo,
    Time,
    Duration,
    /// Anything else a type-mapping rule asks for (`zipcode`, `tier`...).
    Other(String),
}

impl FieldType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::YesNo => "yesno",
            Self::Time => "time",
            Self::Duration => "duration",
            Self::Other(s) => s.as_str(),
        }
    }
}

impl From<StandardType> for FieldType {
    fn from(standard: StandardType) -> Self {
        match standard {
            StandardType::Number => Self::Number,
            StandardType::YesNo => Self::YesNo,
            _ => Self::String,
        }
    }
}

impl From<&str> for FieldType {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "string" => Self::String,
            "number" => Self::Number,
            "yesno" => Self::YesNo,
            "time" => Self::Time,
            "duration" => Self::Duration,
            _ => Self::Other(s.trim().to_string()),
        }
    }
}

impl FromStr for FieldType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for FieldType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FieldType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(FieldType::from(s.as_str()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dimension {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub sql: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub hidden: bool,
    pub primary_key: bool,
    /// Extra parameters copied from the type-mapping rule.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub params: BTreeMap<String, String>,
}

impl Dimension {
    pub fn new(name: &str, field_type: FieldType) -> Self {
        Self {
            name: name.to_string(),
            field_type,
            sql: table_column_sql(name),
            description: None,
            label: None,
            hidden: false,
            primary_key: false,
            params: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GroupKind {
    #[default]
    Time,
    Duration,
}

impl GroupKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Time => "time",
            Self::Duration => "duration",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Timeframe {
    Raw,
    Time,
    Date,
    Week,
    Month,
    Quarter,
    Year,
}

impl Timeframe {
    pub const DATETIME: [Timeframe; 7] = [
        Self::Raw,
        Self::Time,
        Self::Date,
        Self::Week,
        Self::Month,
        Self::Quarter,
        Self::Year,
    ];

    pub const DATE: [Timeframe; 6] = [
        Self::Raw,
        Self::Date,
        Self::Week,
        Self::Month,
        Self::Quarter,
        Self::Year,
    ];

    /// Parses a LookML list literal such as `[raw, date, week]`.
    /// Unknown entries are dropped.
    pub fn parse_list(list: &str) -> Vec<Timeframe> {
        list.trim_matches(|c: char| c == '[' || c == ']' || c.is_whitespace())
            .split(',')
            .filter_map(|item| match item.trim() {
                "raw" => Some(Self::Raw),
                "time" => Some(Self::Time),
                "date" => Some(Self::Date),
                "week" => Some(Self::Week),
                "month" => Some(Self::Month),
                "quarter" => Some(Self::Quarter),
                "year" => Some(Self::Year),
                _ => None,
            })
            .collect()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Raw => "raw",
            Self::Time => "time",
            Self::Date => "date",
            Self::Week => "week",
            Self::Month => "month",
            Self::Quarter => "quarter",
            Self::Year => "year",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DimensionGroup {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: GroupKind,
    pub timeframes: Vec<Timeframe>,
    pub sql: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub hidden: bool,
}

/// `${TABLE}.<column>`
pub fn table_column_sql(column: &str) -> String {
    format!("${{TABLE}}.{column}")
}
