// strata-core/src/domain/model/explore.rs

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum JoinType {
    #[default]
    LeftOuter,
    Inner,
    FullOuter,
    Cross,
}

impl JoinType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LeftOuter => "left_outer",
            Self::Inner => "inner",
            Self::FullOuter => "full_outer",
            Self::Cross => "cross",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Relationship {
    #[default]
    ManyToOne,
    OneToOne,
    OneToMany,
    ManyToMany,
}

impl Relationship {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ManyToOne => "many_to_one",
            Self::OneToOne => "one_to_one",
            Self::OneToMany => "one_to_many",
            Self::ManyToMany => "many_to_many",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Join {
    pub view: String,
    #[serde(rename = "type")]
    pub join_type: JoinType,
    pub relationship: Relationship,
    pub sql_on: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,
}

impl Join {
    /// Left outer, many-to-one join on a foreign key / primary key pair.
    pub fn on_keys(base_view: &str, fk_column: &str, view: &str, pk_column: &str) -> Self {
        Self {
            view: view.to_string(),
            join_type: JoinType::LeftOuter,
            relationship: Relationship::ManyToOne,
            sql_on: format!("${{{base_view}}}.{fk_column} = ${{{view}}}.{pk_column}"),
            fields: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Explore {
    pub name: String,
    /// Base view, rendered as both `from` and `view_name`.
    pub from: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub joins: Vec<Join>,
}

impl Explore {
    pub fn new(name: &str, base_view: &str) -> Self {
        Self {
            name: name.to_string(),
            from: base_view.to_string(),
            description: None,
            fields: Vec::new(),
            joins: Vec::new(),
        }
    }
}
