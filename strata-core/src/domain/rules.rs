// strata-core/src/domain/rules.rs

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use validator::{Validate, ValidationError};

use crate::domain::model::{JoinType, Relationship};

// =============================================================================
//  NAMING CONVENTIONS
// =============================================================================

#[derive(Debug, Deserialize, Serialize, Validate, Clone, PartialEq)]
pub struct NamingRules {
    #[validate(length(min = 1, message = "pk_suffix cannot be empty"))]
    #[serde(default = "default_pk_suffix")]
    pub pk_suffix: String,

    #[validate(length(min = 1, message = "fk_suffix cannot be empty"))]
    #[serde(default = "default_fk_suffix")]
    pub fk_suffix: String,

    #[serde(default)]
    pub view_prefix: String,
    #[serde(default)]
    pub view_suffix: String,
    #[serde(default)]
    pub explore_prefix: String,
    #[serde(default)]
    pub explore_suffix: String,
}

fn default_pk_suffix() -> String {
    "_pk".to_string()
}

fn default_fk_suffix() -> String {
    "_fk".to_string()
}

impl Default for NamingRules {
    fn default() -> Self {
        Self {
            pk_suffix: default_pk_suffix(),
            fk_suffix: default_fk_suffix(),
            view_prefix: String::new(),
            view_suffix: String::new(),
            explore_prefix: String::new(),
            explore_suffix: String::new(),
        }
    }
}

impl NamingRules {
    /// `view_prefix + lower(table_id) + view_suffix`
    pub fn view_name(&self, table_id: &str) -> String {
        format!(
            "{}{}{}",
            self.view_prefix,
            table_id.to_lowercase(),
            self.view_suffix
        )
    }

    pub fn explore_name(&self, table_id: &str) -> String {
        format!(
            "{}{}{}",
            self.explore_prefix,
            table_id.to_lowercase(),
            self.explore_suffix
        )
    }
}

// =============================================================================
//  DEFAULT BEHAVIORS
// =============================================================================

/// Table-level measures requested in `defaults.measures`.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DefaultMeasure {
    Count,
    CountDistinct,
}

#[derive(Debug, Deserialize, Serialize, Validate, Clone, PartialEq)]
pub struct DefaultBehaviors {
    #[serde(default = "default_measures")]
    pub measures: Vec<DefaultMeasure>,

    #[validate(custom(function = "validate_hide_suffixes"))]
    #[serde(default = "default_hidden_suffixes")]
    pub hide_fields_by_suffix: Vec<String>,

    /// Numeric / currency / count / ratio measures per column.
    #[serde(default)]
    pub auto_measures: bool,
}

fn default_measures() -> Vec<DefaultMeasure> {
    vec![DefaultMeasure::Count]
}

fn default_hidden_suffixes() -> Vec<String> {
    vec!["_pk".to_string(), "_fk".to_string()]
}

impl Default for DefaultBehaviors {
    fn default() -> Self {
        Self {
            measures: default_measures(),
            hide_fields_by_suffix: default_hidden_suffixes(),
            auto_measures: false,
        }
    }
}

fn validate_hide_suffixes(suffixes: &[String]) -> Result<(), ValidationError> {
    if suffixes.iter().any(|s| s.is_empty()) {
        return Err(ValidationError::new("empty_suffix")
            .with_message("hide_fields_by_suffix entries cannot be empty".into()));
    }
    Ok(())
}

// =============================================================================
//  TYPE MAPPING
// =============================================================================

/// What a mapped warehouse type becomes in the model.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    #[default]
    Dimension,
    DimensionGroup,
    Measure,
}

impl TargetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dimension => "dimension",
            Self::DimensionGroup => "dimension_group",
            Self::Measure => "measure",
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct MappingParams {
    /// LookML field type (`string`, `number`, `yesno`...).
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeframes: Option<String>,

    /// Accepted for compatibility; the source column reference is always generated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sql: Option<String>,

    /// Any other parameter is copied verbatim onto the dimension.
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TypeMappingRule {
    #[serde(alias = "bq_type")]
    pub warehouse_type: String,

    #[serde(alias = "lookml_type", default)]
    pub target: TargetKind,

    #[serde(alias = "lookml_params", default)]
    pub params: MappingParams,
}

impl TypeMappingRule {
    pub fn dimension(warehouse_type: &str, field_type: &str) -> Self {
        Self {
            warehouse_type: warehouse_type.to_string(),
            target: TargetKind::Dimension,
            params: MappingParams {
                field_type: Some(field_type.to_string()),
                ..Default::default()
            },
        }
    }

    pub fn with_param(mut self, key: &str, value: &str) -> Self {
        self.params.extra.insert(key.to_string(), value.to_string());
        self
    }
}

fn validate_unique_warehouse_types(rules: &[TypeMappingRule]) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for rule in rules {
        if rule.warehouse_type.trim().is_empty() {
            return Err(ValidationError::new("empty_warehouse_type")
                .with_message("type_mapping entries need a warehouse type".into()));
        }
        if !seen.insert(rule.warehouse_type.as_str()) {
            return Err(ValidationError::new("duplicate_warehouse_type").with_message(
                format!("warehouse type '{}' is mapped twice", rule.warehouse_type).into(),
            ));
        }
    }
    Ok(())
}

// =============================================================================
//  CUSTOM EXPLORES
// =============================================================================

#[derive(Debug, Deserialize, Serialize, Validate, Clone, PartialEq)]
pub struct CustomJoin {
    #[validate(length(min = 1, message = "join view cannot be empty"))]
    pub view: String,

    #[validate(length(min = 1, message = "join sql_on cannot be empty"))]
    pub sql_on: String,

    #[serde(rename = "type", default)]
    pub join_type: JoinType,

    #[serde(default)]
    pub relationship: Relationship,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Validate, Clone, PartialEq)]
pub struct CustomExplore {
    #[validate(length(min = 1, message = "explore name cannot be empty"))]
    pub name: String,

    #[validate(length(min = 1, message = "explore base_view cannot be empty"))]
    pub base_view: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[validate(nested)]
    #[serde(default)]
    pub joins: Vec<CustomJoin>,
}

// =============================================================================
//  MODEL RULES (root)
// =============================================================================

#[derive(Debug, Deserialize, Serialize, Validate, Clone, PartialEq, Default)]
pub struct ModelRules {
    #[validate(nested)]
    #[serde(default)]
    pub naming_conventions: NamingRules,

    #[validate(nested)]
    #[serde(default)]
    pub defaults: DefaultBehaviors,

    #[validate(custom(function = "validate_unique_warehouse_types"))]
    #[serde(default)]
    pub type_mapping: Vec<TypeMappingRule>,

    #[validate(nested)]
    #[serde(default)]
    pub custom_explores: Vec<CustomExplore>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn test_default_naming_conventions() {
        let naming = NamingRules::default();
        assert_eq!(naming.pk_suffix, "_pk");
        assert_eq!(naming.fk_suffix, "_fk");
        assert_eq!(naming.view_prefix, "");
        assert_eq!(naming.view_name("Users"), "users");
    }

    #[test]
    fn test_prefixed_names() {
        let naming = NamingRules {
            view_prefix: "bq_".into(),
            view_suffix: "_view".into(),
            explore_prefix: "x_".into(),
            ..Default::default()
        };
        assert_eq!(naming.view_name("Orders"), "bq_orders_view");
        assert_eq!(naming.explore_name("Orders"), "x_orders");
    }

    #[test]
    fn test_default_behaviors() {
        let defaults = DefaultBehaviors::default();
        assert_eq!(defaults.measures, vec![DefaultMeasure::Count]);
        assert_eq!(defaults.hide_fields_by_suffix, vec!["_pk", "_fk"]);
        assert!(!defaults.auto_measures);
    }

    #[test]
    fn test_legacy_mapping_keys_are_accepted() -> Result<()> {
        let yaml = r#"
bq_type: TIMESTAMP
lookml_type: dimension_group
lookml_params:
  type: time
  timeframes: '[raw, time, date, week, month, quarter, year]'
  sql: '${TABLE}.%s'
"#;
        let rule: TypeMappingRule = serde_yaml::from_str(yaml)?;
        assert_eq!(rule.warehouse_type, "TIMESTAMP");
        assert_eq!(rule.target, TargetKind::DimensionGroup);
        assert_eq!(rule.params.field_type.as_deref(), Some("time"));
        assert!(rule.params.extra.is_empty());
        Ok(())
    }

    #[test]
    fn test_extra_params_are_kept() -> Result<()> {
        let yaml = "warehouse_type: NUMERIC\nparams:\n  type: number\n  value_format_name: decimal_2\n";
        let rule: TypeMappingRule = serde_yaml::from_str(yaml)?;
        assert_eq!(rule.target, TargetKind::Dimension);
        assert_eq!(
            rule.params.extra.get("value_format_name").map(String::as_str),
            Some("decimal_2")
        );
        Ok(())
    }

    #[test]
    fn test_empty_suffixes_fail_validation() {
        let rules = ModelRules {
            naming_conventions: NamingRules {
                fk_suffix: String::new(),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(rules.validate().is_err());

        let rules = ModelRules {
            defaults: DefaultBehaviors {
                hide_fields_by_suffix: vec!["_pk".into(), String::new()],
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(rules.validate().is_err());
    }

    #[test]
    fn test_duplicate_warehouse_types_fail_validation() {
        let rules = ModelRules {
            type_mapping: vec![
                TypeMappingRule::dimension("STRING", "string"),
                TypeMappingRule::dimension("STRING", "number"),
            ],
            ..Default::default()
        };
        assert!(rules.validate().is_err());

        let rules = ModelRules {
            type_mapping: vec![TypeMappingRule::dimension("STRING", "string")],
            ..Default::default()
        };
        assert!(rules.validate().is_ok());
    }

    #[test]
    fn test_custom_explore_defaults() -> Result<()> {
        let yaml = r#"
name: user_orders
base_view: users
joins:
  - view: orders
    sql_on: '${users.id} = ${orders.user_id}'
"#;
        let explore: CustomExplore = serde_yaml::from_str(yaml)?;
        assert_eq!(explore.joins[0].join_type, JoinType::LeftOuter);
        assert_eq!(explore.joins[0].relationship, Relationship::ManyToOne);
        assert!(explore.validate().is_ok());
        Ok(())
    }
}
