// strata-core/src/domain/classifier.rs

use crate::domain::metadata::{ColumnMetadata, TableMetadata};
use crate::domain::rules::{DefaultBehaviors, NamingRules};

/// Suffix kept for foreign keys named the classic way (`user_id`).
const LEGACY_FK_SUFFIX: &str = "_id";

/// Name-based key and visibility rules.
///
/// Suffix matching is case-sensitive. Empty suffixes would match every
/// name; configuration validation rejects them before they get here.
#[derive(Debug, Clone)]
pub struct FieldClassifier {
    pk_suffix: String,
    fk_suffix: String,
    hide_suffixes: Vec<String>,
}

impl FieldClassifier {
    pub fn new(naming: &NamingRules, defaults: &DefaultBehaviors) -> Self {
        Self {
            pk_suffix: naming.pk_suffix.clone(),
            fk_suffix: naming.fk_suffix.clone(),
            hide_suffixes: defaults.hide_fields_by_suffix.clone(),
        }
    }

    pub fn is_primary_key(&self, name: &str) -> bool {
        name == "id" || name.ends_with(&self.pk_suffix)
    }

    pub fn is_foreign_key(&self, name: &str) -> bool {
        name.ends_with(&self.fk_suffix)
    }

    pub fn should_hide(&self, name: &str) -> bool {
        self.hide_suffixes.iter().any(|suffix| name.ends_with(suffix.as_str()))
    }

    /// `organization_fk` -> `organizations`. Also accepts `_id`.
    ///
    /// A name made only of the suffix yields `"s"`.
    pub fn infer_referenced_table(&self, fk_column: &str) -> Option<String> {
        let base = fk_column
            .strip_suffix(self.fk_suffix.as_str())
            .or_else(|| fk_column.strip_suffix(LEGACY_FK_SUFFIX))?;
        Some(format!("{base}s"))
    }

    /// Explicit schema flag or naming convention.
    pub fn column_is_primary_key(&self, column: &ColumnMetadata) -> bool {
        column.is_primary_key || self.is_primary_key(&column.name)
    }

    pub fn column_is_foreign_key(&self, column: &ColumnMetadata) -> bool {
        column.is_foreign_key || self.is_foreign_key(&column.name)
    }

    /// Primary-key column of a table: explicit flag first, then the pk
    /// suffix, then a column literally named `id`.
    pub fn find_primary_key<'a>(&self, table: &'a TableMetadata) -> Option<&'a ColumnMetadata> {
        table
            .columns
            .iter()
            .find(|c| c.is_primary_key)
            .or_else(|| table.columns.iter().find(|c| c.name.ends_with(&self.pk_suffix)))
            .or_else(|| table.column("id"))
    }
}
