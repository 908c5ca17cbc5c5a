// strata-core/src/domain/metadata/table.rs

use serde::Serialize;
use std::collections::HashMap;

use crate::domain::error::DomainError;
use crate::domain::metadata::column::ColumnMetadata;

/// A discovered table and its columns, in ordinal order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableMetadata {
    pub project_id: String,
    pub dataset_id: String,
    pub table_id: String,
    pub description: Option<String>,
    pub columns: Vec<ColumnMetadata>,
}

fn identifier(value: &str, what: &'static str) -> Result<String, DomainError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(DomainError::EmptyIdentifier(what));
    }
    Ok(value.to_string())
}

impl TableMetadata {
    pub fn new(project_id: &str, dataset_id: &str, table_id: &str) -> Result<Self, DomainError> {
        Ok(Self {
            project_id: identifier(project_id, "project id")?,
            dataset_id: identifier(dataset_id, "dataset id")?,
            table_id: identifier(table_id, "table id")?,
            description: None,
            columns: Vec::new(),
        })
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let description = description.into();
        if !description.trim().is_empty() {
            self.description = Some(description);
        }
        self
    }

    /// Appends a column. Insertion order is the ordinal order; a missing
    /// ordinal position is filled from the current column count (1-based).
    pub fn push_column(&mut self, mut column: ColumnMetadata) {
        if column.ordinal_position.is_none() {
            column.ordinal_position = Some(self.columns.len() as u32 + 1);
        }
        self.columns.push(column);
    }

    pub fn with_column(mut self, column: ColumnMetadata) -> Self {
        self.push_column(column);
        self
    }

    /// `dataset.table`
    pub fn table_key(&self) -> String {
        format!("{}.{}", self.dataset_id, self.table_id)
    }

    /// `project.dataset.table`
    pub fn full_name(&self) -> String {
        format!("{}.{}.{}", self.project_id, self.dataset_id, self.table_id)
    }

    pub fn column(&self, name: &str) -> Option<&ColumnMetadata> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// Insertion-ordered set of tables keyed by `dataset.table`.
///
/// Iteration order is the order in which the schema layer produced the tables;
/// relationship detection depends on it ("first match wins").
#[derive(Debug, Clone, Default)]
pub struct TableSet {
    tables: Vec<TableMetadata>,
    index: HashMap<String, usize>,
}

impl TableSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, table: TableMetadata) -> Result<(), DomainError> {
        let key = table.table_key();
        if self.index.contains_key(&key) {
            return Err(DomainError::DuplicateTable(key));
        }
        self.index.insert(key, self.tables.len());
        self.tables.push(table);
        Ok(())
    }

    pub fn get(&self, table_key: &str) -> Option<&TableMetadata> {
        self.index.get(table_key).map(|&i| &self.tables[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &TableMetadata> {
        self.tables.iter()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl TryFrom<Vec<TableMetadata>> for TableSet {
    type Error = DomainError;

    fn try_from(tables: Vec<TableMetadata>) -> Result<Self, Self::Error> {
        let mut set = TableSet::new();
        for table in tables {
            set.insert(table)?;
        }
        Ok(set)
    }
}

impl<'a> IntoIterator for &'a TableSet {
    type Item = &'a TableMetadata;
    type IntoIter = std::slice::Iter<'a, TableMetadata>;

    fn into_iter(self) -> Self::IntoIter {
        self.tables.iter()
    }
}
