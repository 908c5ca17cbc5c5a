// strata-core/src/infrastructure/adapters/snapshot.rs

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, instrument};

use crate::domain::metadata::{ColumnMetadata, TableMetadata, TableSet};
use crate::error::StrataError;
use crate::infrastructure::error::InfrastructureError;
use crate::ports::metadata::MetadataSource;

// --- FILE FORMAT ---

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SnapshotFile {
    #[serde(default)]
    pub project_id: Option<String>,
    pub tables: Vec<SnapshotTable>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SnapshotTable {
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(alias = "dataset")]
    pub dataset_id: String,
    #[serde(alias = "table", alias = "name")]
    pub table_id: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub columns: Vec<SnapshotColumn>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SnapshotColumn {
    pub name: String,
    #[serde(rename = "type", alias = "data_type")]
    pub data_type: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_nullable", alias = "nullable")]
    pub is_nullable: bool,
    #[serde(default)]
    pub ordinal_position: Option<u32>,
    #[serde(default, alias = "primary_key")]
    pub is_primary_key: bool,
    #[serde(default, alias = "foreign_key")]
    pub is_foreign_key: bool,
}

fn default_nullable() -> bool {
    true
}

// --- ADAPTER ---

/// Serves table metadata from a YAML or JSON dump, for offline generation.
pub struct SnapshotSource {
    snapshot: SnapshotFile,
    project_id: Option<String>,
}

impl SnapshotSource {
    /// `.json` files are read as JSON, anything else as YAML.
    pub fn open(path: &Path) -> Result<Self, InfrastructureError> {
        let content = fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let snapshot = if is_json {
            serde_json::from_str(&content)?
        } else {
            serde_yaml::from_str(&content)?
        };
        Ok(Self::from_snapshot(snapshot))
    }

    pub fn from_snapshot(snapshot: SnapshotFile) -> Self {
        Self {
            snapshot,
            project_id: None,
        }
    }

    /// Takes precedence over the ids recorded in the file.
    pub fn with_project_id(mut self, project_id: Option<String>) -> Self {
        self.project_id = project_id;
        self
    }

    fn to_table(&self, raw: &SnapshotTable) -> Result<TableMetadata, StrataError> {
        let project_id = self
            .project_id
            .as_deref()
            .or(raw.project_id.as_deref())
            .or(self.snapshot.project_id.as_deref())
            .unwrap_or_default();

        let mut table = TableMetadata::new(project_id, &raw.dataset_id, &raw.table_id)?
            .with_description(raw.description.clone().unwrap_or_default());

        for raw_col in &raw.columns {
            let mut column = ColumnMetadata::new(&raw_col.name, &raw_col.data_type)?
                .with_nullable(raw_col.is_nullable)
                .with_description(raw_col.description.clone().unwrap_or_default());
            if let Some(position) = raw_col.ordinal_position {
                column = column.at_position(position);
            }
            if raw_col.is_primary_key {
                column = column.primary_key();
            }
            if raw_col.is_foreign_key {
                column = column.foreign_key();
            }
            table.push_column(column);
        }

        // Insertion order is ordinal order.
        table
            .columns
            .sort_by_key(|c| c.ordinal_position.unwrap_or(u32::MAX));
        Ok(table)
    }
}

#[async_trait]
impl MetadataSource for SnapshotSource {
    #[instrument(skip(self))]
    async fn fetch_tables(&self, datasets: &[String]) -> Result<TableSet, StrataError> {
        let mut set = TableSet::new();
        for dataset in datasets {
            let mut count = 0;
            for raw in self.snapshot.tables.iter().filter(|t| &t.dataset_id == dataset) {
                set.insert(self.to_table(raw)?)?;
                count += 1;
            }
            info!(dataset = %dataset, tables = count, "Dataset read from snapshot");
        }
        Ok(set)
    }

    fn source_name(&self) -> &str {
        "snapshot"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::error::DomainError;
    use anyhow::Result;
    use tempfile::tempdir;

    const SNAPSHOT: &str = r#"
project_id: acme
tables:
  - dataset: app
    table: users
    description: Registered users
    columns:
      - { name: user_pk, type: INT64, primary_key: true, nullable: false }
      - { name: email, type: STRING, description: Login email }
      - { name: organization_fk, type: INT64 }
  - dataset: app
    table: organizations
    project_id: acme-shared
    columns:
      - { name: name, type: STRING, ordinal_position: 2 }
      - { name: organization_pk, type: INT64, ordinal_position: 1 }
  - dataset: staging
    table: raw_events
    columns:
      - { name: payload, type: JSON }
"#;

    #[tokio::test]
    async fn test_yaml_snapshot() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("metadata.yaml");
        fs::write(&path, SNAPSHOT)?;

        let source = SnapshotSource::open(&path)?;
        let tables = source.fetch_tables(&["app".to_string()]).await?;

        assert_eq!(tables.len(), 2);
        let users = tables.get("app.users").unwrap();
        assert_eq!(users.full_name(), "acme.app.users");
        assert!(users.column("user_pk").unwrap().is_primary_key);
        assert!(!users.column("user_pk").unwrap().is_nullable);
        assert_eq!(users.column("email").unwrap().description.as_deref(), Some("Login email"));

        let orgs = tables.get("app.organizations").unwrap();
        assert_eq!(orgs.project_id, "acme-shared");
        assert_eq!(orgs.columns[0].name, "organization_pk");
        Ok(())
    }

    #[tokio::test]
    async fn test_json_snapshot_with_override() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("metadata.json");
        fs::write(
            &path,
            r#"{"tables": [{"dataset_id": "app", "table_id": "t", "columns": [{"name": "id", "data_type": "integer"}]}]}"#,
        )?;

        let source = SnapshotSource::open(&path)?.with_project_id(Some("prod".into()));
        let tables = source.fetch_tables(&["app".to_string()]).await?;
        let t = tables.get("app.t").unwrap();
        assert_eq!(t.project_id, "prod");
        assert_eq!(t.columns[0].warehouse_type, "INTEGER");
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_project_id_is_a_contract_violation() -> Result<()> {
        let snapshot: SnapshotFile = serde_yaml::from_str(
            "tables:\n  - { dataset: app, table: t, columns: [] }\n",
        )?;
        let err = SnapshotSource::from_snapshot(snapshot)
            .fetch_tables(&["app".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StrataError::Domain(DomainError::EmptyIdentifier("project id"))
        ));
        Ok(())
    }
}
