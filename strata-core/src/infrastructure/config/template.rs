// strata-core/src/infrastructure/config/template.rs

use std::path::{Path, PathBuf};
use tracing::info;

use crate::infrastructure::config::project::CONFIG_CANDIDATES;
use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::fs::atomic_write;

/// Written by `strata init`.
pub const DEFAULT_CONFIG: &str = r#"# strata.yaml

# Where table metadata comes from
connection:
  # duckdb: read the catalog of a DuckDB database file
  # snapshot: read a YAML/JSON metadata dump
  engine: duckdb
  # Relative paths are resolved from this file's directory
  database: warehouse.duckdb
  # Catalog name used in sql_table_name. Defaults to the DuckDB catalog.
  # project_id: my-project
  # Schemas to scan for tables
  datasets:
    - main

# Looker project configuration
looker:
  project_path: ./looker
  views_path: views/base/base.view.lkml
  explores_path: explores/base.explores.lkml
  # Looker connection name
  connection: my-warehouse

# Rules for how models and fields are generated
model_rules:
  # How column names are interpreted
  naming_conventions:
    pk_suffix: _pk
    fk_suffix: _fk
    view_prefix: ''
    view_suffix: ''
    explore_prefix: ''
    explore_suffix: ''

  # Default behaviors for generated views
  defaults:
    measures:
      - count
    hide_fields_by_suffix:
      - _pk
      - _fk
    # Sum/average/min/max for numeric columns
    auto_measures: false

  # Warehouse types to LookML. First matching warehouse_type wins.
  # TIMESTAMP, DATETIME and DATE columns always become time dimension groups.
  type_mapping:
    - warehouse_type: VARCHAR
      target: dimension
      params:
        type: string
    - warehouse_type: STRING
      target: dimension
      params:
        type: string
    - warehouse_type: INTEGER
      target: dimension
      params:
        type: number
    - warehouse_type: BIGINT
      target: dimension
      params:
        type: number
    - warehouse_type: INT64
      target: dimension
      params:
        type: number
    - warehouse_type: DOUBLE
      target: dimension
      params:
        type: number
    - warehouse_type: DECIMAL
      target: dimension
      params:
        type: number
    - warehouse_type: NUMERIC
      target: dimension
      params:
        type: number
    - warehouse_type: FLOAT64
      target: dimension
      params:
        type: number
    - warehouse_type: BOOLEAN
      target: dimension
      params:
        type: yesno
    - warehouse_type: BOOL
      target: dimension
      params:
        type: yesno

  # Hand-written explores, appended to the generated ones
  custom_explores: []
"#;

/// Writes [`DEFAULT_CONFIG`] into `dir`. Refuses to overwrite unless `force`.
pub fn write_default_config(dir: &Path, force: bool) -> Result<PathBuf, InfrastructureError> {
    let path = dir.join(CONFIG_CANDIDATES[0]);
    if path.exists() && !force {
        return Err(InfrastructureError::ConfigError(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }
    std::fs::create_dir_all(dir)?;
    atomic_write(&path, DEFAULT_CONFIG)?;
    info!(path = ?path, "Default configuration written");
    Ok(path)
}
