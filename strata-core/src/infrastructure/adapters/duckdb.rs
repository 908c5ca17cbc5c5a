// strata-core/src/infrastructure/adapters/duckdb.rs

use async_trait::async_trait;
use duckdb::{AccessMode, Config, Connection, params};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, instrument};

use crate::domain::metadata::{ColumnMetadata, TableMetadata, TableSet};
use crate::error::StrataError;
use crate::infrastructure::error::{DatabaseError, InfrastructureError};
use crate::ports::metadata::MetadataSource;

const TABLES_SQL: &str = "
    SELECT database_name, table_name, comment
    FROM duckdb_tables()
    WHERE schema_name = ?
    UNION ALL
    SELECT database_name, view_name AS table_name, comment
    FROM duckdb_views()
    WHERE NOT internal AND schema_name = ?
    ORDER BY table_name";

const COLUMNS_SQL: &str = "
    SELECT table_name, column_name, column_index, data_type, is_nullable, comment
    FROM duckdb_columns()
    WHERE schema_name = ?
    ORDER BY table_name, column_index";

const KEYS_SQL: &str = "
    SELECT table_name, constraint_type, unnest(constraint_column_names) AS column_name
    FROM duckdb_constraints()
    WHERE schema_name = ? AND constraint_type IN ('PRIMARY KEY', 'FOREIGN KEY')";

struct ColumnRow {
    table: String,
    name: String,
    position: i64,
    data_type: String,
    is_nullable: bool,
    comment: Option<String>,
}

/// Reads table metadata from a DuckDB catalog. Datasets are schemas.
pub struct DuckDbCatalog {
    conn: Arc<Mutex<Connection>>,
    project_id: Option<String>,
}

impl DuckDbCatalog {
    /// Opens the database read-only (`:memory:` opens an empty in-memory one).
    pub fn open(db_path: &str) -> Result<Self, InfrastructureError> {
        let conn = if db_path == ":memory:" {
            Connection::open_in_memory()?
        } else {
            let config = Config::default().access_mode(AccessMode::ReadOnly)?;
            Connection::open_with_flags(db_path, config)?
        };
        Ok(Self::from_connection(conn))
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
            project_id: None,
        }
    }

    /// Catalog name to report instead of the DuckDB database name.
    pub fn with_project_id(mut self, project_id: Option<String>) -> Self {
        self.project_id = project_id;
        self
    }

    fn read_dataset(&self, conn: &Connection, dataset: &str) -> Result<Vec<TableMetadata>, StrataError> {
        // Primary and foreign keys declared in the catalog.
        let mut keys: HashMap<(String, String), HashSet<String>> = HashMap::new();
        let mut stmt = conn.prepare(KEYS_SQL)?;
        let rows = stmt.query_map(params![dataset], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?, row.get::<_, String>(2)?))
        })?;
        for row in rows {
            let (table, kind, column) = row?;
            keys.entry((table, column)).or_default().insert(kind);
        }

        let mut columns: BTreeMap<String, Vec<ColumnRow>> = BTreeMap::new();
        let mut stmt = conn.prepare(COLUMNS_SQL)?;
        let rows = stmt.query_map(params![dataset], |row| {
            Ok(ColumnRow {
                table: row.get(0)?,
                name: row.get(1)?,
                position: row.get(2)?,
                data_type: row.get(3)?,
                is_nullable: row.get(4)?,
                comment: row.get(5)?,
            })
        })?;
        for row in rows {
            let row = row?;
            columns.entry(row.table.clone()).or_default().push(row);
        }

        let mut tables = Vec::new();
        let mut stmt = conn.prepare(TABLES_SQL)?;
        let rows = stmt.query_map(params![dataset, dataset], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<String>>(2)?,
            ))
        })?;

        for row in rows {
            let (catalog, table_name, comment) = row?;
            let project_id = self.project_id.as_deref().unwrap_or(&catalog);

            let mut table = TableMetadata::new(project_id, dataset, &table_name)?
                .with_description(comment.unwrap_or_default());

            for col in columns.remove(&table_name).unwrap_or_default() {
                let declared = keys.get(&(table_name.clone(), col.name.clone()));
                let mut column = ColumnMetadata::new(&col.name, &col.data_type)?
                    .with_nullable(col.is_nullable)
                    .at_position(u32::try_from(col.position).unwrap_or(u32::MAX))
                    .with_description(col.comment.unwrap_or_default());
                if declared.is_some_and(|k| k.contains("PRIMARY KEY")) {
                    column = column.primary_key();
                }
                if declared.is_some_and(|k| k.contains("FOREIGN KEY")) {
                    column = column.foreign_key();
                }
                table.push_column(column);
            }

            debug!(table = %table.table_key(), columns = table.columns.len(), "Table read");
            tables.push(table);
        }

        Ok(tables)
    }
}

#[async_trait]
impl MetadataSource for DuckDbCatalog {
    #[instrument(skip(self))]
    async fn fetch_tables(&self, datasets: &[String]) -> Result<TableSet, StrataError> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| InfrastructureError::Database(DatabaseError::LockPoisoned))?;

        let mut set = TableSet::new();
        for dataset in datasets {
            let tables = self.read_dataset(&conn, dataset)?;
            info!(dataset = %dataset, tables = tables.len(), "Dataset scanned");
            for table in tables {
                set.insert(table)?;
            }
        }
        Ok(set)
    }

    fn source_name(&self) -> &str {
        "duckdb"
    }
}
