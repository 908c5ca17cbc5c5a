// strata-core/src/infrastructure/config/project.rs

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::{info, instrument};
use validator::{Validate, ValidationError};

use crate::domain::rules::ModelRules;
use crate::infrastructure::error::InfrastructureError;

pub const CONFIG_CANDIDATES: [&str; 2] = ["strata.yaml", "strata.yml"];

#[allow(clippy::unwrap_used)]
static CONNECTION_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").unwrap());

#[allow(clippy::unwrap_used)]
static DATASET_NAME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]+$").unwrap());

/// Where table metadata is read from.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    #[default]
    DuckDB,
    /// A YAML or JSON metadata dump.
    Snapshot,
}

impl Engine {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DuckDB => "duckdb",
            Self::Snapshot => "snapshot",
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Validate, Clone, PartialEq)]
pub struct ConnectionConfig {
    #[serde(default)]
    pub engine: Engine,

    /// DuckDB file (`:memory:` allowed) or snapshot file.
    #[validate(length(min = 1, message = "connection.database cannot be empty"))]
    pub database: String,

    /// Overrides the catalog name used in `sql_table_name`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,

    #[validate(length(min = 1, message = "At least one dataset must be specified"))]
    #[validate(custom(function = "validate_dataset_names"))]
    pub datasets: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Validate, Clone, PartialEq)]
pub struct LookerConfig {
    pub project_path: PathBuf,

    #[validate(custom(function = "validate_views_path"))]
    pub views_path: String,

    #[validate(custom(function = "validate_explores_path"))]
    #[serde(default = "default_explores_path")]
    pub explores_path: String,

    #[validate(regex(
        path = *CONNECTION_NAME,
        message = "Looker connection may contain only letters, digits, '_' and '-'"
    ))]
    pub connection: String,
}

fn default_explores_path() -> String {
    "explores/explores.lkml".to_string()
}

#[derive(Debug, Deserialize, Serialize, Validate, Clone, PartialEq)]
pub struct StrataConfig {
    #[validate(nested)]
    pub connection: ConnectionConfig,

    #[validate(nested)]
    pub looker: LookerConfig,

    #[validate(nested)]
    #[serde(default)]
    pub model_rules: ModelRules,
}

impl StrataConfig {
    pub fn from_yaml(content: &str) -> Result<Self, InfrastructureError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Relative file paths in the config are relative to the config file.
    fn resolve_paths(&mut self, base_dir: &Path) {
        if self.connection.database != ":memory:" && Path::new(&self.connection.database).is_relative() {
            self.connection.database = base_dir
                .join(&self.connection.database)
                .to_string_lossy()
                .into_owned();
        }
        if self.looker.project_path.is_relative() {
            self.looker.project_path = base_dir.join(&self.looker.project_path);
        }
    }

    pub fn views_file(&self) -> PathBuf {
        self.looker.project_path.join(&self.looker.views_path)
    }

    pub fn explores_file(&self) -> PathBuf {
        self.looker.project_path.join(&self.looker.explores_path)
    }
}

fn validate_dataset_names(datasets: &[String]) -> Result<(), ValidationError> {
    match datasets.iter().find(|d| !DATASET_NAME.is_match(d)) {
        Some(bad) => Err(ValidationError::new("dataset_name").with_message(
            format!("Dataset '{bad}' may contain only letters, digits and underscores").into(),
        )),
        None => Ok(()),
    }
}

fn validate_relative(path: &str, field: &'static str) -> Result<(), ValidationError> {
    if path.trim().is_empty() {
        return Err(ValidationError::new("empty_path").with_message(format!("{field} cannot be empty").into()));
    }
    if Path::new(path).is_absolute() {
        return Err(ValidationError::new("absolute_path")
            .with_message(format!("{field} must be relative to looker.project_path").into()));
    }
    Ok(())
}

fn validate_views_path(path: &str) -> Result<(), ValidationError> {
    validate_relative(path, "views_path")?;
    if !path.ends_with(".view.lkml") {
        return Err(ValidationError::new("views_extension")
            .with_message("views_path must end with '.view.lkml'".into()));
    }
    Ok(())
}

fn validate_explores_path(path: &str) -> Result<(), ValidationError> {
    validate_relative(path, "explores_path")?;
    if !path.ends_with(".lkml") {
        return Err(ValidationError::new("explores_extension")
            .with_message("explores_path must end with '.lkml'".into()));
    }
    Ok(())
}

// --- LOADER ---

/// Loads, overrides and validates the configuration.
///
/// `location` may be the config file itself or the directory holding it.
#[instrument]
pub fn load_config(location: &Path) -> Result<StrataConfig, InfrastructureError> {
    let config_path = if location.is_dir() {
        find_main_config(location)?
    } else if location.exists() {
        location.to_path_buf()
    } else {
        return Err(InfrastructureError::ConfigNotFound(location.display().to_string()));
    };
    info!(path = ?config_path, "Loading project configuration");

    let content = fs::read_to_string(&config_path)?;
    let mut config = StrataConfig::from_yaml(&content)?;

    apply_env_overrides(&mut config);

    let base_dir = config_path.parent().unwrap_or_else(|| Path::new("."));
    config.resolve_paths(base_dir);

    config.validate()?;
    Ok(config)
}

pub fn find_main_config(root: &Path) -> Result<PathBuf, InfrastructureError> {
    for filename in CONFIG_CANDIDATES {
        let p = root.join(filename);
        if p.exists() {
            return Ok(p);
        }
    }
    Err(InfrastructureError::ConfigNotFound(format!(
        "{} (checked {:?})",
        root.display(),
        CONFIG_CANDIDATES
    )))
}

fn apply_env_overrides(config: &mut StrataConfig) {
    if let Ok(val) = std::env::var("STRATA_PROJECT_PATH") {
        info!(old = ?config.looker.project_path, new = ?val, "Overriding Looker project path via ENV");
        config.looker.project_path = PathBuf::from(val);
    }
    if let Ok(val) = std::env::var("STRATA_DATABASE") {
        info!(old = ?config.connection.database, new = ?val, "Overriding database via ENV");
        config.connection.database = val;
    }
}
