use anyhow::Result;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

const CONFIG: &str = r#"
connection:
  engine: snapshot
  database: metadata.yaml
  datasets: [shop]
looker:
  project_path: ./looker
  views_path: views/shop.view.lkml
  explores_path: explores/shop.explores.lkml
  connection: shop-warehouse
model_rules:
  defaults:
    auto_measures: true
  type_mapping:
    - { warehouse_type: STRING, target: dimension, params: { type: string } }
    - { bq_type: INT64, lookml_type: dimension, lookml_params: { type: number } }
    - { warehouse_type: NUMERIC, target: dimension, params: { type: number } }
"#;

const METADATA: &str = r#"
project_id: acme
tables:
  - dataset: shop
    table: orders
    description: Customer orders
    columns:
      - { name: order_pk, type: INT64, primary_key: true }
      - { name: customer_fk, type: INT64 }
      - { name: order_amount, type: "NUMERIC(12,2)" }
      - { name: status, type: STRING }
      - { name: ordered_at, type: TIMESTAMP }
      - { name: location, type: GEOGRAPHY }
  - dataset: shop
    table: customers
    columns:
      - { name: customer_pk, type: INT64 }
      - { name: name, type: STRING }
"#;

/// A throwaway project directory with a snapshot-backed configuration.
struct StrataTestEnv {
    _tmp: TempDir,
    root: PathBuf,
}

impl StrataTestEnv {
    fn new() -> Result<Self> {
        let tmp = tempfile::tempdir()?;
        let root = tmp.path().to_path_buf();
        fs::write(root.join("strata.yaml"), CONFIG)?;
        fs::write(root.join("metadata.yaml"), METADATA)?;
        Ok(Self { _tmp: tmp, root })
    }

    fn strata(&self) -> Command {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("strata"));
        cmd.current_dir(&self.root)
            .env_remove("STRATA_PROJECT_PATH")
            .env_remove("STRATA_DATABASE")
            .env("RUST_LOG", "warn");
        cmd
    }

    fn path(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }
}

fn read(path: &Path) -> Result<String> {
    Ok(fs::read_to_string(path)?)
}

#[test]
fn test_generate_writes_views_and_explores() -> Result<()> {
    let env = StrataTestEnv::new()?;

    env.strata()
        .arg("generate")
        .assert()
        .success()
        .stdout(predicate::str::contains("snapshot"))
        .stdout(predicate::str::contains("shop.view.lkml"));

    let views = read(&env.path("looker/views/shop.view.lkml"))?;
    assert!(views.starts_with("# Generated by strata at "));
    assert!(views.contains("view: orders {"));
    assert!(views.contains("sql_table_name: `acme.shop.orders` ;;"));
    assert!(views.contains("dimension_group: ordered {"));
    assert!(views.contains("measure: total_order_amount {"));
    assert!(views.contains("value_format_name: usd"));
    // No mapping for GEOGRAPHY.
    assert!(!views.contains("location"));

    let explores = read(&env.path("looker/explores/shop.explores.lkml"))?;
    assert!(explores.contains("connection: \"shop-warehouse\""));
    assert!(explores.contains("include: \"/views/shop.view.lkml\""));
    assert!(explores.contains("explore: orders_with_customers {"));
    assert!(explores.contains("sql_on: ${orders}.customer_fk = ${customers}.customer_pk ;;"));
    Ok(())
}

#[test]
fn test_unmapped_type_is_reported_on_stderr() -> Result<()> {
    let env = StrataTestEnv::new()?;

    env.strata()
        .arg("generate")
        .assert()
        .success()
        .stderr(predicate::str::contains("No type mapping found"))
        .stderr(predicate::str::contains("GEOGRAPHY"));
    Ok(())
}

#[test]
fn test_dry_run_prints_json_and_writes_nothing() -> Result<()> {
    let env = StrataTestEnv::new()?;

    let output = env
        .strata()
        .args(["generate", "--config", "strata.yaml", "--dry-run"])
        .output()?;
    assert!(output.status.success());

    let project: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert!(project["views"]["orders"].is_object());
    assert!(project["explores"]["orders_with_customers"].is_object());
    assert!(!env.path("looker").exists());
    Ok(())
}

#[test]
fn test_generate_without_config_fails() -> Result<()> {
    let tmp = tempfile::tempdir()?;

    Command::new(assert_cmd::cargo::cargo_bin!("strata"))
        .current_dir(tmp.path())
        .arg("generate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load configuration"));
    Ok(())
}

#[test]
fn test_init_refuses_to_overwrite_without_force() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let strata = || {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("strata"));
        cmd.current_dir(tmp.path());
        cmd
    };

    strata().arg("init").assert().success();
    let config = read(&tmp.path().join("strata.yaml"))?;
    assert!(config.contains("model_rules:"));

    strata().arg("init").assert().failure();
    strata().args(["init", "--force"]).assert().success();
    Ok(())
}

#[test]
fn test_inspect_lists_column_classification() -> Result<()> {
    let env = StrataTestEnv::new()?;

    env.strata()
        .arg("inspect")
        .assert()
        .success()
        .stdout(predicate::str::contains("acme.shop.orders"))
        .stdout(predicate::str::contains("order_pk"))
        .stdout(predicate::str::contains("pk"))
        .stdout(predicate::str::contains("dimension_group: ordered"))
        .stdout(predicate::str::contains("skipped (no type mapping)"));
    Ok(())
}
