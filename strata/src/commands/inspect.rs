// strata/src/commands/inspect.rs
//
// USE CASE: Show what the generator sees in the catalog, column by column.

use anyhow::Context;
use comfy_table::Table;
use std::path::Path;

use strata_core::application::{ProjectAssembler, strip_time_suffix};
use strata_core::domain::metadata::ColumnMetadata;
use strata_core::infrastructure::adapters::metadata_source;
use strata_core::infrastructure::config::load_config;

pub async fn execute(config_path: &Path) -> anyhow::Result<()> {
    let config = load_config(config_path)
        .with_context(|| format!("Failed to load configuration from {}", config_path.display()))?;
    let source = metadata_source(&config.connection).context("Failed to open metadata source")?;

    let tables = source
        .fetch_tables(&config.connection.datasets)
        .await
        .context("Failed to read the catalog")?;

    if tables.is_empty() {
        println!("⚠️  No tables found in datasets {:?}", config.connection.datasets);
        return Ok(());
    }

    let assembler = ProjectAssembler::new(&config.model_rules);
    for meta in &tables {
        println!("\n🔍 {} ({} columns)", meta.full_name(), meta.columns.len());
        if let Some(description) = &meta.description {
            println!("   {description}");
        }

        let mut table = Table::new();
        table.set_header(vec!["Column", "Warehouse type", "Key", "Hidden", "Generates"]);
        for column in &meta.columns {
            table.add_row(vec![
                column.name.clone(),
                column.warehouse_type.clone(),
                key_role(&assembler, column).to_string(),
                yes_no(assembler.classifier().should_hide(&column.name)).to_string(),
                generates(&assembler, column),
            ]);
        }
        println!("{table}");
    }
    Ok(())
}

fn key_role(assembler: &ProjectAssembler<'_>, column: &ColumnMetadata) -> &'static str {
    let classifier = assembler.classifier();
    if classifier.column_is_primary_key(column) {
        "pk"
    } else if classifier.column_is_foreign_key(column) {
        "fk"
    } else {
        ""
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "" }
}

fn generates(assembler: &ProjectAssembler<'_>, column: &ColumnMetadata) -> String {
    if column.is_time_group_type() {
        return format!("dimension_group: {}", strip_time_suffix(&column.name));
    }
    match assembler.mapper().resolve(&column.warehouse_type) {
        Some(rule) => match rule.params.field_type.as_deref() {
            Some(t) => format!("{} ({t})", rule.target.as_str()),
            None => rule.target.as_str().to_string(),
        },
        None => "skipped (no type mapping)".to_string(),
    }
}
