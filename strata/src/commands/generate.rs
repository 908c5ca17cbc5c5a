// strata/src/commands/generate.rs
//
// USE CASE: Catalog -> Project -> LookML files.

use anyhow::Context;
use comfy_table::Table;
use std::path::Path;

use strata_core::application::{GenerateSummary, run_generate};
use strata_core::infrastructure::adapters::metadata_source;
use strata_core::infrastructure::config::load_config;
use strata_core::infrastructure::writer::LookmlWriter;
use strata_core::ports::ProjectWriter;

pub async fn execute(config_path: &Path, dry_run: bool) -> anyhow::Result<()> {
    let config = load_config(config_path)
        .with_context(|| format!("Failed to load configuration from {}", config_path.display()))?;

    let source = metadata_source(&config.connection).with_context(|| {
        format!(
            "Failed to open {} metadata at {}",
            config.connection.engine.as_str(),
            config.connection.database
        )
    })?;

    let writer = LookmlWriter::from_config(&config);
    let writer: Option<&dyn ProjectWriter> = if dry_run { None } else { Some(&writer) };

    let outcome = run_generate(
        source.as_ref(),
        writer,
        &config.connection.datasets,
        &config.model_rules,
    )
    .await
    .context("Generation failed")?;

    if dry_run {
        println!("{}", serde_json::to_string_pretty(&outcome.project)?);
        eprintln!("{}", summary_table(&outcome.summary));
        return Ok(());
    }

    println!("{}", summary_table(&outcome.summary));
    for file in &outcome.summary.files {
        println!("📝 {}", file.display());
    }
    if outcome.summary.tables == 0 {
        println!("⚠️  No tables found in datasets {:?}", config.connection.datasets);
    }
    Ok(())
}

fn summary_table(summary: &GenerateSummary) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Source", "Tables", "Views", "Explores", "Dimensions", "Groups", "Measures"]);
    table.add_row(vec![
        summary.source.clone(),
        summary.tables.to_string(),
        summary.views.to_string(),
        summary.explores.to_string(),
        summary.dimensions.to_string(),
        summary.dimension_groups.to_string(),
        summary.measures.to_string(),
    ]);
    table
}
