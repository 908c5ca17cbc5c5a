// strata/src/commands/init.rs
//
// USE CASE: Scaffold a default strata.yaml.

use anyhow::Context;
use std::path::Path;

use strata_core::infrastructure::config::write_default_config;

pub fn execute(path: &Path, force: bool) -> anyhow::Result<()> {
    let written = write_default_config(path, force)
        .with_context(|| format!("Could not initialise a project in {}", path.display()))?;

    println!("✨ Configuration written to {}", written.display());
    println!("👉 Point `connection.database` at your warehouse, then run 'strata generate'.");
    Ok(())
}
