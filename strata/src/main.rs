// strata/src/main.rs

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG=debug strata generate ... for details.
    // Logs go to stderr so that `--dry-run` output stays parseable.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate { config, dry_run } => commands::generate::execute(&config, dry_run).await,
        Commands::Init { path, force } => commands::init::execute(&path, force),
        Commands::Inspect { config } => commands::inspect::execute(&config).await,
    }
}
