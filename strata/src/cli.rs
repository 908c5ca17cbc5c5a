// strata/src/cli.rs
//
// Single source of truth for all CLI definitions (Clap structs).

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "strata")]
#[command(about = "Warehouse metadata to LookML views and explores", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 🏗️  Reads the warehouse catalog and writes LookML views and explores
    Generate {
        /// Config file, or the directory holding strata.yaml
        #[arg(long, short, default_value = ".")]
        config: PathBuf,

        /// Print the assembled project as JSON instead of writing files
        #[arg(long)]
        dry_run: bool,
    },

    /// 📝 Writes a default strata.yaml
    Init {
        /// Directory to create the file in
        #[arg(long, default_value = ".")]
        path: PathBuf,

        /// Overwrite an existing strata.yaml
        #[arg(long)]
        force: bool,
    },

    /// 🔍 Lists discovered tables and how each column is classified
    Inspect {
        /// Config file, or the directory holding strata.yaml
        #[arg(long, short, default_value = ".")]
        config: PathBuf,
    },
}
