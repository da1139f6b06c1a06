//! Command-line interface for extgen.
//!
//! # Commands
//!
//! - `generate` - Expand a specification and write the extension files
//! - `types` - List the registered component types
//! - `schema` - Show the property schema of a component type
//! - `tree` - Show how a specification expands, without writing anything
//!
//! # Global Options
//!
//! - `--verbose` / `-v` - Debug logging
//! - `--quiet` / `-q` - Errors only
//! - `--config` / `-c` - Path to the generator configuration file
//!
//! # Examples
//!
//! ```bash
//! # Generate into ./my_module
//! extgen generate my_module.yml
//!
//! # Preview what would be written into an existing module
//! extgen generate my_module.yml --output web/modules/custom/my_module --dry-run
//!
//! # Inspect the component library
//! extgen types
//! extgen schema Module
//! ```

mod common;
mod generate;
mod schema;
mod tree;
mod types;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use common::CliConfig;

/// Extension code generator.
#[derive(Parser, Debug)]
#[command(
    name = "extgen",
    about = "Extension code generator - expand feature specs into extension files",
    version,
    long_about = "extgen resolves a declarative feature specification into the components it needs \
                  (info files, permissions, hooks, plugins, services, routes) and assembles them \
                  into the files of an extension, merging with files that already exist."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only print errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Path to the generator configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate extension files from a specification
    Generate(generate::GenerateCommand),

    /// List registered component types
    Types(types::TypesCommand),

    /// Show the property schema of a component type
    Schema(schema::SchemaCommand),

    /// Show the request tree a specification expands into
    Tree(tree::TreeCommand),
}

impl Cli {
    /// Run the selected command.
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        self.execute_with_config(config).await
    }

    /// Settings derived from the global flags.
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "warn"
        };

        CliConfig {
            log_level: log_level.to_string(),
            quiet: self.quiet,
            config_path: self.config.clone(),
        }
    }

    /// Run the selected command with explicit settings.
    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        match self.command {
            Commands::Generate(cmd) => cmd.execute(&config).await,
            Commands::Types(cmd) => cmd.execute(&config).await,
            Commands::Schema(cmd) => cmd.execute(&config).await,
            Commands::Tree(cmd) => cmd.execute(&config).await,
        }
    }
}
