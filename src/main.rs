//! extgen CLI entry point
//!
//! Parses the command line, sets up logging, runs the command and prints
//! failures through [`user_friendly_error`].
//!
//! Commands:
//! - `generate` - Expand a specification into extension files
//! - `types` - List registered component types
//! - `schema` - Show the property schema of a component type
//! - `tree` - Show the request tree of a specification

use anyhow::Result;
use clap::Parser;
use extgen_cli::cli;
use extgen_cli::core::error::user_friendly_error;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    let config = cli.build_config();

    // RUST_LOG wins over the command-line flags
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).with_target(false).init();

    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute_with_config(config).await {
        Ok(()) => Ok(()),
        Err(e) => {
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}
