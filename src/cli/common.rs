//! Helpers shared by the CLI commands.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::config::GeneratorConfig;
use crate::core::ComponentData;
use crate::generator::parse_spec;

/// Settings derived from the global command-line flags.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Log level used when `RUST_LOG` is not set
    pub log_level: String,

    /// Suppress everything but errors
    pub quiet: bool,

    /// Explicit configuration file path (`--config`)
    pub config_path: Option<PathBuf>,
}

impl CliConfig {
    /// Load the generator configuration, applying a `--core-version` override.
    pub async fn generator_config(&self, core_version: Option<u32>) -> Result<GeneratorConfig> {
        let mut config = GeneratorConfig::load(self.config_path.clone()).await?;
        if let Some(version) = core_version {
            config.core_version = version;
        }
        tracing::debug!("Generating for core version {}", config.core_version);
        Ok(config)
    }
}

/// Read and parse a specification file.
pub async fn read_spec(path: &Path) -> Result<ComponentData> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read specification {}", path.display()))?;
    Ok(parse_spec(path, &content)?)
}
