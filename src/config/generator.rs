//! Generator configuration file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::constants::{DEFAULT_CORE_VERSION, DEFAULT_MAX_EXPANSION_DEPTH};
use crate::core::ExtgenError;

/// Environment variable naming the configuration file.
pub const CONFIG_PATH_ENV: &str = "EXTGEN_CONFIG";

/// Environment variable overriding `core_version`.
pub const CORE_VERSION_ENV: &str = "EXTGEN_CORE_VERSION";

/// Settings for generation runs.
///
/// ```toml
/// core_version = 10
/// max_expansion_depth = 64
/// output_dir = "web/modules/custom"
/// overwrite_existing = false
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Major version of the target framework, used to pick version
    /// specialized component types.
    pub core_version: u32,

    /// Maximum request depth before expansion is aborted.
    pub max_expansion_depth: usize,

    /// Directory new extensions are generated into when no `--output` is
    /// given. Relative paths resolve against the working directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,

    /// Overwrite existing files that cannot be merged instead of skipping
    /// them.
    pub overwrite_existing: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            core_version: DEFAULT_CORE_VERSION,
            max_expansion_depth: DEFAULT_MAX_EXPANSION_DEPTH,
            output_dir: None,
            overwrite_existing: false,
        }
    }
}

impl GeneratorConfig {
    /// Load from an explicit path, `$EXTGEN_CONFIG`, or the default location,
    /// in that order. A missing file yields the defaults.
    ///
    /// `$EXTGEN_CORE_VERSION` is applied on top of whatever was loaded.
    pub async fn load(path: Option<PathBuf>) -> Result<Self> {
        let path = path
            .or_else(|| std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from))
            .or_else(|| Self::default_path().ok());

        let mut config = match path {
            Some(path) if path.exists() => Self::load_from(&path).await?,
            Some(path) => {
                tracing::debug!("No configuration at {}, using defaults", path.display());
                Self::default()
            }
            None => Self::default(),
        };
        config.apply_env()?;
        Ok(config)
    }

    /// Load from a specific file.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read configuration from {}", path.display()))?;

        let config: Self = toml::from_str(&content).map_err(|e| ExtgenError::ConfigError {
            message: format!("{}: {}", path.display(), e.message()),
        })?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// `~/.extgen/config.toml`.
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Unable to determine home directory"))?;
        Ok(home.join(".extgen").join("config.toml"))
    }

    fn apply_env(&mut self) -> Result<()> {
        let Ok(value) = std::env::var(CORE_VERSION_ENV) else {
            return Ok(());
        };
        self.core_version = value.trim().parse().map_err(|_| ExtgenError::ConfigError {
            message: format!("{CORE_VERSION_ENV} must be a number, got '{value}'"),
        })?;
        Ok(())
    }
}
