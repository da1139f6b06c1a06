//! Configuration for extgen.
//!
//! The only configuration file is the user-wide generator configuration,
//! `~/.extgen/config.toml` by default:
//!
//! ```toml
//! # Major version of the target framework (7 selects legacy .info files)
//! core_version = 10
//!
//! # Abort expansion beyond this request depth
//! max_expansion_depth = 64
//!
//! # Default output directory for `extgen generate`
//! output_dir = "web/modules/custom"
//!
//! # Replace existing files that cannot be merged
//! overwrite_existing = false
//! ```
//!
//! The file location can be overridden with `--config` or `$EXTGEN_CONFIG`,
//! and `$EXTGEN_CORE_VERSION` overrides `core_version`.

pub mod generator;

pub use generator::{CONFIG_PATH_ENV, CORE_VERSION_ENV, GeneratorConfig};
