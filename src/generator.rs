//! One generation run, end to end.
//!
//! The [`Generator`] owns the type resolver and schema cache for a run's
//! configuration and wires the collector and the assembler together:
//!
//! ```rust,no_run
//! use extgen_cli::assembler::EmptyExtension;
//! use extgen_cli::components;
//! use extgen_cli::generator::{Generator, parse_spec};
//! use std::path::Path;
//!
//! # fn example() -> anyhow::Result<()> {
//! let spec = parse_spec(Path::new("foo.yml"), "base: module\nroot_name: foo\n")?;
//! let files = Generator::new(components::resolver(10)).generate(spec, &EmptyExtension)?;
//! for (path, file) in &files {
//!     println!("{path}: {} bytes", file.content.len());
//! }
//! # Ok(())
//! # }
//! ```

use std::path::Path;
use std::sync::Arc;

use serde_json::Value;

use crate::assembler::{ExistingExtension, FileAssembler, GeneratedFiles};
use crate::collection::ComponentCollection;
use crate::collector::ComponentCollector;
use crate::components;
use crate::config::GeneratorConfig;
use crate::constants::{DEFAULT_MAX_EXPANSION_DEPTH, ROOT_LOCAL_NAME};
use crate::core::{ComponentData, ExtgenError, Result, value_kind};
use crate::schema::SchemaIntrospector;
use crate::types::TypeResolver;

/// Runs specifications through expansion and assembly.
pub struct Generator {
    schemas: SchemaIntrospector,
    max_depth: usize,
}

impl Generator {
    /// A generator over the given component types.
    pub fn new(types: TypeResolver) -> Self {
        Self {
            schemas: SchemaIntrospector::new(Arc::new(types)),
            max_depth: DEFAULT_MAX_EXPANSION_DEPTH,
        }
    }

    /// A generator over the built-in library, configured from `config`.
    pub fn from_config(config: &GeneratorConfig) -> Self {
        Self::new(components::resolver(config.core_version)).with_max_depth(config.max_expansion_depth)
    }

    /// Limit the request depth.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// The component types this generator knows.
    pub fn types(&self) -> &TypeResolver {
        self.schemas.types()
    }

    /// The schema cache.
    pub fn schemas(&self) -> &SchemaIntrospector {
        &self.schemas
    }

    /// Expand a specification into a collection without assembling it.
    pub fn collect(&self, spec: ComponentData) -> Result<ComponentCollection> {
        ComponentCollector::new(&self.schemas).with_max_depth(self.max_depth).collect(spec)
    }

    /// Expand and assemble a specification against an existing extension.
    pub fn generate(&self, spec: ComponentData, extension: &dyn ExistingExtension) -> Result<GeneratedFiles> {
        let mut collection = self.collect(spec)?;
        FileAssembler::new(extension).assemble(&mut collection)
    }
}

/// Parse a YAML or JSON specification. JSON is chosen by a `.json`
/// extension; anything else is read as YAML.
pub fn parse_spec(path: &Path, content: &str) -> Result<ComponentData> {
    let is_json = path.extension().is_some_and(|extension| extension.eq_ignore_ascii_case("json"));
    let parsed: std::result::Result<Value, String> = if is_json {
        serde_json::from_str(content).map_err(|e| e.to_string())
    } else {
        serde_yaml::from_str(content).map_err(|e| e.to_string())
    };

    let value = parsed.map_err(|reason| ExtgenError::SpecParseError {
        path: path.display().to_string(),
        reason,
    })?;
    match value {
        Value::Object(spec) => Ok(spec),
        other => Err(ExtgenError::InvalidComponentData {
            local_name: ROOT_LOCAL_NAME.to_string(),
            found: value_kind(&other).to_string(),
        }),
    }
}
