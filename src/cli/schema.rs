//! Show the property schema of a component type.
//!
//! ```bash
//! extgen schema Module
//! extgen schema plugin --core-version 7
//! ```
//!
//! # Output Format
//!
//! ```text
//! Module
//! ├── root_name (scalar) [primary, required]
//! ├── readable_name (scalar) [default]
//! ├── permissions (compound) -> Permission
//! │   └── <Permission> deferred
//! └── test_modules (compound) -> TestModule
//!     └── <TestModule> deferred
//! ```
//!
//! Compound properties whose children come from another type's schema are
//! shown by name instead of expanded, since those schemas can refer back to
//! the type being shown.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::fmt::Write as _;

use super::common::CliConfig;
use crate::components;
use crate::schema::{ChildSchema, PropertyDefinition, PropertyFormat, PropertyList, SchemaIntrospector};

/// Arguments of `extgen schema`.
#[derive(Args, Debug)]
pub struct SchemaCommand {
    /// Component type to show (case of the first letter is ignored)
    component_type: String,

    /// Target core version (overrides the configuration)
    #[arg(long, value_name = "N")]
    core_version: Option<u32>,
}

impl SchemaCommand {
    /// Run the command.
    pub async fn execute(self, cli: &CliConfig) -> Result<()> {
        let config = cli.generator_config(self.core_version).await?;
        let schemas = SchemaIntrospector::new(std::sync::Arc::new(components::resolver(config.core_version)));
        print!("{}", render_schema(&schemas, &self.component_type)?);
        Ok(())
    }
}

/// Render the schema tree of `component_type`.
pub fn render_schema(schemas: &SchemaIntrospector, component_type: &str) -> Result<String> {
    let properties = schemas.property_schema(component_type)?;
    let mut out = String::new();
    writeln!(out, "{}", schemas.types().resolve(component_type).bold())?;
    render_list(&mut out, &properties, "")?;
    Ok(out)
}

fn render_list(out: &mut String, properties: &PropertyList, prefix: &str) -> Result<()> {
    let count = properties.len();
    for (index, property) in properties.iter().enumerate() {
        let last = index + 1 == count;
        let (branch, indent) = if last { ("└── ", "    ") } else { ("├── ", "│   ") };
        writeln!(out, "{prefix}{}{}", branch.bright_black(), describe(property))?;

        let child_prefix = format!("{prefix}{indent}");
        match &property.format {
            PropertyFormat::Compound(ChildSchema::Inline(children)) => {
                render_list(out, children, &child_prefix)?;
            }
            PropertyFormat::Compound(ChildSchema::Deferred {
                component_type,
                removed,
            }) => {
                let mut line = format!("<{component_type}> deferred");
                if !removed.is_empty() {
                    write!(line, ", without: {}", removed.join(", "))?;
                }
                writeln!(out, "{child_prefix}{}{}", "└── ".bright_black(), line.cyan())?;
            }
            PropertyFormat::Mutable {
                discriminator,
                variants,
            } => {
                let variant_count = variants.len();
                for (position, (variant, children)) in variants.iter().enumerate() {
                    let last_variant = position + 1 == variant_count;
                    let (branch, indent) = if last_variant { ("└── ", "    ") } else { ("├── ", "│   ") };
                    writeln!(
                        out,
                        "{child_prefix}{}{}",
                        branch.bright_black(),
                        format!("{discriminator} = {variant}").cyan()
                    )?;
                    render_list(out, children, &format!("{child_prefix}{indent}"))?;
                }
            }
            _ => {}
        }
    }
    Ok(())
}

fn describe(property: &PropertyDefinition) -> String {
    let mut line = format!("{} ({})", property.name.bright_white(), property.format.name());
    if let Some(component_type) = &property.component_type {
        write!(line, " -> {}", component_type.cyan()).ok();
    }

    let mut flags = Vec::new();
    if property.primary {
        flags.push("primary".to_string());
    }
    if property.required {
        flags.push("required".to_string());
    }
    if property.default.is_some() {
        flags.push("default".to_string());
    }
    if property.computed {
        flags.push("computed".to_string());
    }
    if property.internal {
        flags.push("internal".to_string());
    }
    if let Some(acquired) = &property.acquired {
        match &acquired.from {
            Some(source) => flags.push(format!("acquired from {source}")),
            None => flags.push("acquired".to_string()),
        }
    }
    if let Some(presets) = &property.presets {
        let names: Vec<&str> = presets.keys().map(String::as_str).collect();
        flags.push(format!("presets: {}", names.join("|")));
    }
    if let Some(options) = &property.options {
        flags.push(format!("options: {}", options.join("|")));
    }
    if !flags.is_empty() {
        write!(line, " {}", format!("[{}]", flags.join(", ")).yellow()).ok();
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn render(component_type: &str) -> String {
        colored::control::set_override(false);
        let schemas = SchemaIntrospector::new(Arc::new(components::resolver(10)));
        render_schema(&schemas, component_type).unwrap()
    }

    #[test]
    fn test_module_schema_shows_deferred_test_modules() {
        let out = render("module");
        assert!(out.starts_with("Module\n"), "{out}");
        assert!(out.contains("├── root_name (scalar) [primary, required]"), "{out}");
        assert!(out.contains("test_modules (compound) -> TestModule"), "{out}");
        assert!(out.contains("└── <TestModule> deferred\n"), "{out}");
    }

    #[test]
    fn test_presets_are_listed() {
        let out = render("Plugin");
        assert!(out.contains("presets: block|queue_worker|field_formatter"), "{out}");
    }

    #[test]
    fn test_unknown_type() {
        let schemas = SchemaIntrospector::new(Arc::new(components::resolver(10)));
        let err = render_schema(&schemas, "Modul").unwrap_err();
        assert!(err.to_string().contains("Modul"));
    }
}
