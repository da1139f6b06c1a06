//! List the registered component types.
//!
//! ```bash
//! extgen types
//! extgen types --format json
//! ```
//!
//! Version specializations are listed under the type they specialize, and the
//! one that applies to the configured core version is marked.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use serde_json::json;

use super::common::CliConfig;
use crate::components;
use crate::types::TypeResolver;

/// Arguments of `extgen types`.
#[derive(Args, Debug)]
pub struct TypesCommand {
    /// Output format (text, json)
    #[arg(short, long, default_value = "text", value_parser = ["text", "json"])]
    format: String,

    /// Target core version (overrides the configuration)
    #[arg(long, value_name = "N")]
    core_version: Option<u32>,
}

impl TypesCommand {
    /// Run the command.
    pub async fn execute(self, cli: &CliConfig) -> Result<()> {
        let config = cli.generator_config(self.core_version).await?;
        let types = components::resolver(config.core_version);

        if self.format == "json" {
            println!("{}", serde_json::to_string_pretty(&types_json(&types))?);
        } else {
            print_types(&types);
        }
        Ok(())
    }
}

fn types_json(types: &TypeResolver) -> serde_json::Value {
    let entries: Vec<_> = types
        .type_families()
        .into_iter()
        .map(|(name, specializations)| {
            let description = types.kind(&name).map(|kind| kind.description).unwrap_or_default();
            json!({
                "name": name,
                "description": description,
                "resolves_to": types.resolve(&name),
                "specializations": specializations,
            })
        })
        .collect();
    json!({"core_version": types.core_version(), "types": entries})
}

fn print_types(types: &TypeResolver) {
    println!(
        "{} (core version {})",
        "Component types".bold(),
        types.core_version().to_string().yellow()
    );
    println!();

    let families = types.type_families();
    let width = families.keys().map(String::len).max().unwrap_or(0);
    for (name, specializations) in &families {
        let description = types.kind(name).map(|kind| kind.description).unwrap_or_default();
        println!("  {:<width$}  {}", name.bright_white(), description.bright_black());

        let active = types.resolve(name);
        for specialization in specializations {
            let marker = if *specialization == active {
                "(active)".green()
            } else {
                "".normal()
            };
            println!("    {} {specialization} {marker}", "└─".bright_black());
        }
    }
    println!();
    println!("{}: {} types", "Total".green().bold(), families.len());
}
