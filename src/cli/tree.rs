//! Show the request tree a specification expands into.
//!
//! Nothing is written: the specification is expanded, containment is derived,
//! and every component is shown under the component that requested it, with
//! the component it renders into.
//!
//! # Examples
//!
//! ```bash
//! extgen tree my_module.yml
//! extgen tree my_module.yml --format json
//! ```
//!
//! # Output Format
//!
//! ```text
//! root: Module
//! ├── permission_0: Permission (in root/permission_0/permissions_file)
//! │   └── permissions_file: YamlFile (in root)
//! ├── router_item_0: RouterItem (in root/router_item_0/routing_file)
//! │   ├── routing_file: YamlFile (in root)
//! │   └── access_permission => root/permission_0
//! └── info: InfoFile (in root)
//! ```
//!
//! A `=>` entry is a request that was merged into a component registered
//! elsewhere in the tree.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use serde_json::json;
use std::fmt::Write as _;
use std::path::PathBuf;

use super::common::{CliConfig, read_spec};
use crate::collection::{ComponentCollection, ComponentId};
use crate::generator::Generator;

/// Arguments of `extgen tree`.
#[derive(Args, Debug)]
pub struct TreeCommand {
    /// Specification file (YAML, or JSON with a .json extension)
    spec: PathBuf,

    /// Output format (tree, json)
    #[arg(short, long, default_value = "tree", value_parser = ["tree", "json"])]
    format: String,

    /// Target core version (overrides the configuration)
    #[arg(long, value_name = "N")]
    core_version: Option<u32>,
}

impl TreeCommand {
    /// Run the command.
    pub async fn execute(self, cli: &CliConfig) -> Result<()> {
        let config = cli.generator_config(self.core_version).await?;
        let spec = read_spec(&self.spec).await?;
        let mut collection = Generator::from_config(&config).collect(spec)?;
        collection.derive_containment_tree()?;

        if self.format == "json" {
            println!("{}", serde_json::to_string_pretty(&tree_json(&collection))?);
        } else {
            print!("{}", render_tree(&collection)?);
        }
        Ok(())
    }
}

fn container_path(collection: &ComponentCollection, id: ComponentId) -> Option<&str> {
    let tree = collection.containment_tree()?;
    tree.parent(id).map(|parent| collection.request_path(parent))
}

/// Render the request tree as text.
pub fn render_tree(collection: &ComponentCollection) -> Result<String> {
    let mut out = String::new();
    let Some(root) = collection.root() else {
        return Ok(out);
    };
    writeln!(out, "{}: {}", collection.local_name(root).bold(), collection.concrete_type(root).cyan())?;
    render_children(&mut out, collection, root, "")?;
    Ok(out)
}

fn render_children(
    out: &mut String,
    collection: &ComponentCollection,
    requester: ComponentId,
    prefix: &str,
) -> Result<()> {
    let children = collection.local_children(requester);
    let count = children.len();
    for (index, (name, child)) in children.into_iter().enumerate() {
        let last = index + 1 == count;
        let (branch, indent) = if last { ("└── ", "    ") } else { ("├── ", "│   ") };

        if !is_owned(collection, requester, name, child) {
            writeln!(
                out,
                "{prefix}{}{} => {}",
                branch.bright_black(),
                name,
                collection.request_path(child).bright_black()
            )?;
            continue;
        }

        let mut line = format!("{}: {}", name.bright_white(), collection.concrete_type(child).cyan());
        if let Some(container) = container_path(collection, child) {
            write!(line, " {}", format!("(in {container})").bright_black())?;
        }
        if collection.is_root(child) {
            write!(line, " {}", "[root]".yellow())?;
        }
        writeln!(out, "{prefix}{}{line}", branch.bright_black())?;
        render_children(out, collection, child, &format!("{prefix}{indent}"))?;
    }
    Ok(())
}

/// Whether `child` was registered under this name, as opposed to being an
/// alias for a component registered elsewhere.
fn is_owned(collection: &ComponentCollection, requester: ComponentId, name: &str, child: ComponentId) -> bool {
    collection.requester(child) == Some(requester) && collection.local_name(child) == name
}

/// Every component with its relationships, in registration order.
pub fn tree_json(collection: &ComponentCollection) -> serde_json::Value {
    let components: Vec<_> = collection
        .ids()
        .map(|id| {
            let aliases: Vec<String> = collection
                .ids()
                .flat_map(|requester| {
                    collection
                        .local_children(requester)
                        .into_iter()
                        .filter(|(name, child)| *child == id && !is_owned(collection, requester, name, id))
                        .map(|(name, _)| format!("{}/{name}", collection.request_path(requester)))
                        .collect::<Vec<_>>()
                })
                .collect();
            json!({
                "path": collection.request_path(id),
                "type": collection.concrete_type(id),
                "local_name": collection.local_name(id),
                "requester": collection.requester(id).map(|r| collection.request_path(r)),
                "container": container_path(collection, id),
                "is_root": collection.is_root(id),
                "aliases": aliases,
            })
        })
        .collect();
    json!({ "components": components })
}
