//! YAML files assembled from fragments.
//!
//! Components that contribute to a YAML file (permissions, routes, services)
//! render a one-entry YAML mapping with content type `yaml`; the containing
//! [`YamlFile`] parses and merges them in order, optionally wrapping the
//! result under a parent key.

use anyhow::{Context, Result as AnyResult};
use serde_yaml::{Mapping, Value as Yaml};

use crate::component::{ChildContents, Component, FileInfo};
use crate::constants::TOKEN_NEAREST_ROOT;
use crate::core::{ComponentData, Result, get_str};
use crate::schema::{PropertyDefinition, PropertyList, SchemaIntrospector};

/// Content type of YAML fragments.
pub const YAML_CONTENT: &str = "yaml";

/// A YAML file.
#[derive(Debug)]
pub struct YamlFile {
    data: ComponentData,
}

impl YamlFile {
    /// Build from prepared data.
    pub fn build(data: ComponentData) -> Box<dyn Component> {
        Box::new(Self {
            data,
        })
    }

    fn filename(&self) -> &str {
        get_str(&self.data, "filename").unwrap_or_default()
    }
}

/// Schema of [`YamlFile`].
pub fn yaml_file_schema(_schemas: &SchemaIntrospector) -> Result<PropertyList> {
    Ok(PropertyList::new()
        .with(PropertyDefinition::scalar("filename").primary().required())
        .with(
            PropertyDefinition::scalar("parent_key")
                .describe("Wrap all entries under this top-level key"),
        ))
}

impl Component for YamlFile {
    data_accessors!();

    fn merge_tag(&self) -> Option<String> {
        Some(self.filename().to_string())
    }

    fn containing_component(&self) -> Option<String> {
        Some(TOKEN_NEAREST_ROOT.to_string())
    }

    fn contents(&self, children: &ChildContents) -> AnyResult<Vec<String>> {
        let mut entries = Mapping::new();
        for fragment in children.get(YAML_CONTENT) {
            let parsed = parse_mapping(fragment).context("Invalid YAML fragment")?;
            merge_mappings(&mut entries, parsed);
        }
        if entries.is_empty() {
            return Ok(Vec::new());
        }

        let document = match get_str(&self.data, "parent_key") {
            Some(key) => {
                let mut wrapped = Mapping::new();
                wrapped.insert(Yaml::from(key), Yaml::Mapping(entries));
                wrapped
            }
            None => entries,
        };
        Ok(vec![serde_yaml::to_string(&document)?])
    }

    fn file_info(&self, contents: &[String]) -> Option<FileInfo> {
        if contents.is_empty() {
            return None;
        }
        Some(FileInfo::new(self.filename(), contents.to_vec()).mergeable())
    }

    fn merge_with_existing(&self, existing: &str, generated: &str) -> AnyResult<Option<String>> {
        merge_yaml(existing, generated).map(Some)
    }
}

/// Render a single-entry mapping as a YAML fragment.
pub fn yaml_fragment(key: impl Into<Yaml>, value: Yaml) -> AnyResult<String> {
    let mut entry = Mapping::new();
    entry.insert(key.into(), value);
    Ok(serde_yaml::to_string(&entry)?)
}

/// Merge generated YAML into existing YAML.
///
/// Nested mappings merge recursively. Generated values replace existing ones
/// at the same key; existing keys that were not generated are kept in place.
pub fn merge_yaml(existing: &str, generated: &str) -> AnyResult<String> {
    let mut base = parse_mapping(existing).context("Existing file is not a YAML mapping")?;
    let generated = parse_mapping(generated).context("Generated content is not a YAML mapping")?;
    merge_mappings(&mut base, generated);
    Ok(serde_yaml::to_string(&base)?)
}

fn parse_mapping(text: &str) -> AnyResult<Mapping> {
    match serde_yaml::from_str::<Yaml>(text)? {
        Yaml::Mapping(mapping) => Ok(mapping),
        Yaml::Null => Ok(Mapping::new()),
        other => anyhow::bail!("expected a mapping, found {other:?}"),
    }
}

fn merge_mappings(base: &mut Mapping, incoming: Mapping) {
    for (key, value) in incoming {
        let Yaml::Mapping(nested) = value else {
            base.insert(key, value);
            continue;
        };
        if let Some(Yaml::Mapping(existing)) = base.get_mut(&key) {
            merge_mappings(existing, nested);
            continue;
        }
        base.insert(key, Yaml::Mapping(nested));
    }
}
