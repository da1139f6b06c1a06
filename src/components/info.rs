//! Extension info files.
//!
//! `InfoFile` renders `<module>.info.yml`. Core version 7 resolves the same
//! request to `InfoFile7`, which renders the legacy INI-style `<module>.info`.
//! Both acquire their values from the requesting root: the name through the
//! root's reverse alias, the description from `short_description`, and the
//! package and dependencies by name.

use anyhow::Result as AnyResult;
use serde_json::Value;
use serde_yaml::{Mapping, Value as Yaml};

use super::yaml::merge_yaml;
use crate::component::{ChildContents, Component, FileInfo};
use crate::constants::TOKEN_REQUESTER;
use crate::core::{ComponentData, Result, get_str, get_string_list, is_truthy};
use crate::schema::{PropertyDefinition, PropertyList, SchemaIntrospector};

fn acquired_properties() -> PropertyList {
    PropertyList::new()
        .with(PropertyDefinition::scalar("name").acquired())
        .with(PropertyDefinition::scalar("description").acquired_from("short_description"))
        .with(PropertyDefinition::scalar("package").acquired())
        .with(PropertyDefinition::list("dependencies").acquired())
}

/// Schema of [`InfoFile`].
pub fn info_schema(_schemas: &SchemaIntrospector) -> Result<PropertyList> {
    Ok(acquired_properties()
        .with(
            PropertyDefinition::scalar("core_version_requirement")
                .process_default()
                .default_value("^10 || ^11"),
        )
        .with(PropertyDefinition::boolean("hidden")))
}

/// Schema of [`InfoFile7`].
pub fn info7_schema(_schemas: &SchemaIntrospector) -> Result<PropertyList> {
    Ok(acquired_properties()
        .with(PropertyDefinition::scalar("core").process_default().default_value("7.x"))
        .with(PropertyDefinition::boolean("hidden")))
}

/// `<module>.info.yml`.
#[derive(Debug)]
pub struct InfoFile {
    data: ComponentData,
}

impl InfoFile {
    /// Build from prepared data.
    pub fn build(data: ComponentData) -> Box<dyn Component> {
        Box::new(Self {
            data,
        })
    }
}

impl Component for InfoFile {
    data_accessors!();

    fn containing_component(&self) -> Option<String> {
        Some(TOKEN_REQUESTER.to_string())
    }

    fn contents(&self, _children: &ChildContents) -> AnyResult<Vec<String>> {
        let mut info = Mapping::new();
        let mut set = |key: &str, value: Option<&str>| {
            if let Some(value) = value {
                info.insert(Yaml::from(key), Yaml::from(value));
            }
        };
        set("name", get_str(&self.data, "name"));
        set("type", Some("module"));
        set("description", get_str(&self.data, "description"));
        set("package", get_str(&self.data, "package"));
        set("core_version_requirement", get_str(&self.data, "core_version_requirement"));

        let dependencies = get_string_list(&self.data, "dependencies");
        if !dependencies.is_empty() {
            let items = dependencies.iter().map(|dependency| Yaml::from(qualified(dependency))).collect();
            info.insert(Yaml::from("dependencies"), Yaml::Sequence(items));
        }
        if self.data.get("hidden").is_some_and(is_truthy) {
            info.insert(Yaml::from("hidden"), Yaml::Bool(true));
        }

        Ok(vec![serde_yaml::to_string(&info)?])
    }

    fn file_info(&self, contents: &[String]) -> Option<FileInfo> {
        Some(FileInfo::new("%module.info.yml", contents.to_vec()).mergeable())
    }

    fn merge_with_existing(&self, existing: &str, generated: &str) -> AnyResult<Option<String>> {
        merge_yaml(existing, generated).map(Some)
    }
}

/// `node` becomes `drupal:node`; already-namespaced names are kept.
fn qualified(dependency: &str) -> String {
    if dependency.contains(':') {
        dependency.to_string()
    } else {
        format!("drupal:{dependency}")
    }
}

/// Legacy `<module>.info`.
#[derive(Debug)]
pub struct InfoFile7 {
    data: ComponentData,
}

impl InfoFile7 {
    /// Build from prepared data.
    pub fn build(data: ComponentData) -> Box<dyn Component> {
        Box::new(Self {
            data,
        })
    }
}

impl Component for InfoFile7 {
    data_accessors!();

    fn containing_component(&self) -> Option<String> {
        Some(TOKEN_REQUESTER.to_string())
    }

    fn contents(&self, _children: &ChildContents) -> AnyResult<Vec<String>> {
        let mut lines = Vec::new();
        for key in ["name", "description", "core", "package"] {
            if let Some(value) = get_str(&self.data, key) {
                lines.push(format!("{key} = {}", ini_value(value)));
            }
        }
        for dependency in get_string_list(&self.data, "dependencies") {
            let bare = dependency.rsplit(':').next().unwrap_or(&dependency);
            lines.push(format!("dependencies[] = {}", ini_value(bare)));
        }
        if self.data.get("hidden").is_some_and(is_truthy) {
            lines.push("hidden = TRUE".to_string());
        }
        Ok(lines)
    }

    fn file_info(&self, contents: &[String]) -> Option<FileInfo> {
        Some(FileInfo::new("%module.info", contents.to_vec()))
    }
}

/// Quote INI values the legacy parser would otherwise misread.
fn ini_value(value: &str) -> String {
    let needs_quotes = value.trim() != value || value.chars().any(|c| matches!(c, '=' | ';' | '"' | '[' | ']'));
    if needs_quotes {
        Value::String(value.to_string()).to_string()
    } else {
        value.to_string()
    }
}
