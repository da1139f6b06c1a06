//! `README.md`.

use anyhow::Result as AnyResult;

use crate::component::{ChildContents, Component, FileInfo};
use crate::constants::TOKEN_REQUESTER;
use crate::core::{ComponentData, Result, get_str};
use crate::schema::{PropertyDefinition, PropertyList, SchemaIntrospector};

/// The extension's README, requested by the root's `readme` flag.
#[derive(Debug)]
pub struct Readme {
    data: ComponentData,
}

impl Readme {
    /// Build from prepared data.
    pub fn build(data: ComponentData) -> Box<dyn Component> {
        Box::new(Self {
            data,
        })
    }
}

/// Schema of [`Readme`].
pub fn readme_schema(_schemas: &SchemaIntrospector) -> Result<PropertyList> {
    Ok(PropertyList::new()
        .with(PropertyDefinition::scalar("readable_name").acquired())
        .with(PropertyDefinition::scalar("short_description").acquired()))
}

impl Component for Readme {
    data_accessors!();

    fn containing_component(&self) -> Option<String> {
        Some(TOKEN_REQUESTER.to_string())
    }

    fn contents(&self, _children: &ChildContents) -> AnyResult<Vec<String>> {
        let title = get_str(&self.data, "readable_name").unwrap_or("%readable");
        let mut lines = vec![format!("# {title}"), String::new()];
        if let Some(description) = get_str(&self.data, "short_description") {
            lines.push(description.to_string());
            lines.push(String::new());
        }
        lines.push("## Installation".to_string());
        lines.push(String::new());
        lines.push("Enable the module with `drush en %module`.".to_string());
        Ok(lines)
    }

    fn file_info(&self, contents: &[String]) -> Option<FileInfo> {
        Some(FileInfo::new("README.md", contents.to_vec()))
    }
}
