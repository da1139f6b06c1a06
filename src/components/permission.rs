//! Permissions, rendered into `<module>.permissions.yml`.

use anyhow::Result as AnyResult;
use indexmap::IndexMap;
use serde_json::json;
use serde_yaml::{Mapping, Value as Yaml};

use super::request;
use super::yaml::{YAML_CONTENT, yaml_fragment};
use crate::component::{ChildContents, Component};
use crate::constants::TYPE_KEY;
use crate::core::{ComponentData, Result, get_str, is_truthy};
use crate::schema::{PropertyDefinition, PropertyList, SchemaIntrospector};
use crate::utils::sentence;

/// One permission. Deduplicated by machine name, so routes that require a
/// permission merge into the one the module declares.
#[derive(Debug)]
pub struct Permission {
    data: ComponentData,
}

impl Permission {
    /// Build from prepared data.
    pub fn build(data: ComponentData) -> Box<dyn Component> {
        Box::new(Self {
            data,
        })
    }
}

/// Schema of [`Permission`].
///
/// The title has no prepared default: a route asking for a permission by name
/// must not conflict with the title the module gives it.
pub fn permission_schema(_schemas: &SchemaIntrospector) -> Result<PropertyList> {
    Ok(PropertyList::new()
        .with(PropertyDefinition::scalar("permission").label("Machine name").primary().required())
        .with(PropertyDefinition::scalar("title"))
        .with(PropertyDefinition::scalar("description"))
        .with(PropertyDefinition::boolean("restrict_access")))
}

impl Component for Permission {
    data_accessors!();

    fn merge_tag(&self) -> Option<String> {
        get_str(&self.data, "permission").map(str::to_string)
    }

    fn containing_component(&self) -> Option<String> {
        Some("%self:permissions_file".to_string())
    }

    fn required_components(&self) -> Result<IndexMap<String, ComponentData>> {
        Ok(IndexMap::from([(
            "permissions_file".to_string(),
            request(json!({TYPE_KEY: "YamlFile", "filename": "%module.permissions.yml"})),
        )]))
    }

    fn content_type(&self) -> &str {
        YAML_CONTENT
    }

    fn contents(&self, _children: &ChildContents) -> AnyResult<Vec<String>> {
        let permission = get_str(&self.data, "permission").unwrap_or_default();
        let title = get_str(&self.data, "title").map(str::to_string).unwrap_or_else(|| sentence(permission));

        let mut entry = Mapping::new();
        entry.insert(Yaml::from("title"), Yaml::from(title));
        if let Some(description) = get_str(&self.data, "description") {
            entry.insert(Yaml::from("description"), Yaml::from(description));
        }
        if self.data.get("restrict_access").is_some_and(is_truthy) {
            entry.insert(Yaml::from("restrict access"), Yaml::Bool(true));
        }

        Ok(vec![yaml_fragment(permission, Yaml::Mapping(entry))?])
    }
}
