//! Routes, declared in `<module>.routing.yml`.

use anyhow::Result as AnyResult;
use indexmap::IndexMap;
use serde_json::{Value, json};
use serde_yaml::{Mapping, Value as Yaml};

use super::request;
use super::yaml::{YAML_CONTENT, yaml_fragment};
use crate::component::{ChildContents, Component};
use crate::constants::TYPE_KEY;
use crate::core::{ComponentData, Result, get_str};
use crate::schema::{PropertyDefinition, PropertyList, SchemaIntrospector};
use crate::utils::{machine_name, readable};

/// One route.
///
/// A route with a `permission` requests that permission, which merges with a
/// permission of the same name declared on the module. A route with a
/// `controller` requests the controller class.
#[derive(Debug)]
pub struct RouterItem {
    data: ComponentData,
}

impl RouterItem {
    /// Build from prepared data.
    pub fn build(data: ComponentData) -> Box<dyn Component> {
        Box::new(Self {
            data,
        })
    }

    fn path(&self) -> &str {
        get_str(&self.data, "path").unwrap_or_default()
    }
}

/// Schema of [`RouterItem`].
pub fn router_item_schema(_schemas: &SchemaIntrospector) -> Result<PropertyList> {
    Ok(PropertyList::new()
        .with(PropertyDefinition::scalar("path").primary().required().processing(|context| {
            let path = context.value.as_str().filter(|path| !path.starts_with('/')).map(|path| format!("/{path}"));
            if let Some(path) = path {
                *context.value = Value::String(path);
            }
            Ok(())
        }))
        .with(
            PropertyDefinition::scalar("route_name")
                .process_default()
                .default_with(|data| json!(route_name(get_str(data, "path").unwrap_or_default()))),
        )
        .with(PropertyDefinition::scalar("route_title").process_default().default_with(|data| {
            let path = get_str(data, "path").unwrap_or_default();
            let last = path.rsplit('/').find(|segment| !segment.is_empty() && !segment.starts_with('{'));
            json!(readable(last.unwrap_or("home")))
        }))
        .with(
            PropertyDefinition::scalar("controller")
                .describe("Controller class relative to the extension namespace"),
        )
        .with(
            PropertyDefinition::scalar("form_class")
                .describe("Form class relative to the extension namespace"),
        )
        .with(PropertyDefinition::scalar("permission").describe("Permission required for access")))
}

/// `/admin/config/foo/{id}` becomes `%module.admin_config_foo`.
fn route_name(path: &str) -> String {
    let segments: Vec<String> = path
        .split('/')
        .filter(|segment| !segment.is_empty() && !segment.starts_with('{'))
        .map(machine_name)
        .filter(|segment| !segment.is_empty())
        .collect();
    if segments.is_empty() {
        "%module.page".to_string()
    } else {
        format!("%module.{}", segments.join("_"))
    }
}

impl Component for RouterItem {
    data_accessors!();

    fn merge_tag(&self) -> Option<String> {
        Some(self.path().to_string())
    }

    fn containing_component(&self) -> Option<String> {
        Some("%self:routing_file".to_string())
    }

    fn required_components(&self) -> Result<IndexMap<String, ComponentData>> {
        let mut required = IndexMap::from([(
            "routing_file".to_string(),
            request(json!({TYPE_KEY: "YamlFile", "filename": "%module.routing.yml"})),
        )]);

        if let Some(permission) = get_str(&self.data, "permission") {
            required.insert(
                "access_permission".to_string(),
                request(json!({TYPE_KEY: "Permission", "permission": permission})),
            );
        }
        if let Some(controller) = get_str(&self.data, "controller") {
            required.insert(
                "controller_class".to_string(),
                request(json!({
                    TYPE_KEY: "PhpClass",
                    "relative_class_name": controller,
                    "parent_class_name": "Drupal\\Core\\Controller\\ControllerBase",
                    "docblock": [format!("Returns responses for {}.", self.path())],
                    "body": [
                        "  /**\n   * Builds the response.\n   */\n  public function content() {\n    \
                         return [\n      '#markup' => $this->t('It works!'),\n    ];\n  }",
                    ],
                })),
            );
        }
        Ok(required)
    }

    fn content_type(&self) -> &str {
        YAML_CONTENT
    }

    fn contents(&self, _children: &ChildContents) -> AnyResult<Vec<String>> {
        let mut defaults = Mapping::new();
        if let Some(title) = get_str(&self.data, "route_title") {
            defaults.insert(Yaml::from("_title"), Yaml::from(title));
        }
        if let Some(form) = get_str(&self.data, "form_class") {
            defaults.insert(Yaml::from("_form"), Yaml::from(format!("\\Drupal\\%module\\{form}")));
        } else if let Some(controller) = get_str(&self.data, "controller") {
            defaults.insert(
                Yaml::from("_controller"),
                Yaml::from(format!("\\Drupal\\%module\\{controller}::content")),
            );
        }

        let mut requirements = Mapping::new();
        match get_str(&self.data, "permission") {
            Some(permission) => requirements.insert(Yaml::from("_permission"), Yaml::from(permission)),
            None => requirements.insert(Yaml::from("_access"), Yaml::from("TRUE")),
        };

        let mut route = Mapping::new();
        route.insert(Yaml::from("path"), Yaml::from(self.path()));
        route.insert(Yaml::from("defaults"), Yaml::Mapping(defaults));
        route.insert(Yaml::from("requirements"), Yaml::Mapping(requirements));

        let name = get_str(&self.data, "route_name").map(str::to_string).unwrap_or_else(|| route_name(self.path()));
        Ok(vec![yaml_fragment(name, Yaml::Mapping(route))?])
    }
}
