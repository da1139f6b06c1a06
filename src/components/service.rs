//! Container services, declared in `<module>.services.yml`.

use anyhow::Result as AnyResult;
use indexmap::IndexMap;
use serde_json::{Value, json};
use serde_yaml::{Mapping, Value as Yaml};

use super::request;
use super::yaml::{YAML_CONTENT, yaml_fragment};
use crate::component::{ChildContents, Component};
use crate::constants::TYPE_KEY;
use crate::core::{ComponentData, ExtgenError, Result, get_str, get_string_list};
use crate::schema::{PropertyDefinition, PropertyList, SchemaIntrospector, presets_from_yaml};
use crate::utils::{class_name, machine_name};

const SERVICE_TAG_TYPES: &str = r#"
event_subscriber:
  label: Event subscriber
  data:
    force:
      tags:
        value: [event_subscriber]
      interfaces:
        value:
          - Symfony\Component\EventDispatcher\EventSubscriberInterface
breadcrumb_builder:
  label: Breadcrumb builder
  data:
    force:
      tags:
        value: [breadcrumb_builder]
      interfaces:
        value:
          - Drupal\Core\Breadcrumb\BreadcrumbBuilderInterface
access_check:
  label: Access check
  data:
    force:
      tags:
        value: [access_check]
      interfaces:
        value:
          - Drupal\Core\Routing\Access\AccessInterface
"#;

/// A service and its class.
#[derive(Debug)]
pub struct Service {
    data: ComponentData,
}

impl Service {
    /// Build from prepared data.
    pub fn build(data: ComponentData) -> Box<dyn Component> {
        Box::new(Self {
            data,
        })
    }

    fn service_name(&self) -> &str {
        get_str(&self.data, "service_name").unwrap_or_default()
    }

    fn class_name(&self) -> &str {
        get_str(&self.data, "class_name").unwrap_or_default()
    }

    fn body(&self) -> Vec<String> {
        let method = match get_str(&self.data, "service_tag_type") {
            Some("event_subscriber") => {
                "  /**\n   * {@inheritdoc}\n   */\n  public static function getSubscribedEvents() {\n    \
                 return [];\n  }"
            }
            Some("breadcrumb_builder") => {
                "  /**\n   * {@inheritdoc}\n   */\n  public function applies(\
                 \\Drupal\\Core\\Routing\\RouteMatchInterface $route_match) {\n    return FALSE;\n  }"
            }
            Some("access_check") => {
                "  public function access(\\Drupal\\Core\\Session\\AccountInterface $account) {\n    \
                 return \\Drupal\\Core\\Access\\AccessResult::allowed();\n  }"
            }
            _ => return Vec::new(),
        };
        vec![method.to_string()]
    }
}

/// Schema of [`Service`].
pub fn service_schema(_schemas: &SchemaIntrospector) -> Result<PropertyList> {
    let tag_types = presets_from_yaml(SERVICE_TAG_TYPES).map_err(|e| ExtgenError::InvalidSchema {
        component_type: "Service".to_string(),
        reason: format!("service tag presets: {e}"),
    })?;

    Ok(PropertyList::new()
        .with(PropertyDefinition::scalar("service_name").primary().required().processing(|context| {
            if let Some(cleaned) = context.value.as_str().map(machine_name) {
                *context.value = Value::String(cleaned);
            }
            Ok(())
        }))
        .with(PropertyDefinition::scalar("service_tag_type").presets(tag_types))
        .with(
            PropertyDefinition::scalar("class_name")
                .process_default()
                .default_with(|data| json!(class_name(get_str(data, "service_name").unwrap_or_default()))),
        )
        .with(PropertyDefinition::list("arguments").describe("Service ids injected into the constructor"))
        .with(PropertyDefinition::list("tags"))
        .with(PropertyDefinition::list("interfaces")))
}

impl Component for Service {
    data_accessors!();

    fn merge_tag(&self) -> Option<String> {
        Some(self.service_name().to_string())
    }

    fn containing_component(&self) -> Option<String> {
        Some("%self:services_file".to_string())
    }

    fn required_components(&self) -> Result<IndexMap<String, ComponentData>> {
        Ok(IndexMap::from([
            (
                "services_file".to_string(),
                request(json!({
                    TYPE_KEY: "YamlFile",
                    "filename": "%module.services.yml",
                    "parent_key": "services",
                })),
            ),
            (
                "service_class".to_string(),
                request(json!({
                    TYPE_KEY: "PhpClass",
                    "relative_class_name": self.class_name(),
                    "interfaces": get_string_list(&self.data, "interfaces"),
                    "body": self.body(),
                })),
            ),
        ]))
    }

    fn content_type(&self) -> &str {
        YAML_CONTENT
    }

    fn contents(&self, _children: &ChildContents) -> AnyResult<Vec<String>> {
        let mut definition = Mapping::new();
        definition.insert(Yaml::from("class"), Yaml::from(format!("Drupal\\%module\\{}", self.class_name())));

        let arguments = get_string_list(&self.data, "arguments");
        if !arguments.is_empty() {
            let arguments = arguments
                .into_iter()
                .map(|argument| {
                    if argument.starts_with('@') { argument } else { format!("@{argument}") }
                })
                .map(Yaml::from)
                .collect();
            definition.insert(Yaml::from("arguments"), Yaml::Sequence(arguments));
        }

        let tags = get_string_list(&self.data, "tags");
        if !tags.is_empty() {
            let tags = tags
                .into_iter()
                .map(|tag| {
                    let mut entry = Mapping::new();
                    entry.insert(Yaml::from("name"), Yaml::from(tag));
                    Yaml::Mapping(entry)
                })
                .collect();
            definition.insert(Yaml::from("tags"), Yaml::Sequence(tags));
        }

        let id = format!("%module.{}", self.service_name());
        Ok(vec![yaml_fragment(id, Yaml::Mapping(definition))?])
    }
}
