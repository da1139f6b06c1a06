//! Plugins.
//!
//! The plugin type is a preset property: selecting `block`, `queue_worker` or
//! `field_formatter` forces the subdirectory, base class and annotation of the
//! generated class, and may suggest interfaces.

use indexmap::IndexMap;
use serde_json::{Value, json};

use super::request;
use crate::component::Component;
use crate::constants::TYPE_KEY;
use crate::core::{ComponentData, ExtgenError, Result, get_str, get_string_list};
use crate::schema::{PropertyDefinition, PropertyList, SchemaIntrospector, presets_from_yaml};
use crate::utils::{class_name, machine_name, readable};

const PLUGIN_TYPES: &str = r#"
block:
  label: Block
  data:
    force:
      plugin_subdir:
        value: Plugin\Block
      parent_class:
        value: Drupal\Core\Block\BlockBase
      annotation:
        value: Block
queue_worker:
  label: Queue worker
  data:
    force:
      plugin_subdir:
        value: Plugin\QueueWorker
      parent_class:
        value: Drupal\Core\Queue\QueueWorkerBase
      annotation:
        value: QueueWorker
    suggest:
      interfaces:
        value:
          - Drupal\Core\Plugin\ContainerFactoryPluginInterface
field_formatter:
  label: Field formatter
  data:
    force:
      plugin_subdir:
        value: Plugin\Field\FieldFormatter
      parent_class:
        value: Drupal\Core\Field\FormatterBase
      annotation:
        value: FieldFormatter
"#;

/// A plugin, realized as one annotated class.
#[derive(Debug)]
pub struct Plugin {
    data: ComponentData,
}

impl Plugin {
    /// Build from prepared data.
    pub fn build(data: ComponentData) -> Box<dyn Component> {
        Box::new(Self {
            data,
        })
    }

    fn get(&self, key: &str) -> &str {
        get_str(&self.data, key).unwrap_or_default()
    }

    fn docblock(&self) -> Vec<String> {
        let annotation = self.get("annotation");
        let label = self.get("plugin_label");
        let label_key = if annotation == "Block" { "admin_label" } else { "label" };
        vec![
            format!("Provides a '{label}' {}.", readable(self.get("plugin_type")).to_lowercase()),
            String::new(),
            format!("@{annotation}("),
            format!("  id = \"{}\",", self.get("plugin_name")),
            format!("  {label_key} = @Translation(\"{label}\"),"),
            ")".to_string(),
        ]
    }

    fn body(&self) -> Vec<String> {
        let method = match self.get("plugin_type") {
            "block" => {
                "  /**\n   * {@inheritdoc}\n   */\n  public function build() {\n    return [\n      \
                 '#markup' => $this->t('It works!'),\n    ];\n  }"
            }
            "queue_worker" => "  /**\n   * {@inheritdoc}\n   */\n  public function processItem($data) {\n  }",
            "field_formatter" => {
                "  /**\n   * {@inheritdoc}\n   */\n  public function viewElements(\
                 \\Drupal\\Core\\Field\\FieldItemListInterface $items, $langcode) {\n    $elements = [];\n    \
                 foreach ($items as $delta => $item) {\n      $elements[$delta] = ['#markup' => $item->value];\n    \
                 }\n    return $elements;\n  }"
            }
            _ => return Vec::new(),
        };
        vec![method.to_string()]
    }
}

/// Schema of [`Plugin`].
pub fn plugin_schema(_schemas: &SchemaIntrospector) -> Result<PropertyList> {
    let plugin_types = presets_from_yaml(PLUGIN_TYPES).map_err(|e| ExtgenError::InvalidSchema {
        component_type: "Plugin".to_string(),
        reason: format!("plugin type presets: {e}"),
    })?;

    Ok(PropertyList::new()
        .with(PropertyDefinition::scalar("plugin_type").required().presets(plugin_types))
        .with(PropertyDefinition::scalar("plugin_name").primary().required().processing(|context| {
            if let Some(cleaned) = context.value.as_str().map(machine_name) {
                *context.value = Value::String(cleaned);
            }
            Ok(())
        }))
        .with(
            PropertyDefinition::scalar("plugin_label")
                .process_default()
                .default_with(|data| json!(readable(get_str(data, "plugin_name").unwrap_or_default()))),
        )
        .with(PropertyDefinition::scalar("plugin_subdir").internal())
        .with(PropertyDefinition::scalar("parent_class").internal())
        .with(PropertyDefinition::scalar("annotation").internal())
        .with(PropertyDefinition::list("interfaces"))
        .with(
            PropertyDefinition::scalar("plugin_class_name")
                .computed()
                .default_with(|data| json!(class_name(get_str(data, "plugin_name").unwrap_or_default()))),
        ))
}

impl Component for Plugin {
    data_accessors!();

    fn merge_tag(&self) -> Option<String> {
        Some(format!("{}:{}", self.get("plugin_type"), self.get("plugin_name")))
    }

    fn required_components(&self) -> Result<IndexMap<String, ComponentData>> {
        let class = self.get("plugin_class_name");
        let relative = match get_str(&self.data, "plugin_subdir") {
            Some(subdir) => format!("{subdir}\\{class}"),
            None => format!("Plugin\\{class}"),
        };

        Ok(IndexMap::from([(
            "plugin_class".to_string(),
            request(json!({
                TYPE_KEY: "PhpClass",
                "relative_class_name": relative,
                "parent_class_name": get_str(&self.data, "parent_class"),
                "interfaces": get_string_list(&self.data, "interfaces"),
                "docblock": self.docblock(),
                "body": self.body(),
            })),
        )]))
    }
}
