//! Forms.

use indexmap::IndexMap;
use serde_json::{Value, json};

use super::request;
use crate::component::Component;
use crate::constants::TYPE_KEY;
use crate::core::{ComponentData, Result, get_str};
use crate::schema::{PropertyDefinition, PropertyList, SchemaIntrospector};
use crate::utils::{class_name, machine_name, readable};

/// Element types the generated `buildForm()` knows how to declare.
const ELEMENT_TYPES: &[&str] = &["textfield", "textarea", "checkbox", "select", "number", "email"];

/// A form class, routed when it has a path.
#[derive(Debug)]
pub struct Form {
    data: ComponentData,
}

impl Form {
    /// Build from prepared data.
    pub fn build(data: ComponentData) -> Box<dyn Component> {
        Box::new(Self {
            data,
        })
    }

    fn get(&self, key: &str) -> &str {
        get_str(&self.data, key).unwrap_or_default()
    }

    fn relative_class_name(&self) -> String {
        format!("Form\\{}", self.get("form_class"))
    }

    fn body(&self) -> Vec<String> {
        let mut elements = String::new();
        if let Some(Value::Array(items)) = self.data.get("elements") {
            for item in items.iter().filter_map(Value::as_object) {
                let name = get_str(item, "element_name").unwrap_or_default();
                let element_type = get_str(item, "element_type").unwrap_or("textfield");
                let title = get_str(item, "element_title").unwrap_or(name);
                elements.push_str(&format!(
                    "    $form['{name}'] = [\n      '#type' => '{element_type}',\n      \
                     '#title' => $this->t('{title}'),\n    ];\n"
                ));
            }
        }

        vec![
            format!(
                "  /**\n   * {{@inheritdoc}}\n   */\n  public function getFormId() {{\n    return '{}';\n  }}",
                self.get("form_id")
            ),
            format!(
                "  /**\n   * {{@inheritdoc}}\n   */\n  public function buildForm(array $form, \
                 FormStateInterface $form_state) {{\n{elements}    $form['actions']['submit'] = [\n      \
                 '#type' => 'submit',\n      '#value' => $this->t('Save'),\n    ];\n    return $form;\n  }}"
            ),
            "  /**\n   * {@inheritdoc}\n   */\n  public function submitForm(array &$form, \
             FormStateInterface $form_state) {\n  }"
                .to_string(),
        ]
    }
}

/// Schema of [`Form`].
pub fn form_schema(_schemas: &SchemaIntrospector) -> Result<PropertyList> {
    let elements = PropertyList::new()
        .with(PropertyDefinition::scalar("element_name").primary().required().processing(|context| {
            if let Some(cleaned) = context.value.as_str().map(machine_name) {
                *context.value = Value::String(cleaned);
            }
            Ok(())
        }))
        .with(
            PropertyDefinition::scalar("element_type")
                .process_default()
                .default_value("textfield")
                .options(ELEMENT_TYPES.iter().copied()),
        )
        .with(
            PropertyDefinition::scalar("element_title")
                .process_default()
                .default_with(|data| json!(readable(get_str(data, "element_name").unwrap_or_default()))),
        );

    Ok(PropertyList::new()
        .with(PropertyDefinition::scalar("form_class").primary().required().processing(|context| {
            if let Some(cleaned) = context.value.as_str().map(class_name) {
                *context.value = Value::String(cleaned);
            }
            Ok(())
        }))
        .with(PropertyDefinition::scalar("root_name").acquired())
        .with(PropertyDefinition::scalar("form_id").process_default().default_with(|data| {
            let root = get_str(data, "root_name").unwrap_or("%module");
            json!(format!("{root}_{}", machine_name(get_str(data, "form_class").unwrap_or_default())))
        }))
        .with(PropertyDefinition::scalar("form_title").process_default().default_with(|data| {
            json!(readable(&machine_name(get_str(data, "form_class").unwrap_or_default())))
        }))
        .with(PropertyDefinition::scalar("form_path").describe("Route path; omit for an unrouted form"))
        .with(PropertyDefinition::scalar("permission"))
        .with(PropertyDefinition::compound("elements", elements)))
}

impl Component for Form {
    data_accessors!();

    fn merge_tag(&self) -> Option<String> {
        Some(self.relative_class_name())
    }

    fn required_components(&self) -> Result<IndexMap<String, ComponentData>> {
        let mut required = IndexMap::from([(
            "class".to_string(),
            request(json!({
                TYPE_KEY: "PhpClass",
                "relative_class_name": self.relative_class_name(),
                "parent_class_name": "Drupal\\Core\\Form\\FormBase",
                "uses": ["Drupal\\Core\\Form\\FormStateInterface"],
                "docblock": [format!("Provides the {} form.", self.get("form_title"))],
                "body": self.body(),
            })),
        )]);

        if let Some(path) = get_str(&self.data, "form_path") {
            required.insert(
                "route".to_string(),
                request(json!({
                    TYPE_KEY: "RouterItem",
                    "path": path,
                    "route_title": self.get("form_title"),
                    "form_class": self.relative_class_name(),
                    "permission": get_str(&self.data, "permission"),
                })),
            );
        }
        Ok(required)
    }
}
