//! Extension roots.
//!
//! [`Module`] roots a whole generation run. [`TestModule`] is a nested root:
//! a module living inside its parent under `tests/modules/<name>/`, with the
//! module schema minus `test_modules` so test modules cannot nest further.

use indexmap::IndexMap;
use serde_json::{Value, json};

use super::request;
use crate::component::Component;
use crate::constants::{TOKEN_REQUESTER, TYPE_KEY};
use crate::core::{ComponentData, Result, get_str};
use crate::schema::{PropertyDefinition, PropertyList, SchemaIntrospector};
use crate::utils::{class_name, machine_name, readable};

/// The extension being generated.
#[derive(Debug)]
pub struct Module {
    data: ComponentData,
}

impl Module {
    /// Build from prepared data.
    pub fn build(data: ComponentData) -> Box<dyn Component> {
        Box::new(Self {
            data,
        })
    }
}

/// Schema of [`Module`].
pub fn module_schema(_schemas: &SchemaIntrospector) -> Result<PropertyList> {
    Ok(PropertyList::new()
        .with(
            PropertyDefinition::scalar("root_name")
                .label("Machine name")
                .primary()
                .required()
                .processing(|context| {
                    if let Some(cleaned) = context.value.as_str().map(machine_name) {
                        *context.value = Value::String(cleaned);
                    }
                    Ok(())
                }),
        )
        .with(
            PropertyDefinition::scalar("readable_name")
                .process_default()
                .default_with(|data| json!(readable(get_str(data, "root_name").unwrap_or_default())))
                .acquired_alias("name"),
        )
        .with(
            PropertyDefinition::scalar("short_description")
                .process_default()
                .default_with(|data| {
                    json!(format!(
                        "Provides {} functionality.",
                        get_str(data, "readable_name").unwrap_or("extension")
                    ))
                }),
        )
        .with(PropertyDefinition::scalar("package").process_default().default_value("Custom"))
        .with(PropertyDefinition::list("dependencies").describe("Extensions this one depends on"))
        .with(PropertyDefinition::component_compound("permissions", "Permission"))
        .with(PropertyDefinition::component_list("hooks", "HookImplementation"))
        .with(PropertyDefinition::component_compound("plugins", "Plugin"))
        .with(PropertyDefinition::component_compound("services", "Service"))
        .with(PropertyDefinition::component_compound("forms", "Form"))
        .with(PropertyDefinition::component_compound("router_items", "RouterItem"))
        .with(PropertyDefinition::component_flag("readme", "Readme"))
        .with(PropertyDefinition::component_compound("test_modules", "TestModule")))
}

impl Component for Module {
    data_accessors!();

    fn is_root(&self) -> bool {
        true
    }

    fn required_components(&self) -> Result<IndexMap<String, ComponentData>> {
        Ok(IndexMap::from([("info".to_string(), request(json!({TYPE_KEY: "InfoFile"})))]))
    }

    fn replacements(&self) -> IndexMap<String, String> {
        root_replacements(&self.data)
    }
}

/// A test extension nested in its parent module.
#[derive(Debug)]
pub struct TestModule {
    data: ComponentData,
}

impl TestModule {
    /// Build from prepared data.
    pub fn build(data: ComponentData) -> Box<dyn Component> {
        Box::new(Self {
            data,
        })
    }
}

/// Schema of [`TestModule`]: the module schema without `test_modules`, plus
/// the parent's machine name, which is also added to the dependencies.
pub fn test_module_schema(schemas: &SchemaIntrospector) -> Result<PropertyList> {
    let mut schema = schemas.property_schema("Module")?.without(&["test_modules"]);
    schema.push(
        PropertyDefinition::scalar("parent_module").acquired_from("root_name").processing(|context| {
            let Some(parent) = context.value.as_str() else {
                return Ok(());
            };
            let dependency = json!(parent);
            match context.data.get_mut("dependencies") {
                Some(Value::Array(items)) if items.contains(&dependency) => {}
                Some(Value::Array(items)) => items.push(dependency),
                _ => {
                    context.data.insert("dependencies".to_string(), json!([dependency]));
                }
            }
            Ok(())
        }),
    );
    Ok(schema)
}

impl Component for TestModule {
    data_accessors!();

    fn is_root(&self) -> bool {
        true
    }

    fn containing_component(&self) -> Option<String> {
        Some(TOKEN_REQUESTER.to_string())
    }

    fn required_components(&self) -> Result<IndexMap<String, ComponentData>> {
        Ok(IndexMap::from([(
            "info".to_string(),
            request(json!({TYPE_KEY: "InfoFile", "hidden": true})),
        )]))
    }

    fn replacements(&self) -> IndexMap<String, String> {
        root_replacements(&self.data)
    }

    fn base_path(&self) -> Option<String> {
        Some("tests/modules/%module".to_string())
    }
}

/// Tokens a root exposes: `%module`, `%Module` and `%readable`.
fn root_replacements(data: &ComponentData) -> IndexMap<String, String> {
    let name = get_str(data, "root_name").unwrap_or_default();
    let label = get_str(data, "readable_name").map(str::to_string).unwrap_or_else(|| readable(name));
    IndexMap::from([
        ("%module".to_string(), name.to_string()),
        ("%Module".to_string(), class_name(name)),
        ("%readable".to_string(), label),
    ])
}
