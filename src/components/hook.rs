//! Hook implementations.

use anyhow::Result as AnyResult;
use indexmap::IndexMap;
use serde_json::json;

use super::php::FUNCTION_CONTENT;
use super::request;
use crate::component::{ChildContents, Component};
use crate::constants::TYPE_KEY;
use crate::core::{ComponentData, Result, get_str, get_string_list};
use crate::schema::{PropertyDefinition, PropertyList, SchemaIntrospector};

/// Hooks that belong in the `.install` file rather than the `.module` file.
const INSTALL_HOOKS: &[&str] = &["install", "uninstall", "schema", "requirements", "enable", "disable"];

/// Parameter lists of common hooks.
const SIGNATURES: &[(&str, &str)] = &[
    ("help", "$route_name, \\Drupal\\Core\\Routing\\RouteMatchInterface $route_match"),
    ("theme", "$existing, $type, $theme, $path"),
    ("form_alter", "&$form, \\Drupal\\Core\\Form\\FormStateInterface $form_state, $form_id"),
    ("entity_presave", "\\Drupal\\Core\\Entity\\EntityInterface $entity"),
    ("entity_insert", "\\Drupal\\Core\\Entity\\EntityInterface $entity"),
    ("entity_update", "\\Drupal\\Core\\Entity\\EntityInterface $entity"),
    ("requirements", "$phase"),
    ("uninstall", "$is_syncing"),
];

/// One hook implementation function, deduplicated by hook name.
#[derive(Debug)]
pub struct HookImplementation {
    data: ComponentData,
}

impl HookImplementation {
    /// Build from prepared data.
    pub fn build(data: ComponentData) -> Box<dyn Component> {
        Box::new(Self {
            data,
        })
    }

    /// Hook name without the `hook_` prefix.
    fn short_name(&self) -> &str {
        let name = get_str(&self.data, "hook_name").unwrap_or_default();
        name.strip_prefix("hook_").unwrap_or(name)
    }

    fn filename(&self) -> &'static str {
        let short = self.short_name();
        if INSTALL_HOOKS.contains(&short) || short.starts_with("update_") {
            "%module.install"
        } else {
            "%module.module"
        }
    }
}

/// Schema of [`HookImplementation`].
pub fn hook_schema(_schemas: &SchemaIntrospector) -> Result<PropertyList> {
    Ok(PropertyList::new()
        .with(PropertyDefinition::scalar("hook_name").primary().required().processing(|context| {
            let short = context.value.as_str().and_then(|name| name.strip_prefix("hook_")).map(str::to_string);
            if let Some(short) = short {
                *context.value = json!(short);
            }
            Ok(())
        }))
        .with(PropertyDefinition::list("body").describe("Lines of the function body")))
}

impl Component for HookImplementation {
    data_accessors!();

    fn merge_tag(&self) -> Option<String> {
        Some(self.short_name().to_string())
    }

    fn containing_component(&self) -> Option<String> {
        Some("%self:hook_file".to_string())
    }

    fn required_components(&self) -> Result<IndexMap<String, ComponentData>> {
        Ok(IndexMap::from([(
            "hook_file".to_string(),
            request(json!({TYPE_KEY: "PhpFile", "filename": self.filename()})),
        )]))
    }

    fn content_type(&self) -> &str {
        FUNCTION_CONTENT
    }

    fn contents(&self, _children: &ChildContents) -> AnyResult<Vec<String>> {
        let short = self.short_name();
        let parameters = SIGNATURES
            .iter()
            .find(|(hook, _)| *hook == short)
            .map(|(_, parameters)| *parameters)
            .unwrap_or_default();

        let mut function = format!("/**\n * Implements hook_{short}().\n */\nfunction %module_{short}({parameters}) {{\n");
        for line in get_string_list(&self.data, "body") {
            function.push_str(&format!("  {line}\n"));
        }
        function.push('}');
        Ok(vec![function])
    }
}
