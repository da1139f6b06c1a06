//! PHP output: procedural files and PSR-4 classes.

use anyhow::{Context as _, Result as AnyResult};
use serde_json::json;
use tera::{Context, Tera};

use crate::component::{ChildContents, Component, FileInfo};
use crate::constants::TOKEN_NEAREST_ROOT;
use crate::core::{ComponentData, Result, get_str, get_string_list};
use crate::schema::{PropertyDefinition, PropertyList, SchemaIntrospector};
use crate::utils::split_class;

/// Content type of PHP function fragments.
pub const FUNCTION_CONTENT: &str = "function";

/// A procedural PHP file such as `<module>.module`.
#[derive(Debug)]
pub struct PhpFile {
    data: ComponentData,
}

impl PhpFile {
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

/// Schema of [`PhpFile`].
pub fn php_file_schema(_schemas: &SchemaIntrospector) -> Result<PropertyList> {
    Ok(PropertyList::new()
        .with(PropertyDefinition::scalar("filename").primary().required())
        .with(PropertyDefinition::scalar("file_doc").process_default().default_with(|data| {
            let filename = get_str(data, "filename").unwrap_or_default();
            let doc = if filename.ends_with(".install") {
                "Install, update and uninstall functions for the %readable module."
            } else {
                "Primary module hooks for the %readable module."
            };
            json!(doc)
        })))
}

impl Component for PhpFile {
    data_accessors!();

    fn merge_tag(&self) -> Option<String> {
        Some(self.filename().to_string())
    }

    fn containing_component(&self) -> Option<String> {
        Some(TOKEN_NEAREST_ROOT.to_string())
    }

    fn contents(&self, children: &ChildContents) -> AnyResult<Vec<String>> {
        let doc = get_str(&self.data, "file_doc").unwrap_or_default();
        let mut sections = vec![format!("<?php\n\n/**\n * @file\n * {doc}\n */")];
        sections.extend(children.get(FUNCTION_CONTENT).iter().map(|function| function.trim_end().to_string()));
        Ok(vec![sections.join("\n\n")])
    }

    fn file_info(&self, contents: &[String]) -> Option<FileInfo> {
        Some(FileInfo::new(self.filename(), contents.to_vec()))
    }
}

const CLASS_TEMPLATE: &str = r#"<?php

namespace {{ namespace }};
{% if uses %}
{% for statement in uses %}use {{ statement }};
{% endfor %}{% endif %}
/**
{% for line in docblock %} *{% if line %} {{ line }}{% endif %}
{% endfor %} */
class {{ class_name }}{% if parent %} extends {{ parent }}{% endif %}{% if interfaces %} implements {{ interfaces | join(sep=", ") }}{% endif %} {
{% for method in body %}
{{ method }}
{% endfor %}
}
"#;

/// A class under the extension's `src/` directory.
///
/// `relative_class_name` is relative to the extension namespace, so
/// `Form\SettingsForm` lands in `src/Form/SettingsForm.php` as
/// `Drupal\<module>\Form\SettingsForm`.
#[derive(Debug)]
pub struct PhpClass {
    data: ComponentData,
}

impl PhpClass {
    /// Build from prepared data.
    pub fn build(data: ComponentData) -> Box<dyn Component> {
        Box::new(Self {
            data,
        })
    }

    fn relative_class_name(&self) -> &str {
        get_str(&self.data, "relative_class_name").unwrap_or_default().trim_matches('\\')
    }

    fn render(&self) -> AnyResult<String> {
        let relative = self.relative_class_name();
        let (sub_namespace, class_name) = split_class(relative);
        let namespace = if sub_namespace.is_empty() {
            "Drupal\\%module".to_string()
        } else {
            format!("Drupal\\%module\\{sub_namespace}")
        };

        let parent = get_str(&self.data, "parent_class_name").map(|parent| parent.trim_start_matches('\\'));
        let interfaces = get_string_list(&self.data, "interfaces");

        let mut uses: Vec<String> = get_string_list(&self.data, "uses");
        uses.extend(parent.map(str::to_string));
        uses.extend(interfaces.iter().cloned());
        let mut uses: Vec<String> = uses
            .iter()
            .map(|name| name.trim_start_matches('\\').to_string())
            .filter(|name| name.contains('\\') && split_class(name).0 != namespace)
            .collect();
        uses.sort();
        uses.dedup();

        let short = |name: &str| split_class(name).1.to_string();
        let mut context = Context::new();
        context.insert("namespace", &namespace);
        context.insert("uses", &uses);
        context.insert("docblock", &get_string_list(&self.data, "docblock"));
        context.insert("class_name", class_name);
        context.insert("parent", &parent.map(short));
        context.insert("interfaces", &interfaces.iter().map(|name| short(name)).collect::<Vec<_>>());
        context.insert("body", &get_string_list(&self.data, "body"));

        Tera::one_off(CLASS_TEMPLATE, &context, false)
            .with_context(|| format!("Failed to render class {relative}"))
    }
}

/// Schema of [`PhpClass`].
pub fn php_class_schema(_schemas: &SchemaIntrospector) -> Result<PropertyList> {
    Ok(PropertyList::new()
        .with(PropertyDefinition::scalar("relative_class_name").primary().required())
        .with(PropertyDefinition::scalar("parent_class_name"))
        .with(PropertyDefinition::list("interfaces"))
        .with(PropertyDefinition::list("uses").describe("Additional fully-qualified imports"))
        .with(PropertyDefinition::list("docblock"))
        .with(PropertyDefinition::list("body").describe("Rendered class members")))
}

impl Component for PhpClass {
    data_accessors!();

    fn merge_tag(&self) -> Option<String> {
        Some(format!("\\Drupal\\%module\\{}", self.relative_class_name()))
    }

    fn containing_component(&self) -> Option<String> {
        Some(TOKEN_NEAREST_ROOT.to_string())
    }

    fn contents(&self, _children: &ChildContents) -> AnyResult<Vec<String>> {
        Ok(vec![self.render()?])
    }

    fn file_info(&self, contents: &[String]) -> Option<FileInfo> {
        let path = format!("src/{}.php", self.relative_class_name().replace('\\', "/"));
        Some(FileInfo::new(path, contents.to_vec()))
    }
}
