//! Built-in component library.
//!
//! These are the component types a specification can name. Each type is a
//! [`ComponentKind`]: a schema builder plus a constructor. The engine never
//! depends on any of them; they only talk to it through the
//! [`Component`](crate::component::Component) trait.
//!
//! | Type | Output |
//! |---|---|
//! | `Module` | root; requires its info file |
//! | `TestModule` | nested root under `tests/modules/<name>/` |
//! | `InfoFile` / `InfoFile7` | `<module>.info.yml` / legacy `<module>.info` |
//! | `YamlFile` | any YAML file, merged from contained fragments |
//! | `Permission` | entry in `<module>.permissions.yml` |
//! | `PhpFile` | procedural PHP file collecting functions |
//! | `HookImplementation` | function in `<module>.module` or `<module>.install` |
//! | `PhpClass` | PSR-4 class under `src/` |
//! | `Plugin` | plugin class, shaped by its plugin type |
//! | `Service` | entry in `<module>.services.yml` plus its class |
//! | `Form` | form class, optionally routed |
//! | `RouterItem` | entry in `<module>.routing.yml` |
//! | `Readme` | `README.md` |
//!
//! Root components expose three tokens to everything below them: `%module`
//! (machine name), `%Module` (class-case machine name) and `%readable`.

macro_rules! data_accessors {
    () => {
        fn data(&self) -> &$crate::core::ComponentData {
            &self.data
        }

        fn data_mut(&mut self) -> &mut $crate::core::ComponentData {
            &mut self.data
        }
    };
}

pub mod form;
pub mod hook;
pub mod info;
pub mod module;
pub mod permission;
pub mod php;
pub mod plugin;
pub mod readme;
pub mod routing;
pub mod service;
pub mod yaml;

use serde_json::Value;

use crate::core::ComponentData;
use crate::types::{ComponentKind, TypeResolver};

/// Every built-in component kind, in listing order.
pub fn builtin_kinds() -> Vec<ComponentKind> {
    vec![
        ComponentKind {
            name: "Module",
            description: "Extension root",
            schema: module::module_schema,
            build: module::Module::build,
        },
        ComponentKind {
            name: "TestModule",
            description: "Test extension nested under tests/modules",
            schema: module::test_module_schema,
            build: module::TestModule::build,
        },
        ComponentKind {
            name: "InfoFile",
            description: "Extension info file (.info.yml)",
            schema: info::info_schema,
            build: info::InfoFile::build,
        },
        ComponentKind {
            name: "InfoFile7",
            description: "Legacy extension info file (.info)",
            schema: info::info7_schema,
            build: info::InfoFile7::build,
        },
        ComponentKind {
            name: "YamlFile",
            description: "YAML file assembled from contained fragments",
            schema: yaml::yaml_file_schema,
            build: yaml::YamlFile::build,
        },
        ComponentKind {
            name: "Permission",
            description: "Permission declaration",
            schema: permission::permission_schema,
            build: permission::Permission::build,
        },
        ComponentKind {
            name: "PhpFile",
            description: "Procedural PHP file",
            schema: php::php_file_schema,
            build: php::PhpFile::build,
        },
        ComponentKind {
            name: "HookImplementation",
            description: "Hook implementation function",
            schema: hook::hook_schema,
            build: hook::HookImplementation::build,
        },
        ComponentKind {
            name: "PhpClass",
            description: "PSR-4 PHP class",
            schema: php::php_class_schema,
            build: php::PhpClass::build,
        },
        ComponentKind {
            name: "Plugin",
            description: "Plugin class",
            schema: plugin::plugin_schema,
            build: plugin::Plugin::build,
        },
        ComponentKind {
            name: "Service",
            description: "Container service",
            schema: service::service_schema,
            build: service::Service::build,
        },
        ComponentKind {
            name: "Form",
            description: "Form class with optional route",
            schema: form::form_schema,
            build: form::Form::build,
        },
        ComponentKind {
            name: "RouterItem",
            description: "Route declaration",
            schema: routing::router_item_schema,
            build: routing::RouterItem::build,
        },
        ComponentKind {
            name: "Readme",
            description: "README file",
            schema: readme::readme_schema,
            build: readme::Readme::build,
        },
    ]
}

/// A type resolver holding every built-in kind.
pub fn resolver(core_version: u32) -> TypeResolver {
    TypeResolver::with_kinds(core_version, builtin_kinds())
}

/// Turn a `json!` literal into component data; non-objects become empty.
pub(crate) fn request(value: Value) -> ComponentData {
    match value {
        Value::Object(map) => map,
        _ => ComponentData::new(),
    }
}
