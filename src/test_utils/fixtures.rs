//! Fixture component types for engine tests.
//!
//! The fixture types are small and data-driven so unit and integration tests
//! can exercise the collector without the built-in component library:
//!
//! | Type | Role |
//! |---|---|
//! | `Thing` | root; binds `flag_property` to `Widget`, `tags` to `Tag`, `perms` to `Perm`, `inners` to `Inner` |
//! | `Widget` | no primary property; acquires `owner` from its requester |
//! | `Tag` | primary property `tag_value` |
//! | `Perm` | merge tag = `permission`, contained in `%root` |
//! | `Sized` | preset tables on `size` and `bundles` |
//! | `Inner` | nested root; binds `leaves` to `Leaf` |
//! | `Leaf` | requires one `Seed` |
//! | `Seed` | contained in `%requester:%nearest_root` |
//!
//! Every fixture component also honours a `requires` mapping in its data
//! (local name to data subtree), which tests use to request arbitrary
//! sub-components.

use indexmap::IndexMap;
use serde_json::{Value, json};

use crate::component::Component;
use crate::core::{ComponentData, Result, get_str};
use crate::schema::{Preset, PresetTable, PropertyDefinition, PropertyList, SchemaIntrospector};
use crate::types::{ComponentKind, SchemaBuilder, TypeResolver};

/// Generic data-driven component used by all fixture types.
#[derive(Debug, Clone, Default)]
pub struct FixtureComponent {
    data: ComponentData,
    root: bool,
    merge_key: Option<&'static str>,
    container: Option<&'static str>,
}

impl FixtureComponent {
    /// Plain component with no tag and no container.
    pub fn new(data: ComponentData) -> Self {
        Self {
            data,
            ..Self::default()
        }
    }

    /// Mark as a root.
    pub fn root(mut self) -> Self {
        self.root = true;
        self
    }

    /// Use the value of `key` as merge tag.
    pub fn merge_on(mut self, key: &'static str) -> Self {
        self.merge_key = Some(key);
        self
    }

    /// Containment token.
    pub fn contained_in(mut self, token: &'static str) -> Self {
        self.container = Some(token);
        self
    }
}

impl Component for FixtureComponent {
    fn data(&self) -> &ComponentData {
        &self.data
    }

    fn data_mut(&mut self) -> &mut ComponentData {
        &mut self.data
    }

    fn is_root(&self) -> bool {
        self.root
    }

    fn merge_tag(&self) -> Option<String> {
        self.merge_key.and_then(|key| get_str(&self.data, key)).map(str::to_string)
    }

    fn containing_component(&self) -> Option<String> {
        self.container.map(str::to_string)
    }

    fn required_components(&self) -> Result<IndexMap<String, ComponentData>> {
        Ok(requires_from(&self.data))
    }

    fn content_type(&self) -> &str {
        "fixture"
    }
}

fn requires_from(data: &ComponentData) -> IndexMap<String, ComponentData> {
    data.get("requires")
        .and_then(Value::as_object)
        .map(|requires| {
            requires
                .iter()
                .filter_map(|(name, value)| value.as_object().map(|d| (name.clone(), d.clone())))
                .collect()
        })
        .unwrap_or_default()
}

fn build_plain(data: ComponentData) -> Box<dyn Component> {
    Box::new(FixtureComponent::new(data))
}

fn build_thing(data: ComponentData) -> Box<dyn Component> {
    Box::new(FixtureComponent::new(data).root())
}

fn build_child(data: ComponentData) -> Box<dyn Component> {
    Box::new(FixtureComponent::new(data).contained_in("%requester"))
}

fn build_perm(data: ComponentData) -> Box<dyn Component> {
    Box::new(FixtureComponent::new(data).merge_on("permission").contained_in("%root"))
}

fn build_inner(data: ComponentData) -> Box<dyn Component> {
    Box::new(FixtureComponent::new(data).root().contained_in("%requester"))
}

fn build_leaf(data: ComponentData) -> Box<dyn Component> {
    let mut data = data;
    if !data.contains_key("requires") {
        data.insert("requires".into(), json!({"seed": {"component_type": "Seed"}}));
    }
    Box::new(FixtureComponent::new(data).contained_in("%requester"))
}

fn build_seed(data: ComponentData) -> Box<dyn Component> {
    Box::new(FixtureComponent::new(data).contained_in("%requester:%nearest_root"))
}

/// A kind backed by a plain [`FixtureComponent`].
pub fn kind(name: &'static str, schema: SchemaBuilder) -> ComponentKind {
    ComponentKind {
        name,
        description: "Fixture component",
        schema,
        build: build_plain,
    }
}

fn kind_with(
    name: &'static str,
    schema: SchemaBuilder,
    build: fn(ComponentData) -> Box<dyn Component>,
) -> ComponentKind {
    ComponentKind {
        name,
        description: "Fixture component",
        schema,
        build,
    }
}

/// Schema of the `Thing` root.
pub fn thing_schema(_: &SchemaIntrospector) -> Result<PropertyList> {
    Ok(PropertyList::new()
        .with(PropertyDefinition::scalar("root_name").primary().required())
        .with(
            PropertyDefinition::scalar("readable_name")
                .process_default()
                .default_with(|data| json!(get_str(data, "root_name").unwrap_or_default().to_uppercase()))
                .acquired_alias("label"),
        )
        .with(PropertyDefinition::scalar("owner").process_default().default_value("anonymous"))
        .with(PropertyDefinition::component_flag("flag_property", "Widget"))
        .with(PropertyDefinition::component_list("tags", "Tag"))
        .with(PropertyDefinition::component_compound("perms", "Perm"))
        .with(PropertyDefinition::component_compound("inners", "Inner"))
        .with(PropertyDefinition::list("keywords")))
}

fn widget_schema(_: &SchemaIntrospector) -> Result<PropertyList> {
    Ok(PropertyList::new()
        .with(PropertyDefinition::scalar("owner").acquired())
        .with(PropertyDefinition::scalar("label").acquired()))
}

fn tag_schema(_: &SchemaIntrospector) -> Result<PropertyList> {
    Ok(PropertyList::new().with(PropertyDefinition::scalar("tag_value").primary().required()))
}

fn perm_schema(_: &SchemaIntrospector) -> Result<PropertyList> {
    Ok(PropertyList::new()
        .with(PropertyDefinition::scalar("permission").primary().required())
        .with(PropertyDefinition::scalar("title"))
        .with(PropertyDefinition::list("roles")))
}

fn sized_schema(_: &SchemaIntrospector) -> Result<PropertyList> {
    let sizes = PresetTable::from_iter([
        (
            "large".to_string(),
            Preset::new("Large").force("max_items", json!(100)).suggest("label", json!("Big")),
        ),
        ("small".to_string(), Preset::new("Small").force("max_items", json!(5))),
    ]);
    let bundles = PresetTable::from_iter([
        ("alpha".to_string(), Preset::new("Alpha").force("extras", json!(["a"]))),
        ("beta".to_string(), Preset::new("Beta").force("extras", json!(["b", "a"]))),
        ("solo".to_string(), Preset::new("Solo").force("max_items", json!(1))),
        ("pair".to_string(), Preset::new("Pair").force("max_items", json!(2))),
    ]);
    Ok(PropertyList::new()
        .with(PropertyDefinition::scalar("size").presets(sizes))
        .with(PropertyDefinition::list("bundles").presets(bundles))
        .with(PropertyDefinition::scalar("max_items").process_default().default_value(10))
        .with(PropertyDefinition::list("extras"))
        .with(PropertyDefinition::scalar("label")))
}

fn inner_schema(_: &SchemaIntrospector) -> Result<PropertyList> {
    Ok(PropertyList::new()
        .with(PropertyDefinition::scalar("root_name").primary().required())
        .with(PropertyDefinition::component_list("leaves", "Leaf")))
}

fn leaf_schema(_: &SchemaIntrospector) -> Result<PropertyList> {
    Ok(PropertyList::new().with(PropertyDefinition::scalar("leaf_name").primary()))
}

fn seed_schema(_: &SchemaIntrospector) -> Result<PropertyList> {
    Ok(PropertyList::new())
}

/// All fixture kinds.
pub fn fixture_kinds() -> Vec<ComponentKind> {
    vec![
        kind_with("Thing", thing_schema, build_thing),
        kind_with("Widget", widget_schema, build_child),
        kind_with("Tag", tag_schema, build_child),
        kind_with("Perm", perm_schema, build_perm),
        kind_with("Sized", sized_schema, build_thing),
        kind_with("Inner", inner_schema, build_inner),
        kind_with("Leaf", leaf_schema, build_leaf),
        kind_with("Seed", seed_schema, build_seed),
    ]
}

/// Resolver with the fixture kinds for core version 10.
pub fn fixture_resolver() -> TypeResolver {
    TypeResolver::with_kinds(10, fixture_kinds())
}

/// Build component data from a JSON object literal.
///
/// # Panics
///
/// Panics when `value` is not an object.
pub fn data(value: Value) -> ComponentData {
    match value {
        Value::Object(map) => map,
        other => panic!("fixture data must be an object, got {other}"),
    }
}
