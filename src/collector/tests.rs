use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::json;

use super::*;
use crate::test_utils::fixtures::{data, fixture_resolver};
use crate::types::{ComponentKind, TypeResolver};

/// Requires an exact copy of itself.
#[derive(Debug)]
struct Echo(ComponentData);

impl Component for Echo {
    fn data(&self) -> &ComponentData {
        &self.0
    }

    fn data_mut(&mut self) -> &mut ComponentData {
        &mut self.0
    }

    fn required_components(&self) -> Result<IndexMap<String, ComponentData>> {
        Ok(IndexMap::from([("echo".to_string(), self.0.clone())]))
    }
}

/// Requires a counter one higher than itself, forever.
#[derive(Debug)]
struct Counter(ComponentData);

impl Component for Counter {
    fn data(&self) -> &ComponentData {
        &self.0
    }

    fn data_mut(&mut self) -> &mut ComponentData {
        &mut self.0
    }

    fn required_components(&self) -> Result<IndexMap<String, ComponentData>> {
        let n = self.0.get("n").and_then(Value::as_u64).unwrap_or(0);
        Ok(IndexMap::from([(
            "next".to_string(),
            data(json!({"component_type": "Counter", "n": n + 1})),
        )]))
    }
}

fn empty_schema(_: &SchemaIntrospector) -> Result<PropertyList> {
    Ok(PropertyList::new().with(PropertyDefinition::scalar("n")))
}

fn resolver() -> TypeResolver {
    let mut resolver = fixture_resolver();
    resolver.register(ComponentKind {
        name: "Echo",
        description: "Requires itself",
        schema: empty_schema,
        build: |data| -> Box<dyn Component> { Box::new(Echo(data)) },
    });
    resolver.register(ComponentKind {
        name: "Counter",
        description: "Requires its successor",
        schema: empty_schema,
        build: |data| -> Box<dyn Component> { Box::new(Counter(data)) },
    });
    resolver
}

fn collect(root: serde_json::Value) -> Result<ComponentCollection> {
    crate::test_utils::init_test_logging(None);
    let schemas = SchemaIntrospector::new(Arc::new(resolver()));
    ComponentCollector::new(&schemas).collect(data(root))
}

fn types_of(collection: &ComponentCollection, component_type: &str) -> Vec<ComponentId> {
    collection.ids().filter(|id| collection.component_type(*id) == component_type).collect()
}

#[test]
fn test_boolean_binding_spawns_one_component() {
    let collection =
        collect(json!({"base": "Thing", "root_name": "foo", "flag_property": true})).unwrap();
    let root = collection.root().unwrap();

    let widgets = types_of(&collection, "Widget");
    assert_eq!(widgets.len(), 1);
    let widget = widgets[0];
    assert_eq!(collection.local_name(widget), "widget");
    assert_eq!(collection.requester(widget), Some(root));
    assert_eq!(collection.request_path(widget), "root/widget");
    assert_eq!(collection.component(widget).data()["owner"], json!("anonymous"));
}

#[test]
fn test_false_flag_spawns_nothing() {
    let collection =
        collect(json!({"base": "Thing", "root_name": "foo", "flag_property": false})).unwrap();
    assert!(types_of(&collection, "Widget").is_empty());
}

#[test]
fn test_list_binding_sets_primary_property() {
    let collection =
        collect(json!({"base": "Thing", "root_name": "foo", "tags": ["a", "b"]})).unwrap();
    let root = collection.root().unwrap();

    let tags = types_of(&collection, "Tag");
    assert_eq!(tags.len(), 2);
    let names: Vec<&str> = tags.iter().map(|id| collection.local_name(*id)).collect();
    assert_eq!(names, ["a", "b"]);
    assert_eq!(collection.component(tags[0]).data()["tag_value"], json!("a"));
    assert_eq!(collection.component(tags[1]).data()["tag_value"], json!("b"));
    assert_eq!(collection.local_child(root, "b"), Some(tags[1]));
}

#[test]
fn test_duplicate_list_values_collide() {
    let err = collect(json!({"base": "Thing", "root_name": "foo", "tags": ["a", "a"]})).unwrap_err();
    assert!(matches!(err, ExtgenError::DuplicateLocalName { ref local_name, .. } if local_name == "a"));
}

#[test]
fn test_identical_merge_tags_register_alias() {
    let collection = collect(json!({
        "base": "Thing",
        "root_name": "foo",
        "perms": [{"permission": "edit"}, {"permission": "edit"}]
    }))
    .unwrap();
    let root = collection.root().unwrap();

    let perms = types_of(&collection, "Perm");
    assert_eq!(perms.len(), 1);
    assert_eq!(collection.local_child(root, "perm_0"), Some(perms[0]));
    assert_eq!(collection.local_child(root, "perm_1"), Some(perms[0]));
    assert_eq!(collection.len(), 2);
}

#[test]
fn test_merge_with_new_data_expands_again() {
    let collection = collect(json!({
        "base": "Thing",
        "root_name": "foo",
        "perms": [
            {"permission": "edit"},
            {"permission": "edit", "title": "Edit things", "requires": {"extra": {"component_type": "Tag", "tag_value": "x"}}}
        ]
    }))
    .unwrap();

    let perms = types_of(&collection, "Perm");
    assert_eq!(perms.len(), 1);
    let perm = perms[0];
    assert_eq!(collection.component(perm).data()["title"], json!("Edit things"));

    let extra = collection.local_child(perm, "extra").unwrap();
    assert_eq!(collection.component_type(extra), "Tag");
    assert_eq!(collection.request_path(extra), "root/perm_0/extra");
}

#[test]
fn test_conflicting_merge_is_data_loss() {
    let err = collect(json!({
        "base": "Thing",
        "root_name": "foo",
        "perms": [{"permission": "edit", "title": "A"}, {"permission": "edit", "title": "B"}]
    }))
    .unwrap_err();
    match err {
        ExtgenError::MergeDataLoss {
            path,
            property,
            ..
        } => {
            assert_eq!(path, "root/perm_0");
            assert_eq!(property, "title");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn test_required_name_colliding_with_bound_name() {
    let err = collect(json!({
        "base": "Thing",
        "root_name": "foo",
        "flag_property": true,
        "requires": {"widget": {"component_type": "Widget"}}
    }))
    .unwrap_err();
    assert!(matches!(
        err,
        ExtgenError::DuplicateLocalName { ref local_name, ref requester } if local_name == "widget" && requester == "root"
    ));
}

#[test]
fn test_missing_type() {
    let err = collect(json!({"root_name": "foo"})).unwrap_err();
    assert!(matches!(err, ExtgenError::MissingType { ref local_name } if local_name == "root"));

    let err = collect(json!({
        "base": "Thing",
        "root_name": "foo",
        "requires": {"child": {"title": "untyped"}}
    }))
    .unwrap_err();
    assert!(matches!(err, ExtgenError::MissingType { ref local_name } if local_name == "root/child"));
}

#[test]
fn test_unknown_type() {
    let err = collect(json!({
        "base": "Thing",
        "root_name": "foo",
        "requires": {"child": {"component_type": "Gizmo"}}
    }))
    .unwrap_err();
    assert!(matches!(err, ExtgenError::UnknownComponentType { ref component_type, .. } if component_type == "Gizmo"));
}

#[test]
fn test_self_requiring_component_is_cyclic() {
    let err = collect(json!({
        "base": "Thing",
        "root_name": "foo",
        "requires": {"loop": {"component_type": "Echo", "n": 1}}
    }))
    .unwrap_err();
    match err {
        ExtgenError::CyclicExpansion {
            chain,
        } => assert_eq!(chain, "root/loop -> root/loop/echo"),
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn test_unbounded_expansion_hits_depth_limit() {
    let schemas = SchemaIntrospector::new(Arc::new(resolver()));
    let err = ComponentCollector::new(&schemas)
        .with_max_depth(4)
        .collect(data(json!({
            "base": "Thing",
            "root_name": "foo",
            "requires": {"count": {"component_type": "Counter", "n": 0}}
        })))
        .unwrap_err();
    match err {
        ExtgenError::ExpansionDepthExceeded {
            limit,
            path,
        } => {
            assert_eq!(limit, 4);
            assert_eq!(path, "root/count/next/next/next/next");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn test_nearest_root_resolves_to_inner_root() {
    let mut collection = collect(json!({
        "base": "Thing",
        "root_name": "outer",
        "inners": [{"root_name": "inner", "leaves": ["l1"]}]
    }))
    .unwrap();

    let outer = collection.root().unwrap();
    let inner = collection.find_by_path("root/inner_0").unwrap();
    let leaf = collection.find_by_path("root/inner_0/l1").unwrap();
    let seed = collection.find_by_path("root/inner_0/l1/seed").unwrap();
    assert!(collection.is_root(inner));
    assert_eq!(collection.closest_root(inner), Some(outer));
    assert_eq!(collection.closest_root(seed), Some(inner));

    let tree = collection.derive_containment_tree().unwrap();
    assert_eq!(tree.parent(seed), Some(inner));
    assert_eq!(tree.parent(leaf), Some(inner));
    assert_eq!(tree.parent(inner), Some(outer));
    assert_eq!(tree.children(inner), [leaf, seed]);
}

#[test]
fn test_determinism() {
    let input = json!({
        "base": "Thing",
        "root_name": "foo",
        "flag_property": true,
        "tags": ["a", "b"],
        "perms": [{"permission": "edit"}, {"permission": "view"}, {"permission": "edit"}]
    });
    let mut first = collect(input.clone()).unwrap();
    let mut second = collect(input).unwrap();

    let describe = |collection: &ComponentCollection| -> Vec<(String, String, ComponentData)> {
        collection
            .ids()
            .map(|id| {
                (
                    collection.request_path(id).to_string(),
                    collection.component_type(id).to_string(),
                    collection.component(id).data().clone(),
                )
            })
            .collect()
    };
    assert_eq!(describe(&first), describe(&second));

    let first_tree = first.derive_containment_tree().unwrap().clone();
    let second_tree = second.derive_containment_tree().unwrap().clone();
    assert_eq!(first_tree, second_tree);
}

#[test]
fn test_expand_under_existing_requester() {
    let schemas = SchemaIntrospector::new(Arc::new(resolver()));
    let mut collector = ComponentCollector::new(&schemas);
    let root = collector
        .expand("root", data(json!({"base": "Thing", "root_name": "foo"})), None)
        .unwrap();

    let first = collector
        .expand("p", data(json!({"component_type": "Perm", "permission": "edit"})), Some(root))
        .unwrap();
    let again = collector
        .expand("q", data(json!({"component_type": "Perm", "permission": "edit"})), Some(root))
        .unwrap();
    assert_eq!(first, again);
    assert_eq!(collector.collection().local_child(root, "q"), Some(first));
    assert_eq!(collector.into_collection().len(), 2);
}
