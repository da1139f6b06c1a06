use extgen_cli::collection::ComponentCollection;
use extgen_cli::core::ExtgenError;
use extgen_cli::generator::Generator;
use extgen_cli::test_utils::fixtures::{data, fixture_resolver};
use extgen_cli::test_utils::init_test_logging;
use serde_json::{Value, json};

fn collect(spec: Value) -> Result<ComponentCollection, ExtgenError> {
    init_test_logging(None);
    Generator::new(fixture_resolver()).collect(data(spec))
}

fn count_of(collection: &ComponentCollection, component_type: &str) -> usize {
    collection.ids().filter(|id| collection.component_type(*id) == component_type).count()
}

#[test]
fn test_widget_acquires_from_root() {
    let collection = collect(json!({"base": "thing", "root_name": "shop", "flag_property": true})).unwrap();
    let widget = collection.find_by_path("root/widget").unwrap();
    let widget_data = collection.component(widget).data();

    assert_eq!(widget_data["owner"], json!("anonymous"));
    assert_eq!(widget_data["label"], json!("SHOP"));
}

#[test]
fn test_root_presets_apply_during_collection() {
    let collection = collect(json!({"base": "Sized", "size": "large"})).unwrap();
    let root = collection.root().unwrap();
    let root_data = collection.component(root).data();

    assert_eq!(root_data["max_items"], json!(100));
    assert_eq!(root_data["label"], json!("Big"));
}

#[test]
fn test_merging_is_scoped_by_root() {
    let collection = collect(json!({
        "base": "Thing",
        "root_name": "outer",
        "perms": [{"permission": "edit"}],
        "inners": [
            {
                "root_name": "a",
                "requires": {
                    "p": {"component_type": "Perm", "permission": "edit"},
                    "q": {"component_type": "Perm", "permission": "edit", "roles": ["admin"]},
                },
            },
            {
                "root_name": "b",
                "requires": {"p": {"component_type": "Perm", "permission": "edit"}},
            },
        ],
    }))
    .unwrap();

    assert_eq!(count_of(&collection, "Perm"), 3);

    let inner_a = collection.find_by_path("root/inner_0").unwrap();
    let p = collection.local_child(inner_a, "p").unwrap();
    assert_eq!(collection.local_child(inner_a, "q"), Some(p));
    assert_eq!(collection.component(p).data()["roles"], json!(["admin"]));
}

#[test]
fn test_containment_follows_tokens() {
    let mut collection = collect(json!({
        "base": "Thing",
        "root_name": "foo",
        "tags": ["red"],
        "perms": [{"permission": "edit", "requires": {"note": {"component_type": "Tag", "tag_value": "x"}}}],
    }))
    .unwrap();

    let root = collection.root().unwrap();
    let tag = collection.find_by_path("root/red").unwrap();
    let perm = collection.find_by_path("root/perm_0").unwrap();
    let note = collection.find_by_path("root/perm_0/note").unwrap();

    let tree = collection.derive_containment_tree().unwrap();
    assert_eq!(tree.parent(tag), Some(root));
    assert_eq!(tree.parent(perm), Some(root));
    assert_eq!(tree.parent(note), Some(perm));
    assert_eq!(tree.parent(root), None);
}

#[test]
fn test_unknown_root_type_suggests_alternatives() {
    let err = collect(json!({"base": "Thinh", "root_name": "foo"})).unwrap_err();
    match err {
        ExtgenError::UnknownComponentType {
            component_type,
            suggestions,
        } => {
            assert_eq!(component_type, "Thinh");
            assert!(suggestions.contains(&"Thing".to_string()), "{suggestions:?}");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn test_missing_required_root_property() {
    let err = collect(json!({"base": "Thing"})).unwrap_err();
    assert!(matches!(
        err,
        ExtgenError::MissingRequiredProperty { ref property, .. } if property == "root_name"
    ));
}
