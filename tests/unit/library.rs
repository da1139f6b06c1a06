use extgen_cli::assembler::{EmptyExtension, ExistingExtension, GeneratedFiles, MemoryExtension};
use extgen_cli::components;
use extgen_cli::core::ExtgenError;
use extgen_cli::generator::Generator;
use extgen_cli::test_utils::fixtures::data;
use extgen_cli::test_utils::init_test_logging;
use serde_json::{Value, json};

fn generate_with(spec: Value, extension: &dyn ExistingExtension) -> Result<GeneratedFiles, ExtgenError> {
    init_test_logging(None);
    Generator::new(components::resolver(10)).generate(data(spec), extension)
}

fn generate(spec: Value) -> Result<GeneratedFiles, ExtgenError> {
    generate_with(spec, &EmptyExtension)
}

#[test]
fn test_service_and_route_share_a_class() {
    let files = generate(json!({
        "base": "module",
        "root_name": "foo",
        "services": [{
            "service_name": "page_subscriber",
            "service_tag_type": "event_subscriber",
            "class_name": "Controller\\PageController",
        }],
        "router_items": [{"path": "/foo/page", "controller": "Controller\\PageController"}],
    }))
    .unwrap();

    let class = &files["src/Controller/PageController.php"].content;
    assert!(class.contains("namespace Drupal\\foo\\Controller;\n"), "{class}");
    assert!(
        class.contains("class PageController extends ControllerBase implements EventSubscriberInterface {"),
        "{class}"
    );
    assert!(class.contains("getSubscribedEvents()"), "{class}");
    assert!(class.contains("public function content()"), "{class}");

    let services: serde_yaml::Value = serde_yaml::from_str(&files["foo.services.yml"].content).unwrap();
    assert_eq!(
        services["services"]["foo.page_subscriber"]["class"].as_str(),
        Some("Drupal\\foo\\Controller\\PageController")
    );
}

#[test]
fn test_services_file_merges_with_existing() {
    let extension = MemoryExtension::new().with_file(
        "foo.services.yml",
        "services:\n  foo.legacy:\n    class: Drupal\\foo\\Legacy\n",
    );
    let files = generate_with(
        json!({"base": "module", "root_name": "foo", "services": [{"service_name": "fresh"}]}),
        &extension,
    )
    .unwrap();

    let file = &files["foo.services.yml"];
    assert!(file.exists);
    assert!(file.merged);

    let services: serde_yaml::Value = serde_yaml::from_str(&file.content).unwrap();
    assert_eq!(services["services"]["foo.legacy"]["class"].as_str(), Some("Drupal\\foo\\Legacy"));
    assert_eq!(services["services"]["foo.fresh"]["class"].as_str(), Some("Drupal\\foo\\Fresh"));

    // PHP files are never merged, only reported as existing.
    assert!(!files["src/Fresh.php"].exists);
}

#[test]
fn test_nested_module_permissions_do_not_merge_with_parent() {
    let files = generate(json!({
        "base": "module",
        "root_name": "foo",
        "permissions": [{"permission": "administer foo", "title": "Parent title"}],
        "test_modules": [{
            "root_name": "foo_test",
            "permissions": [{"permission": "administer foo", "title": "Test title"}],
        }],
    }))
    .unwrap();

    assert_eq!(files["foo.permissions.yml"].content, "administer foo:\n  title: Parent title\n");
    assert_eq!(
        files["tests/modules/foo_test/foo_test.permissions.yml"].content,
        "administer foo:\n  title: Test title\n"
    );
}

#[test]
fn test_same_permission_from_route_and_form() {
    let files = generate(json!({
        "base": "module",
        "root_name": "foo",
        "router_items": [{"path": "/foo", "permission": "access foo"}],
        "forms": [{"form_class": "FilterForm", "form_path": "/foo/filter", "permission": "access foo"}],
    }))
    .unwrap();

    assert_eq!(files["foo.permissions.yml"].content, "access foo:\n  title: Access foo\n");

    let routing: serde_yaml::Value = serde_yaml::from_str(&files["foo.routing.yml"].content).unwrap();
    assert_eq!(routing["foo.foo"]["requirements"]["_permission"].as_str(), Some("access foo"));
    assert_eq!(routing["foo.foo_filter"]["defaults"]["_form"].as_str(), Some("\\Drupal\\foo\\Form\\FilterForm"));
}

#[test]
fn test_generation_is_deterministic() {
    let spec = json!({
        "base": "module",
        "root_name": "foo",
        "permissions": [{"permission": "b perm"}, {"permission": "a perm"}],
        "hooks": ["cron", "install"],
        "plugins": [{"plugin_type": "block", "plugin_name": "one"}],
        "readme": true,
    });
    let first = generate(spec.clone()).unwrap();
    let second = generate(spec).unwrap();

    assert_eq!(first, second);
    assert_eq!(
        first.keys().collect::<Vec<_>>(),
        second.keys().collect::<Vec<_>>()
    );
}
