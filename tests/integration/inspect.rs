use predicates::prelude::*;

use crate::common::{TestProject, fixture};

#[test]
fn test_types_lists_builtin_library() {
    let project = TestProject::new().unwrap();

    let output = project.run_extgen(&["types"]).unwrap();
    output
        .assert_success()
        .assert_stdout_contains("Component types (core version 10)")
        .assert_stdout_contains("Permission")
        .assert_stdout_contains("InfoFile7");
    assert!(!output.stdout.contains("(active)"), "{}", output.stdout);

    project
        .command()
        .args(["types", "--core-version", "7"])
        .assert()
        .success()
        .stdout(predicate::str::contains("InfoFile7 (active)"));
}

#[test]
fn test_types_json() {
    let project = TestProject::new().unwrap();
    let output = project.run_extgen(&["types", "--format", "json"]).unwrap();
    output.assert_success();

    let value: serde_json::Value = serde_json::from_str(&output.stdout).unwrap();
    assert_eq!(value["core_version"], 10);
    let names: Vec<&str> = value["types"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|entry| entry["name"].as_str())
        .collect();
    assert!(names.contains(&"Module"), "{names:?}");
    assert!(names.contains(&"RouterItem"), "{names:?}");
}

#[test]
fn test_schema_shows_properties() {
    let project = TestProject::new().unwrap();

    let output = project.run_extgen(&["schema", "module"]).unwrap();
    output
        .assert_success()
        .assert_stdout_contains("root_name (scalar) [primary, required]")
        .assert_stdout_contains("permissions (compound) -> Permission")
        .assert_stdout_contains("<TestModule> deferred");

    project
        .command()
        .args(["schema", "InfoFile", "--core-version", "7"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("InfoFile7\n"))
        .stdout(predicate::str::contains("core (scalar)"));
}

#[test]
fn test_tree_text_and_json() {
    let project = TestProject::new().unwrap();
    project.write_spec("legacy.yml", &fixture("legacy_module.yml")).unwrap();

    project
        .run_extgen(&["tree", "legacy.yml"])
        .unwrap()
        .assert_success()
        .assert_stdout_contains("permission_0: Permission (in root/permission_0/permissions_file)")
        .assert_stdout_contains("info: InfoFile (in root)");

    let output = project.run_extgen(&["tree", "legacy.yml", "--format", "json", "--core-version", "7"]).unwrap();
    output.assert_success();
    let value: serde_json::Value = serde_json::from_str(&output.stdout).unwrap();
    let components = value["components"].as_array().unwrap();
    let info = components.iter().find(|component| component["path"] == "root/info").unwrap();
    assert_eq!(info["type"], "InfoFile7");
    assert_eq!(info["container"], "root");
    assert_eq!(components[0]["is_root"], true);
}
