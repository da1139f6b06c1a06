use predicates::prelude::*;

use crate::common::{FileAssert, TestProject, fixture};

#[test]
fn test_unknown_component_type() {
    let project = TestProject::new().unwrap();
    project.write_spec("broken.yml", &fixture("unknown_type.yml")).unwrap();

    let output = project.run_extgen(&["generate", "broken.yml"]).unwrap();
    output
        .assert_failure()
        .assert_stderr_contains("error: Unknown component type")
        .assert_stderr_contains("Did you mean: ")
        .assert_stderr_contains("Module")
        .assert_stderr_contains("extgen types");
    assert_eq!(output.code, Some(1));
    FileAssert::not_exists(project.project_path().join("broken"));
}

#[test]
fn test_conflicting_merge_names_property() {
    let project = TestProject::new().unwrap();
    project.write_spec("clash.yml", &fixture("conflicting_permissions.yml")).unwrap();

    project
        .command()
        .args(["generate", "clash.yml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("property 'title' would lose information"))
        .stderr(predicate::str::contains("First title"))
        .stderr(predicate::str::contains("Second title"));
    FileAssert::not_exists(project.project_path().join("clash"));
}

#[test]
fn test_missing_spec_file() {
    let project = TestProject::new().unwrap();

    project
        .run_extgen(&["generate", "absent.yml"])
        .unwrap()
        .assert_failure()
        .assert_stderr_contains("absent.yml");
}

#[test]
fn test_invalid_spec_syntax() {
    let project = TestProject::new().unwrap();
    project.write_spec("bad.yml", "base: module\nroot_name: [unclosed\n").unwrap();
    project.write_spec("list.yml", "- base\n- module\n").unwrap();

    project
        .run_extgen(&["generate", "bad.yml"])
        .unwrap()
        .assert_failure()
        .assert_stderr_contains("top-level 'base' key");
    project
        .run_extgen(&["tree", "list.yml"])
        .unwrap()
        .assert_failure()
        .assert_stderr_contains("must be a mapping");
}

#[test]
fn test_missing_required_root_name() {
    let project = TestProject::new().unwrap();
    project.write_spec("nameless.yml", "base: module\nreadme: true\n").unwrap();

    project
        .run_extgen(&["generate", "nameless.yml", "--output", "out"])
        .unwrap()
        .assert_failure()
        .assert_stderr_contains("Required property 'root_name'")
        .assert_stderr_contains("Set 'root_name' in the specification");
}

#[test]
fn test_invalid_configuration() {
    let project = TestProject::new().unwrap();
    project.write_config("core_version = \"ten\"\n").unwrap();

    project.command().arg("types").assert().failure().stderr(predicate::str::contains("TOML"));
}

#[test]
fn test_unknown_schema_type() {
    let project = TestProject::new().unwrap();
    project
        .run_extgen(&["schema", "Permision"])
        .unwrap()
        .assert_failure()
        .assert_stderr_contains("Permission");
}
