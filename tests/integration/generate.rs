use std::path::Path;

use extgen_cli::assembler::EmptyExtension;
use extgen_cli::components;
use extgen_cli::generator::{Generator, parse_spec};
use extgen_cli::test_utils::init_test_logging;

use crate::common::{FileAssert, TestProject, fixture};

const FULL_MODULE_FILES: &[&str] = &[
    "README.md",
    "shop_tools.info.yml",
    "shop_tools.install",
    "shop_tools.module",
    "shop_tools.permissions.yml",
    "shop_tools.routing.yml",
    "shop_tools.services.yml",
    "src/Controller/ReportController.php",
    "src/Form/SettingsForm.php",
    "src/OrderSubscriber.php",
    "src/Plugin/Block/CartSummary.php",
    "src/Plugin/QueueWorker/OrderMailer.php",
    "src/PriceCalculator.php",
    "tests/modules/shop_tools_test/shop_tools_test.info.yml",
    "tests/modules/shop_tools_test/shop_tools_test.module",
];

fn generate_fixture(name: &str, core_version: u32) -> extgen_cli::assembler::GeneratedFiles {
    init_test_logging(None);
    let spec = parse_spec(Path::new(name), &fixture(name)).unwrap();
    Generator::new(components::resolver(core_version)).generate(spec, &EmptyExtension).unwrap()
}

#[test]
fn test_full_module_file_set() {
    let files = generate_fixture("full_module.yml", 10);

    let mut paths: Vec<&str> = files.keys().map(String::as_str).collect();
    paths.sort_unstable();
    assert_eq!(paths, FULL_MODULE_FILES);
    assert!(files.values().all(|file| !file.exists && !file.merged));
}

#[test]
fn test_full_module_contents() {
    let files = generate_fixture("full_module.yml", 10);

    assert_eq!(
        files["shop_tools.info.yml"].content,
        "name: Shop Tools\ntype: module\ndescription: Helpers for running the shop.\npackage: Custom\n\
         core_version_requirement: ^10 || ^11\ndependencies:\n- drupal:node\n- drupal:views\n"
    );

    // Route and form permissions merged into the declared ones.
    assert_eq!(
        files["shop_tools.permissions.yml"].content,
        "administer shop tools:\n  title: Administer Shop Tools\n  restrict access: true\n\
         view shop reports:\n  title: View shop reports\n"
    );

    let routing: serde_yaml::Value = serde_yaml::from_str(&files["shop_tools.routing.yml"].content).unwrap();
    let reports = &routing["shop_tools.shop_reports"];
    assert_eq!(reports["path"].as_str(), Some("/shop/reports"));
    assert_eq!(
        reports["defaults"]["_controller"].as_str(),
        Some("\\Drupal\\shop_tools\\Controller\\ReportController::content")
    );
    let settings = &routing["shop_tools.admin_config_shop_tools"];
    assert_eq!(settings["defaults"]["_form"].as_str(), Some("\\Drupal\\shop_tools\\Form\\SettingsForm"));
    assert_eq!(settings["requirements"]["_permission"].as_str(), Some("administer shop tools"));

    let module = &files["shop_tools.module"].content;
    assert!(module.contains("function shop_tools_cron() {"), "{module}");
    assert!(module.contains("function shop_tools_form_alter("), "{module}");
    assert!(files["shop_tools.install"].content.contains("function shop_tools_install() {"));

    let test_module = &files["tests/modules/shop_tools_test/shop_tools_test.module"].content;
    assert!(test_module.contains("function shop_tools_test_cron() {"), "{test_module}");

    let form = &files["src/Form/SettingsForm.php"].content;
    assert!(form.contains("return 'shop_tools_settings_form';"), "{form}");

    // No token survives assembly.
    for (path, file) in &files {
        assert!(!path.contains('%'), "{path}");
        assert!(!file.content.contains("%module"), "{path}: {}", file.content);
    }
}

#[test]
fn test_legacy_module() {
    let files = generate_fixture("legacy_module.yml", 7);

    let mut paths: Vec<&str> = files.keys().map(String::as_str).collect();
    paths.sort_unstable();
    assert_eq!(paths, ["legacy.info", "legacy.permissions.yml"]);
    assert_eq!(
        files["legacy.info"].content,
        "name = Legacy\ndescription = A module for old sites\ncore = 7.x\npackage = Custom\n\
         dependencies[] = views\n"
    );
}

#[test]
fn test_json_spec_with_test_module() {
    let files = generate_fixture("with_test_module.json", 10);

    assert!(files["parent.info.yml"].content.contains("description: Provides Parent functionality.\n"));
    let info = &files["tests/modules/parent_test/parent_test.info.yml"].content;
    assert!(info.contains("dependencies:\n- drupal:parent\n"), "{info}");
    assert!(info.contains("hidden: true\n"), "{info}");
    assert_eq!(
        files["tests/modules/parent_test/parent_test.permissions.yml"].content,
        "use parent test:\n  title: Use parent test\n"
    );
    assert!(!files.contains_key("parent.permissions.yml"));
}

#[test]
fn test_cli_generate_writes_files() {
    let project = TestProject::new().unwrap();
    project.write_spec("shop.yml", &fixture("full_module.yml")).unwrap();

    let output = project.run_extgen(&["generate", "shop.yml"]).unwrap();
    output.assert_success().assert_stdout_contains("15 new").assert_stdout_contains("0 skipped");

    let out = project.project_path().join("shop_tools");
    for path in FULL_MODULE_FILES {
        FileAssert::exists(out.join(path));
    }
    FileAssert::contains(out.join("README.md"), "# Shop Tools\n");
}

#[test]
fn test_cli_regenerate_merges_and_skips() {
    let project = TestProject::new().unwrap();
    project.write_spec("shop.yml", &fixture("full_module.yml")).unwrap();
    project.run_extgen(&["generate", "shop.yml"]).unwrap().assert_success();

    let info_before = project.read_file("shop_tools/shop_tools.info.yml").unwrap();
    project.create_file("shop_tools/shop_tools.module", "<?php\n// edited by hand\n").unwrap();

    let output = project.run_extgen(&["generate", "shop.yml"]).unwrap();
    output
        .assert_success()
        .assert_stdout_contains("0 new")
        .assert_stdout_contains("5 merged")
        .assert_stdout_contains("10 skipped");

    assert_eq!(project.read_file("shop_tools/shop_tools.info.yml").unwrap(), info_before);
    assert_eq!(project.read_file("shop_tools/shop_tools.module").unwrap(), "<?php\n// edited by hand\n");

    let forced = project.run_extgen(&["generate", "shop.yml", "--force"]).unwrap();
    forced.assert_success().assert_stdout_contains("10 overwritten");
    FileAssert::contains(project.project_path().join("shop_tools/shop_tools.module"), "function shop_tools_cron()");
}

#[test]
fn test_cli_generate_keeps_hand_added_yaml_keys() {
    let project = TestProject::new().unwrap();
    project.write_spec("legacy.yml", &fixture("legacy_module.yml")).unwrap();
    project
        .create_file("out/legacy.permissions.yml", "custom permission:\n  title: Custom\n")
        .unwrap();

    project.run_extgen(&["generate", "legacy.yml", "--output", "out"]).unwrap().assert_success();

    let permissions = project.read_file("out/legacy.permissions.yml").unwrap();
    assert!(permissions.contains("custom permission:\n  title: Custom\n"), "{permissions}");
    assert!(permissions.contains("access legacy:\n  title: Access legacy\n"), "{permissions}");
    FileAssert::contains(project.project_path().join("out/legacy.info.yml"), "name: Legacy\n");
}

#[test]
fn test_cli_dry_run_and_core_version() {
    let project = TestProject::new().unwrap();
    project.write_spec("legacy.yml", &fixture("legacy_module.yml")).unwrap();

    project
        .command()
        .args(["generate", "legacy.yml", "--dry-run", "--core-version", "7"])
        .assert()
        .success()
        .stdout(predicates::str::contains("==> legacy.info (create)"))
        .stdout(predicates::str::contains("core = 7.x"))
        .stdout(predicates::str::contains("Dry run"));
    FileAssert::not_exists(project.project_path().join("legacy"));
}

#[test]
fn test_cli_config_sets_output_and_version() {
    let project = TestProject::new().unwrap();
    project.write_config("core_version = 7\noutput_dir = \"modules\"\n").unwrap();
    project.write_spec("legacy.yml", &fixture("legacy_module.yml")).unwrap();

    project.run_extgen(&["generate", "legacy.yml"]).unwrap().assert_success();
    FileAssert::exists(project.project_path().join("modules/legacy/legacy.info"));
    FileAssert::not_exists(project.project_path().join("modules/legacy/legacy.info.yml"));
}
