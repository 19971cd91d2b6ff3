//! Integration tests for the actionsgate CLI
//!
//! Only behavior that is decided before any request is sent is covered here.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

#[allow(deprecated)]
fn get_cmd() -> Command {
    let mut cmd = Command::cargo_bin("actionsgate").unwrap();
    cmd.env_remove("ACTIONSGATE_ORG");
    cmd
}

fn write_config(dir: &TempDir, content: &str) {
    fs::write(dir.path().join(".actionsgate.toml"), content).unwrap();
}

#[test]
fn test_init_command_creates_config() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join(".actionsgate.toml");

    get_cmd()
        .current_dir(temp_dir.path())
        .args([
            "init",
            "--preset",
            "restricted",
            "--org",
            "acme",
            "--non-interactive",
            "--skip-checks",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("restricted"));

    let content = fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("preset = \"restricted\""));
    assert!(content.contains("organization = \"acme\""));
    assert!(content.contains("allowed_actions = \"selected\""));
}

#[test]
fn test_init_command_with_every_preset() {
    let expected = [
        ("permissive", "allowed_actions = \"all\""),
        ("restricted", "verified_allowed = true"),
        ("local-only", "allowed_actions = \"local_only\""),
        ("disabled", "enabled_repositories = \"disabled\""),
    ];

    for (preset, needle) in expected {
        let temp_dir = TempDir::new().unwrap();

        get_cmd()
            .current_dir(temp_dir.path())
            .args(["init", "--preset", preset, "--non-interactive", "--skip-checks"])
            .assert()
            .success();

        let content = fs::read_to_string(temp_dir.path().join(".actionsgate.toml")).unwrap();
        assert!(
            content.contains(needle),
            "preset {} should contain {}",
            preset,
            needle
        );
    }
}

#[test]
fn test_init_refuses_to_overwrite_without_force() {
    let temp_dir = TempDir::new().unwrap();
    write_config(&temp_dir, "# hand written\n");

    get_cmd()
        .current_dir(temp_dir.path())
        .args(["init", "--non-interactive", "--skip-checks"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("already exists"));

    let content = fs::read_to_string(temp_dir.path().join(".actionsgate.toml")).unwrap();
    assert_eq!(content, "# hand written\n");
}

#[test]
fn test_init_force_overwrites() {
    let temp_dir = TempDir::new().unwrap();
    write_config(&temp_dir, "# hand written\n");

    get_cmd()
        .current_dir(temp_dir.path())
        .args(["init", "--non-interactive", "--skip-checks", "--force"])
        .assert()
        .success();

    let content = fs::read_to_string(temp_dir.path().join(".actionsgate.toml")).unwrap();
    assert!(content.contains("[policy]"));
}

#[test]
fn test_init_unknown_preset_is_invalid_config() {
    let temp_dir = TempDir::new().unwrap();

    get_cmd()
        .current_dir(temp_dir.path())
        .args(["init", "--preset", "yolo", "--non-interactive", "--skip-checks"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Unknown preset"));

    assert!(!temp_dir.path().join(".actionsgate.toml").exists());
}

#[test]
fn test_plan_rejects_allowed_actions_with_selected_repositories() {
    let temp_dir = TempDir::new().unwrap();
    write_config(
        &temp_dir,
        r#"
[github]
api_url = "http://127.0.0.1:9"

[policy]
organization = "acme"
enabled_repositories = "selected"
allowed_actions = "all"
"#,
    );

    get_cmd()
        .current_dir(temp_dir.path())
        .arg("plan")
        .assert()
        .code(4)
        .stderr(predicate::str::contains("selected repositories"));
}

#[test]
fn test_apply_rejects_allowed_actions_with_disabled_repositories() {
    let temp_dir = TempDir::new().unwrap();
    write_config(
        &temp_dir,
        r#"
[github]
api_url = "http://127.0.0.1:9"

[policy]
organization = "acme"
enabled_repositories = "disabled"
allowed_actions = "local_only"
"#,
    );

    get_cmd()
        .current_dir(temp_dir.path())
        .args(["apply", "--yes"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("disabled"));

    assert!(!temp_dir.path().join(".actionsgate").exists());
}

#[test]
fn test_plan_without_organization_is_invalid_config() {
    let temp_dir = TempDir::new().unwrap();

    get_cmd()
        .current_dir(temp_dir.path())
        .arg("plan")
        .assert()
        .code(4)
        .stderr(predicate::str::contains("No organization configured"));
}

#[test]
fn test_import_rejects_malformed_identifier() {
    let temp_dir = TempDir::new().unwrap();

    get_cmd()
        .current_dir(temp_dir.path())
        .args(["import", "/github-allowed-action"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Invalid policy identifier"));
}

#[test]
fn test_malformed_config_is_invalid_config() {
    let temp_dir = TempDir::new().unwrap();
    write_config(&temp_dir, "[policy\norganization = ");

    get_cmd()
        .current_dir(temp_dir.path())
        .arg("snapshot")
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Failed to parse config"));
}

#[test]
fn test_generate_man_writes_page() {
    let temp_dir = TempDir::new().unwrap();

    get_cmd()
        .args(["generate-man", "--output"])
        .arg(temp_dir.path())
        .assert()
        .success();

    assert!(temp_dir.path().join("actionsgate.1").exists());
}

#[test]
fn test_help_lists_commands() {
    get_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("plan"))
        .stdout(predicate::str::contains("snapshot"))
        .stdout(predicate::str::contains("reset"));
}
