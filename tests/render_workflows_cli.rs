//! CLI tests for `render-workflows`.

use std::fs;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

fn startup_api(dir: &tempfile::TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("startup-api");
    cmd.current_dir(dir.path()).env_remove("RUST_LOG");
    cmd
}

const TABLE: &str = "\
- name: erp
  display: Odoo ERP
  image: odoo:17.0
  port: 8069
  health_path: /web/login
";

#[test]
fn help_lists_subcommands() {
    let dir = tempfile::tempdir().unwrap();
    startup_api(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("render-workflows"));
}

#[test]
fn renders_bundled_table() {
    let dir = tempfile::tempdir().unwrap();
    startup_api(&dir)
        .args(["render-workflows", "--output", "out"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Generated 11 workflow files"));

    let erp = fs::read_to_string(dir.path().join("out/deploy-erp.yml")).unwrap();
    assert!(erp.contains("name: Deploy Odoo ERP"));
    assert!(dir.path().join("out/deploy-educacion.yml").is_file());
}

#[test]
fn check_passes_after_render_and_fails_on_drift() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("products.yml"), TABLE).unwrap();
    let args = ["render-workflows", "--products", "products.yml", "--output", "wf"];

    startup_api(&dir).args(args).assert().success();
    startup_api(&dir)
        .args(args)
        .arg("--check")
        .assert()
        .success()
        .stdout(predicate::str::contains("1 workflow files up to date"));

    fs::write(dir.path().join("wf/deploy-erp.yml"), "stale\n").unwrap();
    fs::write(dir.path().join("wf/deploy-old.yml"), "gone\n").unwrap();
    startup_api(&dir)
        .args(args)
        .arg("--check")
        .assert()
        .failure()
        .stdout(predicate::str::contains("--- a/deploy-erp.yml"))
        .stdout(predicate::str::contains("-stale"))
        .stdout(predicate::str::contains("+++ /dev/null"))
        .stderr(predicate::str::contains("out of date"));

    // --check never writes.
    assert_eq!(
        fs::read_to_string(dir.path().join("wf/deploy-erp.yml")).unwrap(),
        "stale\n"
    );
}

#[test]
fn invalid_table_fails_with_context() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("products.yml"), "- name: Bad Name\n").unwrap();
    startup_api(&dir)
        .args(["render-workflows", "--products", "products.yml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("products.yml"));
}
