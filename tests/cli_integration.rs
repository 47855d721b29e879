//! CLI integration tests for Roadmap
//!
//! These tests verify the complete workflow from initialization through
//! product, milestone, and dependency management.

use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

/// Get a command instance for the roadmap binary
fn roadmap_cmd() -> assert_cmd::Command {
    assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("roadmap"))
}

/// Create a temporary directory and initialize a roadmap project
fn setup_project() -> TempDir {
    let dir = TempDir::new().unwrap();
    roadmap_cmd().arg("init").arg(dir.path()).assert().success();
    dir
}

/// Run a command with JSON output and parse stdout
fn json_out(dir: &TempDir, args: &[&str]) -> Value {
    let assert = roadmap_cmd()
        .current_dir(dir.path())
        .args(["--format", "json"])
        .args(args)
        .assert()
        .success();
    serde_json::from_slice(&assert.get_output().stdout).unwrap()
}

fn id_of(value: &Value) -> String {
    value["id"].as_str().unwrap().to_string()
}

fn add_product(dir: &TempDir, name: &str) -> String {
    id_of(&json_out(dir, &["product", "add", name]))
}

// =============================================================================
// Initialization Tests
// =============================================================================

#[test]
fn test_init_creates_structure() {
    let dir = TempDir::new().unwrap();

    roadmap_cmd()
        .arg("init")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized roadmap project"));

    assert!(dir.path().join(".roadmap").is_dir());
    assert!(dir.path().join(".roadmap/config.toml").is_file());
    assert!(dir.path().join(".roadmap/roadmap.db").is_file());
    assert!(dir.path().join(".roadmap/.gitignore").is_file());
}

#[test]
fn test_init_refuses_existing_project() {
    let dir = TempDir::new().unwrap();

    roadmap_cmd().arg("init").arg(dir.path()).assert().success();
    roadmap_cmd()
        .arg("init")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_commands_require_a_project() {
    let dir = TempDir::new().unwrap();

    roadmap_cmd()
        .current_dir(dir.path())
        .args(["product", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("roadmap init"));
}

// =============================================================================
// Product Tests
// =============================================================================

#[test]
fn test_product_add_and_show() {
    let dir = setup_project();

    let product_id = add_product(&dir, "Gadget");

    roadmap_cmd()
        .current_dir(dir.path())
        .args(["product", "show", &product_id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Gadget"))
        .stdout(predicate::str::contains("not_active"));
}

#[test]
fn test_product_list() {
    let dir = setup_project();
    add_product(&dir, "Gadget");
    add_product(&dir, "Widget");

    let listed = json_out(&dir, &["product", "list"]);
    assert_eq!(listed.as_array().unwrap().len(), 2);
}

#[test]
fn test_activation_requires_pricing_committee_approval() {
    let dir = setup_project();
    let product_id = add_product(&dir, "Gadget");

    roadmap_cmd()
        .current_dir(dir.path())
        .args(["product", "lifecycle", &product_id, "active"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Pricing Committee Approval"));

    json_out(
        &dir,
        &[
            "milestone",
            "add",
            &product_id,
            "Pricing Committee Approval",
            "--start",
            "2024-01-01",
        ],
    );

    roadmap_cmd()
        .current_dir(dir.path())
        .args(["product", "lifecycle", &product_id, "active"])
        .assert()
        .success()
        .stdout(predicate::str::contains("active"));
}

#[test]
fn test_plain_user_cannot_mutate() {
    let dir = setup_project();

    let config_path = dir.path().join(".roadmap/config.toml");
    fs::write(&config_path, "[actor]\nname = \"eve\"\nrole = \"user\"\n").unwrap();

    roadmap_cmd()
        .current_dir(dir.path())
        .args(["product", "add", "Gadget"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("forbidden"));
}

// =============================================================================
// Milestone Tests
// =============================================================================

#[test]
fn test_milestone_add_and_list() {
    let dir = setup_project();
    let product_id = add_product(&dir, "Gadget");

    let milestone = json_out(
        &dir,
        &[
            "milestone",
            "add",
            &product_id,
            "Beta",
            "--start",
            "2024-01-01",
            "--end",
            "2024-02-01",
            "--type",
            "beta",
        ],
    );
    assert_eq!(milestone["label"], "Beta");
    assert_eq!(milestone["type"], "beta");

    roadmap_cmd()
        .current_dir(dir.path())
        .args(["milestone", "list", &product_id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Beta"))
        .stdout(predicate::str::contains("2024-02-01"));
}

#[test]
fn test_milestone_rejects_end_before_start() {
    let dir = setup_project();
    let product_id = add_product(&dir, "Gadget");

    roadmap_cmd()
        .current_dir(dir.path())
        .args([
            "milestone",
            "add",
            &product_id,
            "Beta",
            "--start",
            "2024-02-01",
            "--end",
            "2024-01-01",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "end_date must be greater than or equal to start_date",
        ));

    let listed = json_out(&dir, &["milestone", "list", &product_id]);
    assert!(listed.as_array().unwrap().is_empty());
}

#[test]
fn test_failed_update_leaves_milestone_unchanged() {
    let dir = setup_project();
    let product_id = add_product(&dir, "Gadget");

    let milestone = json_out(
        &dir,
        &[
            "milestone",
            "add",
            &product_id,
            "Beta",
            "--start",
            "2024-01-01",
            "--end",
            "2024-02-01",
        ],
    );
    let id = id_of(&milestone);

    roadmap_cmd()
        .current_dir(dir.path())
        .args(["milestone", "update", &id, "--start", "2024-03-01"])
        .assert()
        .failure();

    let stored = json_out(&dir, &["milestone", "show", &id]);
    assert_eq!(stored["start_date"], "2024-01-01");
    assert_eq!(stored["end_date"], "2024-02-01");
}

#[test]
fn test_certify_requires_tested_successfully() {
    let dir = setup_project();
    let product_id = add_product(&dir, "Gadget");

    roadmap_cmd()
        .current_dir(dir.path())
        .args([
            "milestone", "add", &product_id, "Certify", "--start", "2024-03-01",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Tested Successfully"));

    json_out(
        &dir,
        &[
            "milestone",
            "add",
            &product_id,
            "Tested Successfully",
            "--start",
            "2024-02-01",
        ],
    );

    roadmap_cmd()
        .current_dir(dir.path())
        .args([
            "milestone", "add", &product_id, "Certify", "--start", "2024-03-01",
        ])
        .assert()
        .success();
}

#[test]
fn test_certify_prerequisite_is_version_scoped() {
    let dir = setup_project();
    let product_id = add_product(&dir, "Gadget");

    // Prerequisite exists only under one version scope
    json_out(
        &dir,
        &[
            "milestone",
            "add",
            &product_id,
            "Tested Successfully",
            "--start",
            "2024-02-01",
            "--version",
            "v-1234abc",
        ],
    );

    // Unscoped Certify does not see it
    roadmap_cmd()
        .current_dir(dir.path())
        .args([
            "milestone", "add", &product_id, "Certify", "--start", "2024-03-01",
        ])
        .assert()
        .failure();

    // Certify in the same version scope does
    roadmap_cmd()
        .current_dir(dir.path())
        .args([
            "milestone",
            "add",
            &product_id,
            "Certify",
            "--start",
            "2024-03-01",
            "--version",
            "v-1234abc",
        ])
        .assert()
        .success();
}

// =============================================================================
// Dependency Tests
// =============================================================================

fn add_milestone(dir: &TempDir, product_id: &str, label: &str, start: &str) -> String {
    id_of(&json_out(
        dir,
        &["milestone", "add", product_id, label, "--start", start],
    ))
}

#[test]
fn test_dep_add_and_list() {
    let dir = setup_project();
    let product_id = add_product(&dir, "Gadget");
    let alpha = add_milestone(&dir, &product_id, "Alpha", "2024-01-01");
    let beta = add_milestone(&dir, &product_id, "Beta", "2024-02-01");

    let edge = json_out(&dir, &["dep", "add", &alpha, &beta, "--type", "ss"]);
    assert_eq!(edge["type"], "SS");

    let listed = json_out(&dir, &["dep", "list", "--product", &product_id]);
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(id_of(&listed[0]), id_of(&edge));

    let by_target = json_out(&dir, &["dep", "list", "--target", &beta]);
    assert_eq!(by_target.as_array().unwrap().len(), 1);
    assert!(json_out(&dir, &["dep", "list", "--target", &alpha])
        .as_array()
        .unwrap()
        .is_empty());
}

#[test]
fn test_dep_requires_existing_endpoints() {
    let dir = setup_project();
    let product_id = add_product(&dir, "Gadget");
    let alpha = add_milestone(&dir, &product_id, "Alpha", "2024-01-01");

    roadmap_cmd()
        .current_dir(dir.path())
        .args(["dep", "add", &alpha, "m-0000000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_dep_survives_endpoint_deletion() {
    let dir = setup_project();
    let product_id = add_product(&dir, "Gadget");
    let alpha = add_milestone(&dir, &product_id, "Alpha", "2024-01-01");
    let beta = add_milestone(&dir, &product_id, "Beta", "2024-02-01");

    let edge = json_out(&dir, &["dep", "add", &alpha, &beta]);

    roadmap_cmd()
        .current_dir(dir.path())
        .args(["milestone", "remove", &beta])
        .assert()
        .success();

    let listed = json_out(&dir, &["dep", "list"]);
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(id_of(&listed[0]), id_of(&edge));
}

// =============================================================================
// Rescheduling Tests
// =============================================================================

#[test]
fn test_update_reschedules_open_ended_dependent() {
    let dir = setup_project();
    let product_id = add_product(&dir, "Gadget");

    let alpha = json_out(
        &dir,
        &[
            "milestone",
            "add",
            &product_id,
            "Alpha",
            "--start",
            "2024-01-01",
            "--end",
            "2024-01-10",
        ],
    );
    let alpha_id = id_of(&alpha);
    let beta_id = add_milestone(&dir, &product_id, "Beta", "2024-01-20");

    json_out(&dir, &["dep", "add", &alpha_id, &beta_id]);

    json_out(
        &dir,
        &["milestone", "update", &alpha_id, "--end", "2024-01-12"],
    );

    // The open-ended dependent collapses onto its own start date.
    let beta = json_out(&dir, &["milestone", "show", &beta_id]);
    assert_eq!(beta["start_date"], "2024-01-20");
    assert_eq!(beta["end_date"], "2024-01-20");
}

#[test]
fn test_rescheduling_is_idempotent() {
    let dir = setup_project();
    let product_id = add_product(&dir, "Gadget");

    let alpha = json_out(
        &dir,
        &[
            "milestone",
            "add",
            &product_id,
            "Alpha",
            "--start",
            "2024-01-01",
            "--end",
            "2024-01-10",
        ],
    );
    let alpha_id = id_of(&alpha);
    let beta_id = add_milestone(&dir, &product_id, "Beta", "2024-01-20");
    json_out(&dir, &["dep", "add", &alpha_id, &beta_id]);

    json_out(
        &dir,
        &["milestone", "update", &alpha_id, "--end", "2024-01-12"],
    );
    let first = json_out(&dir, &["milestone", "show", &beta_id]);

    json_out(
        &dir,
        &["milestone", "update", &alpha_id, "--end", "2024-01-12"],
    );
    let second = json_out(&dir, &["milestone", "show", &beta_id]);

    assert_eq!(first["start_date"], second["start_date"]);
    assert_eq!(first["end_date"], second["end_date"]);
}

// =============================================================================
// Status Tests
// =============================================================================

#[test]
fn test_status_counts_entities() {
    let dir = setup_project();
    let product_id = add_product(&dir, "Gadget");
    let alpha = add_milestone(&dir, &product_id, "Alpha", "2024-01-01");
    let beta = add_milestone(&dir, &product_id, "Beta", "2024-02-01");
    json_out(&dir, &["dep", "add", &alpha, &beta]);

    let status = json_out(&dir, &["status"]);
    assert_eq!(status["products"], 1);
    assert_eq!(status["milestones"], 2);
    assert_eq!(status["dependencies"], 1);
}

// =============================================================================
// Configuration Tests
// =============================================================================

#[test]
fn test_global_config_sets_default_format() {
    let dir = setup_project();
    add_product(&dir, "Gadget");

    let config_home = TempDir::new().unwrap();
    fs::create_dir_all(config_home.path().join("roadmap-cli")).unwrap();
    fs::write(
        config_home.path().join("roadmap-cli/config.toml"),
        "default_format = \"json\"\n",
    )
    .unwrap();

    // Without --format, the configured default applies.
    let assert = roadmap_cmd()
        .current_dir(dir.path())
        .env("XDG_CONFIG_HOME", config_home.path())
        .args(["product", "list"])
        .assert()
        .success();
    let products: Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(products.as_array().unwrap().len(), 1);

    // An explicit --format still wins.
    roadmap_cmd()
        .current_dir(dir.path())
        .env("XDG_CONFIG_HOME", config_home.path())
        .args(["--format", "text", "product", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Gadget"));
}
