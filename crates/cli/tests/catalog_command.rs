use assert_cmd::Command;
use pretty_assertions::assert_eq;
use serde_json::Value;
use std::fs;
use tempfile::tempdir;

#[allow(deprecated)]
fn archgen() -> Command {
    let mut cmd = Command::cargo_bin("archgen").expect("binary");
    cmd.env_remove("ARCHGEN_CATALOG");
    cmd
}

#[test]
fn lookup_prints_canonical_category() {
    archgen()
        .args(["catalog", "lookup", "S3"])
        .assert()
        .success()
        .stdout("diagrams.aws.storage\n");
}

#[test]
fn lookup_of_unknown_component_fails() {
    archgen()
        .args(["catalog", "lookup", "Route53Domain"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicates::str::contains("not exported by any diagrams.aws category"));
}

#[test]
fn lookup_json_mentions_other_exporters() {
    let output = archgen()
        .args(["catalog", "lookup", "AutoScaling", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let body: Value = serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(body["category"], "diagrams.aws.compute");
    assert_eq!(body["also_exported_by"][0], "diagrams.aws.management");
}

#[test]
fn category_listing_accepts_short_names() {
    let output = archgen()
        .args(["catalog", "--category", "storage"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.lines().any(|line| line == "S3"));
    assert!(stdout.lines().all(|line| line != "EC2"));
}

#[test]
fn unknown_category_is_an_error() {
    archgen()
        .args(["catalog", "--category", "teleportation"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("Unknown category 'teleportation'"));
}

#[test]
fn alternative_catalog_from_environment() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("catalog.toml");
    fs::write(
        &path,
        r#"
schema_version = 1
package = "diagrams"
package_version = "0.1.0"

[categories."diagrams.aws.network"]
exports = ["Route53Domain"]
"#,
    )
    .unwrap();

    let output = archgen()
        .env("ARCHGEN_CATALOG", &path)
        .args(["catalog", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let body: Value = serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(
        body,
        serde_json::json!([{ "category": "diagrams.aws.network", "components": 1 }])
    );
}
