use assert_cmd::Command;
use pretty_assertions::assert_eq;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const MISPLACED: &str = "\
from diagrams import Diagram
from diagrams.aws.compute import EC2, S3

with Diagram(\"web\", show=False):
    EC2(\"web\") >> S3(\"assets\")
";

#[allow(deprecated)]
fn archgen(workdir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("archgen").expect("binary");
    cmd.current_dir(workdir).env_remove("ARCHGEN_CATALOG");
    cmd
}

#[test]
fn repairs_script_in_place_and_audits() {
    let temp = tempdir().unwrap();
    let script = temp.path().join("diagram.py");
    fs::write(&script, MISPLACED).unwrap();

    archgen(temp.path())
        .args(["repair", "diagram.py"])
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(&script).unwrap(),
        "\
from diagrams import Diagram
from diagrams.aws.compute import EC2
from diagrams.aws.storage import S3

with Diagram(\"web\", show=False):
    EC2(\"web\") >> S3(\"assets\")
"
    );

    let audit = fs::read_to_string(temp.path().join("archgen_repair_audit.log")).unwrap();
    assert_eq!(audit.lines().count(), 1);
    assert!(audit.contains("script=diagram.py checked=2 fixed=1 unknown=0 parse_failed=false"));
}

#[test]
fn check_mode_reports_without_writing() {
    let temp = tempdir().unwrap();
    let script = temp.path().join("diagram.py");
    fs::write(&script, MISPLACED).unwrap();

    archgen(temp.path())
        .args(["repair", "diagram.py", "--check"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicates::str::contains("S3: compute -> storage"));

    assert_eq!(fs::read_to_string(&script).unwrap(), MISPLACED);
    assert!(!temp.path().join("archgen_repair_audit.log").exists());
}

#[test]
fn json_report_lists_fixes_and_unknowns() {
    let temp = tempdir().unwrap();
    fs::write(
        temp.path().join("diagram.py"),
        "from diagrams.aws.compute import S3\nfrom diagrams.aws.network import Route53Domain\n",
    )
    .unwrap();

    let output = archgen(temp.path())
        .args(["repair", "diagram.py", "--json", "--output", "fixed.py"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: Value = serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(report["changed"], true);
    assert_eq!(report["fixed"][0]["name"], "S3");
    assert_eq!(report["unknown"][0]["name"], "Route53Domain");
    assert_eq!(
        fs::read_to_string(temp.path().join("fixed.py")).unwrap(),
        "from diagrams.aws.storage import S3\nfrom diagrams.aws.network import Route53Domain\n"
    );
}

#[test]
fn unparseable_script_is_left_alone() {
    let temp = tempdir().unwrap();
    let script = temp.path().join("diagram.py");
    let broken = "from diagrams.aws.compute import (EC2, S3\n";
    fs::write(&script, broken).unwrap();

    archgen(temp.path())
        .args(["repair", "diagram.py"])
        .assert()
        .success()
        .stderr(predicates::str::contains("script does not parse"));

    assert_eq!(fs::read_to_string(&script).unwrap(), broken);
    let audit = fs::read_to_string(temp.path().join("archgen_repair_audit.log")).unwrap();
    assert!(audit.contains("parse_failed=true"));
}

#[test]
fn missing_script_is_an_error() {
    let temp = tempdir().unwrap();
    archgen(temp.path())
        .args(["repair", "absent.py"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("Failed to read script"));
}
