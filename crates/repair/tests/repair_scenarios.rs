use archgen_catalog::{build_catalog, Catalog};
use archgen_repair::{repair, FixRecord, Repairer};
use pretty_assertions::assert_eq;

const WEB_SERVICE: &str = r#"from diagrams import Diagram, Cluster
from diagrams.aws.compute import EC2, S3
from diagrams.aws.database import RDS
from diagrams.aws.network import ELB

with Diagram("Web Service", show=False, filename="web_service"):
    lb = ELB("lb")
    with Cluster("Web Tier"):
        web = [EC2("web1"), EC2("web2")]
    lb >> web >> RDS("primary")
    web >> S3("assets")  # static files
"#;

fn non_import_lines(text: &str) -> Vec<&str> {
    text.lines()
        .filter(|line| !line.trim_start().starts_with("from "))
        .collect()
}

#[test]
fn misplaced_component_moves_to_its_category() {
    let catalog = build_catalog();
    let report = repair("from diagrams.aws.compute import EC2, S3\n", &catalog).unwrap();

    assert_eq!(
        report.corrected_text,
        "from diagrams.aws.compute import EC2\nfrom diagrams.aws.storage import S3\n"
    );
    assert!(report.changed);
    assert!(!report.parse_failed);
    assert_eq!(report.checked, 2);
    assert_eq!(
        report.fixed,
        vec![FixRecord::new(
            "S3",
            "diagrams.aws.compute",
            "diagrams.aws.storage"
        )]
    );
    assert!(report.unknown.is_empty());
}

#[test]
fn unknown_component_is_reported_and_left_alone() {
    let catalog = build_catalog();
    let source = "from diagrams.aws.network import Route53Domain\n";
    let report = repair(source, &catalog).unwrap();

    assert_eq!(report.corrected_text, source);
    assert!(!report.changed);
    assert_eq!(
        report
            .unknown
            .iter()
            .map(|unknown| unknown.name.as_str())
            .collect::<Vec<_>>(),
        vec!["Route53Domain"]
    );
    assert_eq!(report.unknown[0].line, 1);
}

#[test]
fn malformed_script_passes_through() {
    let catalog = build_catalog();
    let source = "from diagrams.aws.compute import (EC2, S3\n\nwith Diagram(\"x\"):\n    EC2(\"a\")\n";
    let report = repair(source, &catalog).unwrap();

    assert!(report.parse_failed);
    assert_eq!(report.corrected_text, source);
    assert!(!report.changed);
    assert!(report.fixed.is_empty());
    assert!(report.parse_error.is_some());
}

#[test]
fn script_without_catalog_imports_is_untouched() {
    let catalog = build_catalog();
    let source = "import os\nfrom pathlib import Path\n\nprint(Path(os.getcwd()))\n";
    let report = repair(source, &catalog).unwrap();

    assert_eq!(report.corrected_text, source);
    assert!(!report.changed);
    assert_eq!(report.checked, 0);
}

#[test]
fn non_import_lines_are_byte_identical() {
    let catalog = build_catalog();
    let report = repair(WEB_SERVICE, &catalog).unwrap();

    assert!(report.changed);
    assert_eq!(
        non_import_lines(&report.corrected_text),
        non_import_lines(WEB_SERVICE)
    );
    assert!(report
        .corrected_text
        .contains("from diagrams.aws.compute import EC2\nfrom diagrams.aws.storage import S3\n"));
    assert!(report.corrected_text.ends_with("    web >> S3(\"assets\")  # static files\n"));
}

#[test]
fn second_repair_changes_nothing() {
    let catalog = build_catalog();
    let mut repairer = Repairer::new(&catalog).unwrap();

    let first = repairer.repair(WEB_SERVICE);
    let second = repairer.repair(&first.corrected_text);

    assert!(first.changed);
    assert!(!second.changed);
    assert!(second.fixed.is_empty());
    assert_eq!(second.corrected_text, first.corrected_text);
}

#[test]
fn moved_name_is_not_duplicated_in_target() {
    let catalog = build_catalog();
    let source = "\
from diagrams.aws.storage import S3
from diagrams.aws.compute import EC2, S3
";
    let report = repair(source, &catalog).unwrap();

    assert_eq!(
        report.corrected_text,
        "from diagrams.aws.storage import S3\nfrom diagrams.aws.compute import EC2\n"
    );
    assert_eq!(report.corrected_text.matches("S3").count(), 1);
}

#[test]
fn aliased_and_nested_imports_are_repaired() {
    let catalog = build_catalog();
    let source = "\
try:
    from diagrams.aws.compute import EC2, S3 as Bucket
except ImportError:
    raise
";
    let report = repair(source, &catalog).unwrap();

    assert_eq!(
        report.corrected_text,
        "\
try:
    from diagrams.aws.compute import EC2
    from diagrams.aws.storage import S3 as Bucket
except ImportError:
    raise
"
    );
}

#[test]
fn several_fixes_share_one_new_statement() {
    let catalog = build_catalog();
    let source = "from diagrams.aws.compute import EC2, S3, EFS\n";
    let report = repair(source, &catalog).unwrap();

    assert_eq!(
        report.corrected_text,
        "from diagrams.aws.compute import EC2\nfrom diagrams.aws.storage import S3, EFS\n"
    );
    assert_eq!(report.fixed.len(), 2);
}

#[test]
fn module_level_name_is_not_moved_into_a_function() {
    let catalog = build_catalog();
    let source = "\
from diagrams.aws.compute import EC2, S3

def helper():
    from diagrams.aws.storage import S3Glacier
    return S3Glacier

S3(\"bucket\")
";
    let report = repair(source, &catalog).unwrap();

    assert_eq!(
        report.corrected_text,
        "\
from diagrams.aws.compute import EC2
from diagrams.aws.storage import S3

def helper():
    from diagrams.aws.storage import S3Glacier
    return S3Glacier

S3(\"bucket\")
"
    );
}

#[test]
fn other_providers_are_not_checked() {
    let catalog = build_catalog();
    let source = "from diagrams.gcp.compute import S3\n";
    let report = repair(source, &catalog).unwrap();

    assert_eq!(report.checked, 0);
    assert_eq!(report.corrected_text, source);
}

#[test]
fn alternative_catalog_drives_the_fix() {
    let catalog = Catalog::from_toml_str(
        r#"
schema_version = 1
package = "diagrams"
package_version = "0.1.0"

[categories."diagrams.aws.compute"]
exports = ["EC2"]

[categories."diagrams.aws.network"]
exports = ["Route53Domain"]
"#,
        "aws",
    )
    .unwrap();

    let report = repair("from diagrams.aws.compute import Route53Domain\n", &catalog).unwrap();
    assert_eq!(
        report.corrected_text,
        "from diagrams.aws.network import Route53Domain\n"
    );
}
