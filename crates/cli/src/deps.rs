use console::style;
use serde::Serialize;
use std::env;
use std::process::Stdio;
use tokio::process::Command;

const GRAPHVIZ_HINTS: &[&str] = &[
    "macOS: brew install graphviz",
    "Ubuntu/Debian: apt-get install graphviz",
    "Windows: download from https://graphviz.org/download/",
];

const CREDENTIAL_VARS: &[&str] = &[
    "AWS_ACCESS_KEY_ID",
    "AWS_PROFILE",
    "AWS_WEB_IDENTITY_TOKEN_FILE",
    "AWS_CONTAINER_CREDENTIALS_FULL_URI",
    "AWS_CONTAINER_CREDENTIALS_RELATIVE_URI",
];

#[derive(Debug, Clone, Serialize)]
pub(crate) struct Check {
    pub name: &'static str,
    pub ok: bool,
    /// A failed required check stops the run
    pub required: bool,
    pub detail: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hints: Vec<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct DependencyReport {
    pub checks: Vec<Check>,
}

impl DependencyReport {
    pub fn ok(&self) -> bool {
        self.checks.iter().all(|check| check.ok || !check.required)
    }

    pub fn failed_required(&self) -> impl Iterator<Item = &Check> {
        self.checks
            .iter()
            .filter(|check| check.required && !check.ok)
    }
}

/// Probe the diagrams package, Graphviz and (optionally) AWS credentials
pub(crate) async fn check_dependencies(include_credentials: bool) -> DependencyReport {
    let mut checks = vec![check_diagrams().await, check_graphviz().await];
    if include_credentials {
        checks.push(check_credentials());
    }
    DependencyReport { checks }
}

pub(crate) fn print_report(report: &DependencyReport) {
    for check in &report.checks {
        if check.ok {
            eprintln!("{} {}: {}", style("✓").green(), check.name, check.detail);
            continue;
        }
        let mark = if check.required {
            style("✗").red()
        } else {
            style("✗").yellow()
        };
        eprintln!("{mark} {}: {}", check.name, check.detail);
        for hint in &check.hints {
            eprintln!("    - {hint}");
        }
    }
}

/// First output line of a successful command
async fn probe(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .await
        .ok()?;
    if !output.status.success() {
        return None;
    }
    // `dot -V` reports on stderr
    let text = if output.stdout.is_empty() {
        output.stderr
    } else {
        output.stdout
    };
    Some(
        String::from_utf8_lossy(&text)
            .lines()
            .next()
            .unwrap_or_default()
            .trim()
            .to_string(),
    )
}

async fn check_diagrams() -> Check {
    for python in ["python3", "python"] {
        let found = probe(
            python,
            &["-c", "import diagrams, importlib.metadata as m; print(m.version('diagrams'))"],
        )
        .await;
        if let Some(version) = found {
            return Check {
                name: "diagrams",
                ok: true,
                required: true,
                detail: format!("{version} ({python})"),
                hints: Vec::new(),
            };
        }
    }
    Check {
        name: "diagrams",
        ok: false,
        required: true,
        detail: "Python package not importable".to_string(),
        hints: vec!["pip install diagrams"],
    }
}

async fn check_graphviz() -> Check {
    match probe("dot", &["-V"]).await {
        Some(version) => Check {
            name: "graphviz",
            ok: true,
            required: false,
            detail: version,
            hints: Vec::new(),
        },
        None => Check {
            name: "graphviz",
            ok: false,
            required: false,
            detail: "`dot` not found in PATH, rendering may fail".to_string(),
            hints: GRAPHVIZ_HINTS.to_vec(),
        },
    }
}

fn check_credentials() -> Check {
    let from_env = CREDENTIAL_VARS
        .iter()
        .find(|var| env::var_os(var).is_some_and(|value| !value.is_empty()));
    let from_files = dirs::home_dir()
        .map(|home| home.join(".aws"))
        .filter(|dir| dir.join("credentials").is_file() || dir.join("config").is_file());

    let detail = match (from_env, from_files) {
        (Some(var), _) => format!("found {var}"),
        (None, Some(dir)) => format!("found {}", dir.display()),
        (None, None) => {
            return Check {
                name: "aws credentials",
                ok: false,
                required: false,
                detail: "none in environment or ~/.aws (instance roles are not probed)"
                    .to_string(),
                hints: vec!["aws configure", "or export AWS_PROFILE / AWS_ACCESS_KEY_ID"],
            }
        }
    };
    Check {
        name: "aws credentials",
        ok: true,
        required: false,
        detail,
        hints: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(ok: bool, required: bool) -> Check {
        Check {
            name: "x",
            ok,
            required,
            detail: String::new(),
            hints: Vec::new(),
        }
    }

    #[test]
    fn optional_failures_do_not_fail_the_report() {
        let report = DependencyReport {
            checks: vec![check(true, true), check(false, false)],
        };
        assert!(report.ok());
        assert_eq!(report.failed_required().count(), 0);

        let report = DependencyReport {
            checks: vec![check(false, true), check(true, false)],
        };
        assert!(!report.ok());
        assert_eq!(report.failed_required().count(), 1);
    }

    #[tokio::test]
    async fn missing_program_probes_as_none() {
        assert_eq!(probe("archgen-no-such-program", &["--version"]).await, None);
    }
}
