use anyhow::{Context as AnyhowContext, Result};
use archgen_repair::RepairReport;
use chrono::{DateTime, Local};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

pub(crate) const DEFAULT_AUDIT_LOG: &str = "archgen_repair_audit.log";

pub(crate) fn audit_line(at: DateTime<Local>, script: &Path, report: &RepairReport) -> String {
    format!(
        "{} script={} checked={} fixed={} unknown={} parse_failed={}",
        at.format("%Y-%m-%dT%H:%M:%S%:z"),
        script.display(),
        report.checked,
        report.fixed.len(),
        report.unknown.len(),
        report.parse_failed
    )
}

/// Append one line per repair run
pub(crate) fn append_audit_line(log: &Path, script: &Path, report: &RepairReport) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log)
        .with_context(|| format!("Failed to open audit log {}", log.display()))?;
    writeln!(file, "{}", audit_line(Local::now(), script, report))?;
    Ok(())
}
