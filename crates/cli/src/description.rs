use anyhow::{Context as AnyhowContext, Result};
use std::fs;
use std::io::{self, BufRead};
use std::path::Path;

const TERMINATOR: &str = "done";

/// Lines up to a `done` line (any case) or end of input, trimmed
pub(crate) fn read_description<R: BufRead>(reader: R) -> io::Result<String> {
    let mut lines = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().eq_ignore_ascii_case(TERMINATOR) {
            break;
        }
        lines.push(line);
    }
    Ok(lines.join("\n").trim().to_string())
}

/// Description from `--description-file`, else from stdin
pub(crate) fn capture(file: Option<&Path>) -> Result<String> {
    if let Some(path) = file {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read description {}", path.display()))?;
        return Ok(text.trim().to_string());
    }

    if console::user_attended_stderr() {
        eprintln!("Describe your AWS architecture in as much detail as you like.");
        eprintln!("Type '{TERMINATOR}' on a new line when finished.\n");
    }
    read_description(io::stdin().lock()).context("Failed to read description from stdin")
}

pub(crate) fn save(path: &Path, description: &str) -> Result<()> {
    fs::write(path, format!("{description}\n"))
        .with_context(|| format!("Failed to save description to {}", path.display()))
}
