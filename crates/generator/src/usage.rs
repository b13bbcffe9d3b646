use crate::error::Result;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// Token counts reported for one generation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl TokenUsage {
    pub const fn new(input_tokens: u64, output_tokens: u64) -> Self {
        Self {
            input_tokens,
            output_tokens,
        }
    }

    pub const fn total(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }

    /// `<timestamp>: Input Tokens: i, Output Tokens: o, Total Tokens: t`
    pub fn log_line(&self, at: DateTime<Local>) -> String {
        format!(
            "{}: Input Tokens: {}, Output Tokens: {}, Total Tokens: {}",
            at.format("%Y-%m-%d %H:%M:%S%.6f"),
            self.input_tokens,
            self.output_tokens,
            self.total()
        )
    }
}

/// Append one usage line to the log file, creating it when missing
pub fn append_usage_log(path: &Path, usage: &TokenUsage) -> Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{}", usage.log_line(Local::now()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::tempdir;

    #[test]
    fn line_format() {
        let at = Local.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();
        assert_eq!(
            TokenUsage::new(1200, 800).log_line(at),
            "2024-05-01 09:30:00.000000: Input Tokens: 1200, Output Tokens: 800, Total Tokens: 2000"
        );
    }

    #[test]
    fn appends_lines() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("usage.log");
        append_usage_log(&path, &TokenUsage::new(1, 2)).unwrap();
        append_usage_log(&path, &TokenUsage::new(3, 4)).unwrap();

        let log = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = log.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("Input Tokens: 1, Output Tokens: 2, Total Tokens: 3"));
        assert!(lines[1].ends_with("Total Tokens: 7"));
    }
}
