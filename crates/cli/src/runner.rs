use anyhow::{bail, Context as AnyhowContext, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use std::time::SystemTime;
use tokio::process::Command;

const INTERPRETERS: &[&str] = &["python3", "python"];

/// Run the script with `python3`, falling back to `python`.
///
/// The script runs from its own directory so the image lands next to it.
pub(crate) async fn run_script(script: &Path) -> Result<ExitStatus> {
    let dir = script_dir(script);
    let file = script
        .file_name()
        .with_context(|| format!("{} is not a file path", script.display()))?;

    let mut last_status = None;
    for interpreter in INTERPRETERS {
        match Command::new(interpreter)
            .arg(file)
            .current_dir(&dir)
            .status()
            .await
        {
            Ok(status) if status.success() => return Ok(status),
            Ok(status) => {
                log::warn!("{interpreter} exited with {status}");
                last_status = Some(status);
            }
            Err(e) => log::warn!("Could not start {interpreter}: {e}"),
        }
    }

    match last_status {
        Some(status) => Ok(status),
        None => bail!("No Python interpreter found (tried {})", INTERPRETERS.join(", ")),
    }
}

pub(crate) fn script_dir(script: &Path) -> PathBuf {
    match script.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// PNG files in `dir`, newest first
pub(crate) fn find_images(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut images: Vec<(SystemTime, PathBuf)> = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("Failed to list {}", dir.display()))? {
        let path = entry?.path();
        let is_png = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
        if !is_png || !path.is_file() {
            continue;
        }
        let modified = fs::metadata(&path)
            .and_then(|meta| meta.modified())
            .unwrap_or(SystemTime::UNIX_EPOCH);
        images.push((modified, path));
    }
    images.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
    Ok(images.into_iter().map(|(_, path)| path).collect())
}
