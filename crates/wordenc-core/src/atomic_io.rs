use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::{bail, Context, Result};

static STAGING_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Replaces `path` with `content` in one rename. The staged copy is flushed to
/// disk first and removed if any step fails.
pub fn write_text_atomic(path: &Path, content: &str) -> Result<()> {
    let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
        bail!("destination '{}' has no usable file name", path.display());
    };
    if path.is_dir() {
        bail!("destination path '{}' is a directory", path.display());
    }
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(directory)
        .with_context(|| format!("failed to create {}", directory.display()))?;

    let staged = staging_path(directory, file_name);
    let outcome = stage(&staged, content).and_then(|()| {
        std::fs::rename(&staged, path)
            .with_context(|| format!("failed to replace {}", path.display()))
    });
    if outcome.is_err() {
        let _ = std::fs::remove_file(&staged);
    }
    outcome
}

fn staging_path(directory: &Path, file_name: &str) -> PathBuf {
    let sequence = STAGING_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    directory.join(format!(
        ".{file_name}.{}.{sequence}.partial",
        std::process::id()
    ))
}

fn stage(staged: &Path, content: &str) -> Result<()> {
    let mut file: File = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(staged)
        .with_context(|| format!("failed to create staging file {}", staged.display()))?;
    file.write_all(content.as_bytes())
        .and_then(|()| file.sync_all())
        .with_context(|| format!("failed to write staging file {}", staged.display()))
}

/// Reads a UTF-8 file, returning `None` when it does not exist yet.
pub fn read_text_if_exists(path: &Path) -> Result<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(raw) => Ok(Some(raw)),
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(error) => Err(error).with_context(|| format!("failed to read {}", path.display())),
    }
}
