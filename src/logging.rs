//! Logger setup driven by [`AppSettings`].

use crate::settings::AppSettings;
use anyhow::{Context, Result};
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

pub const LOG_FILE_NAME: &str = "imgtidy.log";

/// Where log records ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    File(PathBuf),
    Stderr,
}

/// Install the global logger. The level comes from the settings unless
/// `RUST_LOG` is set. Records go to `<logFilePath>/imgtidy.log`, or to
/// stderr if that file cannot be opened.
///
/// Fails if a logger is already installed.
pub fn init(settings: &AppSettings) -> Result<LogTarget> {
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(settings.log_level.to_filter())
        .parse_default_env()
        .format_timestamp_secs();

    let (target, open_error) = match open_log_file(Path::new(&settings.log_file_path)) {
        Ok((file, path)) => {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
            (LogTarget::File(path), None)
        }
        Err(e) => (LogTarget::Stderr, Some(e)),
    };

    builder
        .try_init()
        .context("A logger is already installed")?;

    if let Some(e) = open_error {
        log::warn!("Logging to stderr: {:#}", e);
    }
    log::debug!("logger initialized: {:?}", target);
    Ok(target)
}

/// Open (append) the log file inside `dir`, creating the directory.
fn open_log_file(dir: &Path) -> Result<(File, PathBuf)> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
    let path = dir.join(LOG_FILE_NAME);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;
    Ok((file, path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_log_file_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let logs = dir.path().join("nested").join("logs");
        let (_file, path) = open_log_file(&logs).unwrap();
        assert_eq!(path, logs.join(LOG_FILE_NAME));
        assert!(path.exists());
    }

    #[test]
    fn test_open_log_file_rejects_file_as_directory() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not_a_dir");
        fs::write(&blocker, b"x").unwrap();
        assert!(open_log_file(&blocker).is_err());
    }
}
