//! File-operation collaborator and its default implementation.
//!
//! Recycle Bin calls go through the `trash` crate. On Windows it uses COM
//! under the hood and can panic if COM was initialized with another
//! concurrency model, so panics are turned into errors here.

use anyhow::{anyhow, Context, Result};
use std::any::Any;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Outcome of a batch operation that ran. Paths in `failed` were left in
/// place; everything in `done` is gone from its original location.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FileOpReport {
    pub done: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, String)>,
}

impl FileOpReport {
    fn all_done(paths: &[PathBuf]) -> Self {
        Self {
            done: paths.to_vec(),
            failed: Vec::new(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// External file-operation collaborator. An `Err` means nothing was touched.
pub trait FileOperations {
    fn move_to_trash(&self, paths: &[PathBuf]) -> Result<FileOpReport>;

    fn delete_permanently(&self, paths: &[PathBuf]) -> Result<FileOpReport>;

    fn move_files(&self, paths: &[PathBuf], destination: &Path) -> Result<FileOpReport>;
}

fn panic_payload_to_string(panic_payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = panic_payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic_payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

fn catch_trash_panic<R>(f: impl FnOnce() -> Result<R>) -> Result<R> {
    match std::panic::catch_unwind(std::panic::AssertUnwindSafe(f)) {
        Ok(r) => r,
        Err(panic_payload) => {
            let msg = panic_payload_to_string(panic_payload);
            Err(anyhow!(
                "Recycle Bin operation panicked (dependency bug): {msg}"
            ))
        }
    }
}

/// Operates on the local file system.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemFileOps;

impl FileOperations for SystemFileOps {
    fn move_to_trash(&self, paths: &[PathBuf]) -> Result<FileOpReport> {
        if paths.is_empty() {
            return Ok(FileOpReport::default());
        }
        log::info!("moving {} file(s) to the Recycle Bin", paths.len());
        catch_trash_panic(|| Ok(trash::delete_all(paths)?))
            .context("Failed to move files to the Recycle Bin")?;
        Ok(FileOpReport::all_done(paths))
    }

    fn delete_permanently(&self, paths: &[PathBuf]) -> Result<FileOpReport> {
        log::info!("permanently deleting {} file(s)", paths.len());
        let mut report = FileOpReport::default();
        for path in paths {
            match fs::remove_file(path) {
                Ok(()) => report.done.push(path.clone()),
                Err(e) => {
                    log::warn!("failed to delete {}: {}", path.display(), e);
                    report.failed.push((path.clone(), e.to_string()));
                }
            }
        }
        Ok(report)
    }

    fn move_files(&self, paths: &[PathBuf], destination: &Path) -> Result<FileOpReport> {
        if !destination.is_dir() {
            anyhow::bail!(
                "Destination folder does not exist: {}",
                destination.display()
            );
        }
        log::info!(
            "moving {} file(s) to {}",
            paths.len(),
            destination.display()
        );

        let mut report = FileOpReport::default();
        for path in paths {
            match move_file(path, destination) {
                Ok(target) => {
                    log::debug!("moved {} -> {}", path.display(), target.display());
                    report.done.push(path.clone());
                }
                Err(e) => {
                    log::warn!("failed to move {}: {:#}", path.display(), e);
                    report.failed.push((path.clone(), format!("{:#}", e)));
                }
            }
        }
        Ok(report)
    }
}

/// Move one file into `destination`, never overwriting an existing file.
fn move_file(path: &Path, destination: &Path) -> Result<PathBuf> {
    let name = path
        .file_name()
        .with_context(|| format!("Not a file path: {}", path.display()))?;
    let target = unique_target(&destination.join(name));

    match fs::rename(path, &target) {
        Ok(()) => Ok(target),
        // Different volume: copy then remove the original.
        Err(e) if is_cross_device(&e) => {
            fs::copy(path, &target)
                .with_context(|| format!("Failed to copy to {}", target.display()))?;
            fs::remove_file(path)
                .with_context(|| format!("Failed to remove original {}", path.display()))?;
            Ok(target)
        }
        Err(e) => Err(e).with_context(|| format!("Failed to move to {}", target.display())),
    }
}

fn is_cross_device(e: &io::Error) -> bool {
    #[cfg(windows)]
    const NOT_SAME_DEVICE: i32 = 17; // ERROR_NOT_SAME_DEVICE
    #[cfg(not(windows))]
    const NOT_SAME_DEVICE: i32 = 18; // EXDEV
    e.raw_os_error() == Some(NOT_SAME_DEVICE)
}

/// `photo.jpg` -> `photo (1).jpg` -> `photo (2).jpg` ...
fn unique_target(candidate: &Path) -> PathBuf {
    if !candidate.exists() {
        return candidate.to_path_buf();
    }
    let stem = candidate
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = candidate
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    let parent = candidate.parent().unwrap_or_else(|| Path::new(""));

    (1..)
        .map(|n| parent.join(format!("{stem} ({n}){ext}")))
        .find(|p| !p.exists())
        .unwrap_or_else(|| candidate.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delete_permanently_reports_missing() {
        let dir = tempfile::tempdir().unwrap();
        let present = dir.path().join("a.jpg");
        fs::write(&present, b"x").unwrap();
        let missing = dir.path().join("missing.jpg");

        let report = SystemFileOps
            .delete_permanently(&[present.clone(), missing.clone()])
            .unwrap();
        assert_eq!(report.done, vec![present.clone()]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, missing);
        assert!(!present.exists());
    }

    #[test]
    fn test_move_files_avoids_overwrite() {
        let src = tempfile::tempdir().unwrap();
        let dst = tempfile::tempdir().unwrap();
        let file = src.path().join("photo.jpg");
        fs::write(&file, b"new").unwrap();
        fs::write(dst.path().join("photo.jpg"), b"old").unwrap();

        let report = SystemFileOps
            .move_files(&[file.clone()], dst.path())
            .unwrap();
        assert!(report.is_complete());
        assert!(!file.exists());
        assert_eq!(fs::read(dst.path().join("photo.jpg")).unwrap(), b"old");
        assert_eq!(fs::read(dst.path().join("photo (1).jpg")).unwrap(), b"new");
    }

    #[test]
    fn test_move_files_requires_existing_destination() {
        let src = tempfile::tempdir().unwrap();
        let missing = src.path().join("nope");
        assert!(SystemFileOps.move_files(&[], &missing).is_err());
    }

    #[test]
    fn test_empty_trash_batch_is_noop() {
        let report = SystemFileOps.move_to_trash(&[]).unwrap();
        assert!(report.done.is_empty());
    }
}
