//! Recursive encryption and decryption of directory trees.
//!
//! The walk visits entries in sorted order, does not follow symlinks, and
//! collects the complete file list before anything is written, so results
//! produced during the run are never picked up as new candidates.
//!
//! A failing file is recorded in the [`BatchReport`] and the walk moves on.
//! A directory that cannot be listed is recorded separately, since it is not
//! a candidate file. Only a root that is not a directory fails the whole
//! batch.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::FileError;
use crate::naming::has_encrypted_suffix;
use crate::service::FileCipher;

/// One file or directory the batch could not process.
#[derive(Debug)]
pub struct BatchFailure {
    /// The source path that failed.
    pub path: PathBuf,
    /// Why it failed.
    pub error: FileError,
}

/// Per-file outcomes of a tree operation.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Result paths written, in processing order.
    pub succeeded: Vec<PathBuf>,
    /// Files that failed, in processing order.
    pub failed: Vec<BatchFailure>,
    /// Directories (or directory entries) that could not be read during the
    /// walk. Files below them were never seen.
    pub walk_errors: Vec<BatchFailure>,
}

impl BatchReport {
    /// Number of files the batch attempted.
    #[must_use]
    pub fn candidates(&self) -> usize {
        self.succeeded.len().saturating_add(self.failed.len())
    }

    /// `true` if every candidate succeeded and the whole tree was read.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty() && self.walk_errors.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    Encrypt,
    Decrypt,
}

impl Direction {
    fn accepts(self, path: &Path) -> bool {
        match self {
            Self::Encrypt => !has_encrypted_suffix(path),
            Self::Decrypt => has_encrypted_suffix(path),
        }
    }

    const fn label(self) -> &'static str {
        match self {
            Self::Encrypt => "encrypt",
            Self::Decrypt => "decrypt",
        }
    }
}

/// Encrypt every regular file under `root` with default parameters,
/// skipping files that already end in `.encrypted`.
///
/// # Errors
///
/// Returns `FileError::NotADirectory` if `root` is not a directory. Per-file
/// failures are reported in the returned [`BatchReport`].
pub fn encrypt_tree(root: &Path, password: &[u8]) -> Result<BatchReport, FileError> {
    FileCipher::default().encrypt_tree(root, password)
}

/// Decrypt every file ending in `.encrypted` under `root`.
///
/// # Errors
///
/// Returns `FileError::NotADirectory` if `root` is not a directory. Per-file
/// failures are reported in the returned [`BatchReport`].
pub fn decrypt_tree(root: &Path, password: &[u8]) -> Result<BatchReport, FileError> {
    FileCipher::default().decrypt_tree(root, password)
}

pub(crate) fn run(
    cipher: &FileCipher,
    root: &Path,
    password: &[u8],
    direction: Direction,
) -> Result<BatchReport, FileError> {
    if !fs::metadata(root).is_ok_and(|m| m.is_dir()) {
        return Err(FileError::NotADirectory(root.to_path_buf()));
    }

    let mut report = BatchReport::default();
    let mut files = Vec::new();
    collect_files(root, &mut files, &mut report.walk_errors);

    for path in files {
        if !direction.accepts(&path) {
            tracing::debug!(path = %path.display(), op = direction.label(), "Skipping file");
            continue;
        }

        let outcome = match direction {
            Direction::Encrypt => cipher.encrypt_file(&path, password),
            Direction::Decrypt => cipher.decrypt_file(&path, password),
        };
        match outcome {
            Ok(result) => report.succeeded.push(result),
            Err(error) => {
                tracing::warn!(
                    path = %path.display(),
                    op = direction.label(),
                    error = error.category(),
                    "File failed"
                );
                report.failed.push(BatchFailure { path, error });
            }
        }
    }

    tracing::info!(
        root = %root.display(),
        op = direction.label(),
        succeeded = report.succeeded.len(),
        candidates = report.candidates(),
        walk_errors = report.walk_errors.len(),
        "Batch finished"
    );
    Ok(report)
}

/// Depth-first walk collecting regular files. Unreadable directories are
/// recorded in `walk_errors` and skipped.
fn collect_files(dir: &Path, files: &mut Vec<PathBuf>, walk_errors: &mut Vec<BatchFailure>) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(path = %dir.display(), error = %e.kind(), "Directory unreadable");
            walk_errors.push(BatchFailure {
                path: dir.to_path_buf(),
                error: FileError::io(dir, e),
            });
            return;
        }
    };

    let mut children = Vec::new();
    for entry in entries {
        let typed = entry.and_then(|entry| {
            let file_type = entry.file_type()?;
            Ok((entry.path(), file_type))
        });
        match typed {
            Ok(child) => children.push(child),
            Err(e) => walk_errors.push(BatchFailure {
                path: dir.to_path_buf(),
                error: FileError::io(dir, e),
            }),
        }
    }
    children.sort_by(|a, b| a.0.cmp(&b.0));

    for (path, file_type) in children {
        if file_type.is_dir() {
            collect_files(&path, files, walk_errors);
        } else if file_type.is_file() {
            files.push(path);
        } else {
            tracing::debug!(path = %path.display(), "Skipping non-regular file");
        }
    }
}
