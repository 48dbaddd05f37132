//! Per-task log path derivation for job-array submissions.
//!
//! The scheduler writes one log per array task, named by substituting the
//! task index into a fixed-width token in the log path template. The files
//! must exist before submission so the watcher can begin monitoring without
//! racing their creation.

use crate::error::{Result, SpoolError};
use crate::fs::{ensure_dir, touch};
use std::fs;
use std::path::{Path, PathBuf};

/// Token in the log path template standing for the 4-digit zero-padded
/// array task index.
pub const ARRAY_TOKEN: &str = "%4a";

/// Derive and materialize the watched log path for every task index.
///
/// For idx in 1..=array_size: substitute the zero-padded index into the
/// template, ensure the parent directory exists, delete a pre-existing file
/// when `refresh` is set, create the file empty if absent, and append the
/// canonicalized absolute path. Output is in increasing index order.
pub fn derive_log_paths(
    log_template: &Path,
    array_size: u32,
    refresh: bool,
) -> Result<Vec<PathBuf>> {
    let template = log_template.to_string_lossy();
    let mut watched = Vec::with_capacity(array_size as usize);

    for idx in 1..=array_size {
        let candidate = PathBuf::from(template.replace(ARRAY_TOKEN, &format!("{:04}", idx)));

        if let Some(parent) = candidate.parent() {
            ensure_dir(parent)?;
        }

        if refresh && candidate.exists() {
            fs::remove_file(&candidate).map_err(|e| {
                SpoolError::IoError(format!(
                    "failed to remove stale log '{}': {}",
                    candidate.display(),
                    e
                ))
            })?;
        }

        if !candidate.exists() {
            println!("Creating watch log: {} for the first time", candidate.display());
            touch(&candidate)?;
        }

        let resolved = candidate.canonicalize().map_err(|e| {
            SpoolError::IoError(format!(
                "failed to resolve log path '{}': {}",
                candidate.display(),
                e
            ))
        })?;
        watched.push(resolved);
    }

    Ok(watched)
}
