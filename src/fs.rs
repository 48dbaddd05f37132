//! Filesystem helpers for generated scripts and watched log files.
//!
//! Script writes go through a temp-file-then-rename sequence so a generated
//! script is never observed half-written:
//! 1. Write content to a temporary file in the destination directory
//! 2. Sync the file to disk (fsync)
//! 3. Atomically rename over the destination
//! 4. Mark the result owner-executable (Unix only)
//!
//! Source and destination live in the same directory, so the rename is
//! atomic on POSIX filesystems. On crash, a temporary file may remain
//! (named `.{filename}.tmp`).

use crate::error::{Result, SpoolError};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Mode bits for generated scripts.
#[cfg(unix)]
const SCRIPT_MODE: u32 = 0o755;

/// Create a directory and any missing parents.
pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    fs::create_dir_all(path).map_err(|e| {
        SpoolError::IoError(format!(
            "failed to create directory '{}': {}",
            path.display(),
            e
        ))
    })
}

/// Create an empty file if one does not already exist.
pub fn touch<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    if path.exists() {
        return Ok(());
    }
    File::create(path).map_err(|e| {
        SpoolError::IoError(format!("failed to create '{}': {}", path.display(), e))
    })?;
    Ok(())
}

/// Write a generated script: parent directories created, content written
/// atomically, executable bit set.
pub fn write_script<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent()
        && !parent.exists()
    {
        ensure_dir(parent)?;
    }

    let temp_path = temp_path_for(path)?;
    write_and_sync(&temp_path, content.as_bytes())?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        SpoolError::IoError(format!(
            "failed to replace '{}': {}",
            path.display(),
            e
        ))
    })?;

    set_executable(path)
}

/// Temporary file path in the same directory as the target.
fn temp_path_for(target: &Path) -> Result<PathBuf> {
    let parent = target.parent().unwrap_or(Path::new("."));
    let filename = target
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| SpoolError::IoError(format!("invalid script path '{}'", target.display())))?;
    Ok(parent.join(format!(".{}.tmp", filename)))
}

/// Write content to a file and sync it to disk.
fn write_and_sync(path: &Path, content: &[u8]) -> Result<()> {
    let mut file = File::create(path).map_err(|e| {
        SpoolError::IoError(format!(
            "failed to create temporary file '{}': {}",
            path.display(),
            e
        ))
    })?;

    file.write_all(content).map_err(|e| {
        let _ = fs::remove_file(path);
        SpoolError::IoError(format!("failed to write to temporary file: {}", e))
    })?;

    file.sync_all().map_err(|e| {
        let _ = fs::remove_file(path);
        SpoolError::IoError(format!("failed to sync temporary file to disk: {}", e))
    })?;

    Ok(())
}

#[cfg(unix)]
fn set_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(SCRIPT_MODE)).map_err(|e| {
        SpoolError::IoError(format!(
            "failed to mark '{}' executable: {}",
            path.display(),
            e
        ))
    })
}

#[cfg(not(unix))]
fn set_executable(_path: &Path) -> Result<()> {
    // No executable bit to set; scripts run through an explicit interpreter.
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn ensure_dir_creates_nested_directories() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("a/b/c");
        ensure_dir(&nested).unwrap();
        assert!(nested.is_dir());
        // Idempotent on existing directories.
        ensure_dir(&nested).unwrap();
    }

    #[test]
    fn touch_creates_empty_file_once() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("log.txt");
        touch(&path).unwrap();
        assert!(path.exists());
        assert_eq!(fs::read_to_string(&path).unwrap(), "");

        fs::write(&path, "content").unwrap();
        touch(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "content");
    }

    #[test]
    fn write_script_creates_parents_and_content() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("ray/ray-master.sh");
        write_script(&path, "#!/bin/bash\necho hi").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "#!/bin/bash\necho hi");
    }

    #[test]
    fn write_script_replaces_existing_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("script.sh");
        write_script(&path, "first").unwrap();
        write_script(&path, "second").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
    }

    #[test]
    fn write_script_leaves_no_temp_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("script.sh");
        write_script(&path, "body").unwrap();
        assert!(!temp.path().join(".script.sh.tmp").exists());
    }

    #[cfg(unix)]
    #[test]
    fn write_script_sets_executable_mode() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let path = temp.path().join("script.sh");
        write_script(&path, "#!/bin/bash").unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }
}
