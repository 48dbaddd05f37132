//! Polling follow watcher for per-task log files.
//!
//! Tails every watched log on a fixed interval and prints newly appended
//! lines prefixed with the log's file name. Completion criteria are owned
//! by whoever interrupts the process; the loop itself runs until then.
//! `once` performs a single poll pass, for scripted use.

use crate::error::Result;
use crate::submit::LogWatcher;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

/// Default poll interval in milliseconds.
const DEFAULT_INTERVAL_MS: u64 = 1000;

/// Tail-style log watcher.
#[derive(Debug, Clone)]
pub struct FollowWatcher {
    /// Poll interval in milliseconds (clamped to at least 50ms).
    pub interval_ms: u64,
    /// Run a single poll pass and return instead of looping.
    pub once: bool,
}

impl Default for FollowWatcher {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_INTERVAL_MS,
            once: false,
        }
    }
}

impl FollowWatcher {
    /// Watcher polling at `interval_ms`.
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            ..Self::default()
        }
    }
}

impl LogWatcher for FollowWatcher {
    fn watch(&self, logs: &[PathBuf]) -> Result<()> {
        eprintln!("Watching {} log file(s) (Ctrl+C to stop):", logs.len());
        for log in logs {
            eprintln!("  {}", log.display());
        }

        let mut offsets = vec![0u64; logs.len()];
        loop {
            for (log, offset) in logs.iter().zip(offsets.iter_mut()) {
                // A log may be mid-rotation; skip it this round.
                let Ok(lines) = drain_new_lines(log, offset) else {
                    continue;
                };
                let label = log
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| log.display().to_string());
                for line in lines {
                    println!("[{}] {}", label, line);
                }
            }

            if self.once {
                break;
            }
            thread::sleep(Duration::from_millis(self.interval_ms.max(50)));
        }

        Ok(())
    }
}

/// Read the complete lines appended to `path` since `offset`.
///
/// Only whole lines are consumed: bytes after the last newline stay pending
/// so a line being written is never emitted half-finished. A file shorter
/// than the stored offset was truncated; reading restarts from the top.
fn drain_new_lines(path: &Path, offset: &mut u64) -> std::io::Result<Vec<String>> {
    let len = std::fs::metadata(path)?.len();
    if len < *offset {
        *offset = 0;
    }
    if len == *offset {
        return Ok(Vec::new());
    }

    let mut file = File::open(path)?;
    file.seek(SeekFrom::Start(*offset))?;
    let mut pending = String::new();
    file.read_to_string(&mut pending)?;

    let Some(last_newline) = pending.rfind('\n') else {
        return Ok(Vec::new());
    };

    let complete = &pending[..last_newline];
    *offset += last_newline as u64 + 1;
    Ok(complete.lines().map(str::to_string).collect())
}
