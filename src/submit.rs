//! Submission orchestration.
//!
//! Submission is fire-and-forget: the orchestrating script is sourced
//! through a shell and no job ID or exit status is consumed back. The
//! external process launcher and the log watcher are trait seams so the
//! orchestration logic is testable without spawning real processes or
//! blocking on real files.

use crate::error::{Result, SpoolError};
use crate::job::JobSpec;
use crate::logs::derive_log_paths;
use crate::scripts::ScriptSet;
use std::path::PathBuf;
use std::process::Command;

/// Launches a single shell command line.
pub trait CommandRunner {
    fn run(&self, command_line: &str) -> Result<()>;
}

/// Executes the submission line via `sh -c`.
///
/// `source` is a shell builtin, so the line goes to a real shell unsplit.
pub struct ShellRunner;

impl CommandRunner for ShellRunner {
    fn run(&self, command_line: &str) -> Result<()> {
        let status = Command::new("sh")
            .arg("-c")
            .arg(command_line)
            .status()
            .map_err(|e| {
                SpoolError::SubmitError(format!(
                    "failed to run '{}': {}\n\
                     Fix: ensure `sh` is installed and in PATH.",
                    command_line, e
                ))
            })?;
        // Fire-and-forget: the scheduler's exit status is not inspected.
        let _ = status;
        Ok(())
    }
}

/// Blocks on a set of log files until externally-defined completion.
pub trait LogWatcher {
    fn watch(&self, logs: &[PathBuf]) -> Result<()>;
}

/// Submit a generated script set.
///
/// When `watch` is set, the per-task log paths are derived (and created)
/// before the submission line runs, so the watcher never races the
/// scheduler on file creation; the watcher is handed the paths afterwards
/// and blocks until its own completion criteria are met.
pub fn submit(
    scripts: &ScriptSet,
    job: &JobSpec,
    watch: bool,
    runner: &dyn CommandRunner,
    watcher: &dyn LogWatcher,
) -> Result<()> {
    let watched_logs = if watch {
        Some(derive_log_paths(
            &job.log_template(),
            job.job_array_size,
            job.refresh_logs,
        )?)
    } else {
        None
    };

    let entry_point = scripts.entry_point().ok_or_else(|| {
        SpoolError::ConfigError("recipe produced no orchestrating script".to_string())
    })?;
    let submission_cmd = format!("source {}", entry_point.display());
    println!("Submitting job with command: {}", submission_cmd);
    runner.run(&submission_cmd)?;

    if let Some(logs) = watched_logs {
        watcher.watch(&logs)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::Role;
    use serial_test::serial;
    use std::cell::RefCell;
    use std::collections::BTreeMap;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    struct RecordingRunner {
        calls: RefCell<Vec<String>>,
    }

    impl RecordingRunner {
        fn new() -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl CommandRunner for RecordingRunner {
        fn run(&self, command_line: &str) -> Result<()> {
            self.calls.borrow_mut().push(command_line.to_string());
            Ok(())
        }
    }

    struct RecordingWatcher {
        watched: RefCell<Vec<PathBuf>>,
    }

    impl RecordingWatcher {
        fn new() -> Self {
            Self {
                watched: RefCell::new(Vec::new()),
            }
        }
    }

    impl LogWatcher for RecordingWatcher {
        fn watch(&self, logs: &[PathBuf]) -> Result<()> {
            self.watched.borrow_mut().extend(logs.iter().cloned());
            Ok(())
        }
    }

    fn script_set(master: &Path) -> ScriptSet {
        ScriptSet::new(BTreeMap::from([(Role::Master, master.to_path_buf())]))
    }

    fn spec(temp: &TempDir, array_size: u32) -> JobSpec {
        JobSpec {
            job_name: "trainer".to_string(),
            cmd: "python train.py".to_string(),
            partition: "gpu".to_string(),
            job_array_size: array_size,
            cpus_per_task: 2,
            gpus_per_task: 0,
            env_setup: None,
            template_dir: temp.path().join("templates"),
            gen_script_dir: temp.path().join("gen"),
            log_dir: temp.path().join("logs"),
            refresh_logs: false,
        }
    }

    #[test]
    fn sources_the_orchestrating_script() {
        let temp = TempDir::new().unwrap();
        let master = temp.path().join("gen/ray/ray-master.sh");
        let runner = RecordingRunner::new();
        let watcher = RecordingWatcher::new();

        submit(&script_set(&master), &spec(&temp, 1), false, &runner, &watcher).unwrap();

        let calls = runner.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0], format!("source {}", master.display()));
        assert!(watcher.watched.borrow().is_empty());
    }

    #[test]
    fn watching_derives_logs_before_submission_and_hands_them_off() {
        let temp = TempDir::new().unwrap();
        let master = temp.path().join("gen/ray/ray-master.sh");
        let runner = RecordingRunner::new();
        let watcher = RecordingWatcher::new();
        let job = spec(&temp, 3);

        submit(&script_set(&master), &job, true, &runner, &watcher).unwrap();

        let watched = watcher.watched.borrow();
        assert_eq!(watched.len(), 3);
        for (idx, path) in watched.iter().enumerate() {
            assert!(path.ends_with(format!("{:04}-log.txt", idx + 1)));
            assert!(path.exists(), "log must exist before watching starts");
        }
        assert_eq!(runner.calls.borrow().len(), 1);
    }

    #[test]
    #[serial]
    fn shell_runner_executes_the_line() {
        let temp = TempDir::new().unwrap();
        let marker = temp.path().join("ran.txt");

        ShellRunner
            .run(&format!("echo done > {}", marker.display()))
            .unwrap();

        assert!(marker.exists());
    }

    #[test]
    #[serial]
    fn shell_runner_ignores_command_exit_status() {
        // Fire-and-forget: a failing scheduler command is not an error here.
        ShellRunner.run("exit 7").unwrap();
    }

    #[test]
    fn missing_entry_point_is_config_error() {
        let temp = TempDir::new().unwrap();
        let runner = RecordingRunner::new();
        let watcher = RecordingWatcher::new();
        let empty = ScriptSet::new(BTreeMap::new());

        let err = submit(&empty, &spec(&temp, 1), false, &runner, &watcher).unwrap_err();
        assert!(matches!(err, SpoolError::ConfigError(_)));
        assert!(runner.calls.borrow().is_empty());
    }
}
