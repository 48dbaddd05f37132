//! Job specification for one generation/submission run.
//!
//! A `JobSpec` carries every caller-supplied parameter and is immutable for
//! the lifetime of a run. The command layer resolves it from CLI flags and
//! the optional config file, validates it, and passes it by reference into
//! rule building and script generation.

use crate::error::{Result, SpoolError};
use crate::logs;
use std::path::PathBuf;

/// Caller-supplied parameters for one scheduler job.
#[derive(Debug, Clone)]
pub struct JobSpec {
    /// The name the scheduler will give to the job.
    pub job_name: String,

    /// Single command (or comma separated commands) to run.
    pub cmd: String,

    /// Scheduler partition used to run the job.
    pub partition: String,

    /// Number of array workers (task indices are 1-based).
    pub job_array_size: u32,

    /// CPUs requested for each task.
    pub cpus_per_task: u32,

    /// GPUs requested for each task; 0 omits the resource request entirely.
    pub gpus_per_task: u32,

    /// Environment setup text; `None` falls back to the recipe default.
    pub env_setup: Option<String>,

    /// Directory containing the source templates.
    pub template_dir: PathBuf,

    /// Directory in which generated scripts will be stored.
    pub gen_script_dir: PathBuf,

    /// Directory where scheduler logs will be stored.
    pub log_dir: PathBuf,

    /// Delete and recreate pre-existing log files before submission.
    pub refresh_logs: bool,
}

impl JobSpec {
    /// The per-task log path template: `<log_dir>/<job_name>/%4a-log.txt`,
    /// where `%4a` stands for the zero-padded task index.
    pub fn log_template(&self) -> PathBuf {
        self.log_dir
            .join(&self.job_name)
            .join(format!("{}-log.txt", logs::ARRAY_TOKEN))
    }

    /// Validate the specification before any generation work starts.
    pub fn validate(&self) -> Result<()> {
        if self.job_name.trim().is_empty() {
            return Err(SpoolError::UserError("job name must not be empty".to_string()));
        }
        if self.cmd.trim().is_empty() {
            return Err(SpoolError::UserError("command must not be empty".to_string()));
        }
        if self.partition.trim().is_empty() {
            return Err(SpoolError::UserError("partition must not be empty".to_string()));
        }
        if self.job_array_size < 1 {
            return Err(SpoolError::UserError(
                "job array size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
