//! Defaults file for job parameters.
//!
//! An optional `spool.yaml` supplies per-flag defaults so a project can pin
//! its partition, template root, and resource counts once. CLI flags always
//! win over the file; the file wins over the built-in defaults.
//!
//! # File Format
//!
//! ```yaml
//! job_name: trainer
//! recipe: ray
//! partition: gpu
//! template_dir: templates
//! gen_script_dir: data/slurm-gen-scripts
//! log_dir: data/slurm-logs
//! cmd: python train.py
//! job_array_size: 4
//! cpus_per_task: 5
//! gpus_per_task: 1
//! env_setup: |
//!   module load cuda
//!   conda activate trainer
//! ```

use crate::error::{Result, SpoolError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "spool.yaml";

/// Job parameter defaults, loaded from `spool.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// The name the scheduler will give to the job.
    pub job_name: String,

    /// The recipe used to generate scripts.
    pub recipe: String,

    /// Directory containing the source templates.
    pub template_dir: PathBuf,

    /// Scheduler partition used to run the job.
    pub partition: String,

    /// Directory in which generated scripts will be stored.
    pub gen_script_dir: PathBuf,

    /// Single command (or comma separated commands) to run.
    pub cmd: String,

    /// Number of array workers.
    pub job_array_size: u32,

    /// CPUs requested for each task.
    pub cpus_per_task: u32,

    /// GPUs requested for each task.
    pub gpus_per_task: u32,

    /// Setup text for a custom environment.
    pub env_setup: Option<String>,

    /// Directory where scheduler logs will be stored.
    pub log_dir: PathBuf,

    /// Unknown fields preserved for forward compatibility.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            job_name: "spool-test".to_string(),
            recipe: "ray".to_string(),
            template_dir: PathBuf::from("templates"),
            partition: "gpu".to_string(),
            gen_script_dir: PathBuf::from("data/slurm-gen-scripts"),
            cmd: "echo \"hello\"".to_string(),
            job_array_size: 2,
            cpus_per_task: 5,
            gpus_per_task: 1,
            env_setup: None,
            log_dir: PathBuf::from("data/slurm-logs"),
            extra: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Load config from a YAML file.
    ///
    /// Returns `Ok(None)` if the file does not exist.
    /// Returns `Err` if the file exists but cannot be read or parsed.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Option<Self>> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            SpoolError::UserError(format!(
                "failed to read config '{}': {}",
                path.display(),
                e
            ))
        })?;

        Ok(Some(Self::from_yaml(&content)?))
    }

    /// Parse config from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| SpoolError::UserError(format!("failed to parse config: {}", e)))
    }
}
