//! CLI argument parsing for spool.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.
//!
//! Job flags are all optional: the command layer merges them over the
//! optional `spool.yaml` defaults file and the built-in defaults.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// Spool: template-driven SLURM job script generator and submitter.
///
/// A recipe turns one job specification into a set of interdependent shell
/// scripts (orchestrator, sbatch script, per-node startup scripts), writes
/// them executable under a destination tree, and submits the job while
/// optionally tailing its per-task logs.
#[derive(Parser, Debug)]
#[command(name = "spool")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for spool.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate the script set without submitting.
    ///
    /// Renders every template of the selected recipe and writes the
    /// results executable under the destination directory.
    Generate(GenerateArgs),

    /// Generate the script set and submit the job.
    ///
    /// Sources the generated orchestrating script and, by default, tails
    /// the per-task log files until interrupted.
    Submit(SubmitArgs),

    /// List the known recipes and their script roles.
    Recipes,
}

/// Job parameters shared by `generate` and `submit`.
#[derive(Parser, Debug, Default)]
pub struct JobArgs {
    /// The name that the scheduler will give to the job.
    #[arg(long)]
    pub job_name: Option<String>,

    /// The recipe to use to generate scripts.
    #[arg(long)]
    pub recipe: Option<String>,

    /// The directory containing the source templates.
    #[arg(long)]
    pub template_dir: Option<PathBuf>,

    /// The name of the partition used to run the job.
    #[arg(long)]
    pub partition: Option<String>,

    /// Directory in which generated scripts will be stored.
    #[arg(long)]
    pub gen_script_dir: Option<PathBuf>,

    /// Single command (or comma separated commands) to run.
    #[arg(long)]
    pub cmd: Option<String>,

    /// The number of array workers.
    #[arg(long)]
    pub job_array_size: Option<u32>,

    /// The number of cpus requested for each task.
    #[arg(long)]
    pub cpus_per_task: Option<u32>,

    /// The number of gpus requested for each task.
    #[arg(long)]
    pub gpus_per_task: Option<u32>,

    /// Setup string for a custom environment.
    #[arg(long)]
    pub env_setup: Option<String>,

    /// Location where scheduler logs will be stored.
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// Delete and recreate pre-existing log files before submission.
    #[arg(long)]
    pub refresh_logs: bool,

    /// Path to a defaults file (default: ./spool.yaml if present).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Arguments for the `generate` command.
#[derive(Parser, Debug)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub job: JobArgs,
}

/// Arguments for the `submit` command.
#[derive(Parser, Debug)]
pub struct SubmitArgs {
    #[command(flatten)]
    pub job: JobArgs,

    /// Whether to watch the generated logs after submission.
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub watch: bool,

    /// Log watcher poll interval in milliseconds.
    #[arg(long, default_value_t = 1000)]
    pub interval_ms: u64,
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
