//! Implementation of the `spool submit` command.
//!
//! Generates the script set, records the submission event, then sources the
//! orchestrating script through the shell runner. With `--watch` (the
//! default) the per-task logs are created up front and tailed until
//! interrupted.

use crate::cli::SubmitArgs;
use crate::commands::resolve_job;
use crate::error::Result;
use crate::events::{Event, EventAction, append_event};
use crate::scripts;
use crate::submit::{ShellRunner, submit};
use crate::watch::FollowWatcher;
use serde_json::json;

pub fn cmd_submit(args: SubmitArgs) -> Result<()> {
    let (recipe, job) = resolve_job(&args.job)?;

    let scripts = scripts::generate(recipe, &job)?;

    // Recorded before the watcher takes over the terminal; submission is
    // fire-and-forget, so this logs the attempt, not an outcome.
    let event = Event::new(EventAction::Submit)
        .with_job(&job.job_name)
        .with_details(json!({
            "recipe": recipe.name(),
            "job_array_size": job.job_array_size,
            "partition": job.partition,
            "watch": args.watch,
            "refresh_logs": job.refresh_logs,
        }));
    if let Err(e) = append_event(&job.log_dir, &event) {
        eprintln!("Warning: failed to log submit event: {}", e);
    }

    let runner = ShellRunner;
    let watcher = FollowWatcher::new(args.interval_ms);
    submit(&scripts, &job, args.watch, &runner, &watcher)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::JobArgs;
    use crate::error::SpoolError;
    use tempfile::TempDir;

    #[test]
    fn submit_fails_cleanly_without_templates() {
        let temp = TempDir::new().unwrap();
        let args = SubmitArgs {
            job: JobArgs {
                template_dir: Some(temp.path().join("templates")),
                gen_script_dir: Some(temp.path().join("gen")),
                log_dir: Some(temp.path().join("logs")),
                ..JobArgs::default()
            },
            watch: false,
            interval_ms: 10,
        };

        let err = cmd_submit(args).unwrap_err();
        assert!(matches!(err, SpoolError::IoError(_)));
        // Nothing was submitted, so no logs were materialized.
        assert!(!temp.path().join("logs/spool-test").exists());
    }
}
