//! Command implementations for spool.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations, plus the job-spec resolution shared by `generate` and
//! `submit`: CLI flags win over the optional defaults file, which wins over
//! the built-in defaults.

mod generate;
mod submit;

use crate::cli::{Command, JobArgs};
use crate::config::{Config, DEFAULT_CONFIG_FILE};
use crate::error::{Result, SpoolError};
use crate::job::JobSpec;
use crate::recipe::{Recipe, RECIPES};

/// Dispatch a command to its implementation.
pub fn dispatch(command: Command) -> Result<()> {
    match command {
        Command::Generate(args) => generate::cmd_generate(args),
        Command::Submit(args) => submit::cmd_submit(args),
        Command::Recipes => cmd_recipes(),
    }
}

/// Resolve the active recipe and a validated job specification from the
/// CLI flags and the defaults file.
pub(crate) fn resolve_job(args: &JobArgs) -> Result<(Recipe, JobSpec)> {
    let config = match &args.config {
        // An explicitly named config file must exist.
        Some(path) => Config::load(path)?.ok_or_else(|| {
            SpoolError::UserError(format!("config file not found: '{}'", path.display()))
        })?,
        None => Config::load(DEFAULT_CONFIG_FILE)?.unwrap_or_default(),
    };

    let recipe_name = args.recipe.clone().unwrap_or(config.recipe);
    let recipe = Recipe::parse(&recipe_name)?;

    let spec = JobSpec {
        job_name: args.job_name.clone().unwrap_or(config.job_name),
        cmd: args.cmd.clone().unwrap_or(config.cmd),
        partition: args.partition.clone().unwrap_or(config.partition),
        job_array_size: args.job_array_size.unwrap_or(config.job_array_size),
        cpus_per_task: args.cpus_per_task.unwrap_or(config.cpus_per_task),
        gpus_per_task: args.gpus_per_task.unwrap_or(config.gpus_per_task),
        env_setup: args.env_setup.clone().or(config.env_setup),
        template_dir: args.template_dir.clone().unwrap_or(config.template_dir),
        gen_script_dir: args.gen_script_dir.clone().unwrap_or(config.gen_script_dir),
        log_dir: args.log_dir.clone().unwrap_or(config.log_dir),
        refresh_logs: args.refresh_logs,
    };
    spec.validate()?;

    Ok((recipe, spec))
}

/// List the known recipes and their script roles.
fn cmd_recipes() -> Result<()> {
    println!("Available recipes:");
    for recipe in RECIPES {
        println!();
        println!("  {}", recipe.name());
        for (role, rel) in recipe.templates() {
            println!("    {:12} {}", role.as_str(), rel);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn resolve_uses_builtin_defaults_without_flags() {
        let temp = TempDir::new().unwrap();
        // An empty mapping pins the config source so a stray ./spool.yaml
        // cannot leak into the test.
        let config_path = temp.path().join("spool.yaml");
        fs::write(&config_path, "{}\n").unwrap();
        let args = JobArgs {
            config: Some(config_path),
            ..JobArgs::default()
        };

        let (recipe, spec) = resolve_job(&args).unwrap();
        assert_eq!(recipe, Recipe::Ray);
        assert_eq!(spec.job_name, "spool-test");
        assert_eq!(spec.partition, "gpu");
        assert_eq!(spec.job_array_size, 2);
        assert_eq!(spec.cpus_per_task, 5);
    }

    #[test]
    fn flags_override_config_file() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("spool.yaml");
        fs::write(&config_path, "partition: cpu\njob_name: from-file\n").unwrap();

        let args = JobArgs {
            config: Some(config_path),
            partition: Some("compute".to_string()),
            ..JobArgs::default()
        };

        let (_, spec) = resolve_job(&args).unwrap();
        assert_eq!(spec.partition, "compute");
        // Unflagged fields come from the file.
        assert_eq!(spec.job_name, "from-file");
    }

    #[test]
    fn explicit_missing_config_is_user_error() {
        let args = JobArgs {
            config: Some(PathBuf::from("/nonexistent/spool.yaml")),
            ..JobArgs::default()
        };

        let err = resolve_job(&args).unwrap_err();
        assert!(matches!(err, SpoolError::UserError(_)));
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn unknown_recipe_fails_before_validation() {
        let args = JobArgs {
            recipe: Some("dask".to_string()),
            ..JobArgs::default()
        };

        let err = resolve_job(&args).unwrap_err();
        assert!(matches!(err, SpoolError::ConfigError(_)));
    }

    #[test]
    fn invalid_spec_is_rejected() {
        let args = JobArgs {
            job_array_size: Some(0),
            ..JobArgs::default()
        };

        let err = resolve_job(&args).unwrap_err();
        assert!(matches!(err, SpoolError::UserError(_)));
    }

    #[test]
    fn recipes_listing_succeeds() {
        assert!(cmd_recipes().is_ok());
    }
}
