//! Implementation of the `spool generate` command.
//!
//! Renders and writes the selected recipe's script set without submitting
//! anything. Useful for inspecting the generated scripts before a real run.

use crate::cli::GenerateArgs;
use crate::commands::resolve_job;
use crate::error::Result;
use crate::events::{Event, EventAction, append_event};
use crate::scripts;
use serde_json::json;

pub fn cmd_generate(args: GenerateArgs) -> Result<()> {
    let (recipe, job) = resolve_job(&args.job)?;

    let scripts = scripts::generate(recipe, &job)?;

    println!();
    println!(
        "Generated {} script(s) for recipe '{}' under {}",
        scripts.len(),
        recipe,
        job.gen_script_dir.display()
    );

    let event = Event::new(EventAction::Generate)
        .with_job(&job.job_name)
        .with_details(json!({
            "recipe": recipe.name(),
            "scripts": scripts
                .iter()
                .map(|(role, path)| json!({
                    "role": role.as_str(),
                    "path": path.display().to_string(),
                }))
                .collect::<Vec<_>>(),
        }));
    if let Err(e) = append_event(&job.log_dir, &event) {
        eprintln!("Warning: failed to log generate event: {}", e);
    }

    Ok(())
}
