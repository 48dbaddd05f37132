//! Script set generation: render every template of a recipe and write the
//! results under the destination root.
//!
//! The destination tree mirrors the template tree. Processing order is
//! immaterial: no role's rendering depends on another role's rendered
//! content, only on its destination path, and the whole layout is resolved
//! up front. Any read, render, or write failure aborts the run; files
//! written before the failure point are left on disk.

use crate::error::{Result, SpoolError};
use crate::fs::write_script;
use crate::job::JobSpec;
use crate::recipe::{Recipe, Role, ScriptLayout};
use crate::template;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Destination paths of one run's generated scripts, keyed by role.
#[derive(Debug, Clone)]
pub struct ScriptSet {
    scripts: BTreeMap<Role, PathBuf>,
}

impl ScriptSet {
    /// Assemble a script set from precomputed destinations.
    pub(crate) fn new(scripts: BTreeMap<Role, PathBuf>) -> Self {
        Self { scripts }
    }

    /// Destination path of a role's generated script.
    pub fn path(&self, role: Role) -> Option<&Path> {
        self.scripts.get(&role).map(PathBuf::as_path)
    }

    /// The orchestrating script sourced to submit the job.
    pub fn entry_point(&self) -> Option<&Path> {
        self.path(Role::Master)
    }

    /// All (role, path) entries in role order.
    pub fn iter(&self) -> impl Iterator<Item = (Role, &Path)> {
        self.scripts.iter().map(|(role, path)| (*role, path.as_path()))
    }

    /// Number of generated scripts.
    pub fn len(&self) -> usize {
        self.scripts.len()
    }
}

/// Generate the full script set for `recipe` from `job`.
///
/// For every (role, template path) pair: read the template from the job's
/// template root, render it against the role's rule set, and write the
/// result executable at the mirrored destination.
pub fn generate(recipe: Recipe, job: &JobSpec) -> Result<ScriptSet> {
    let layout = ScriptLayout::resolve(recipe, &job.gen_script_dir);
    let mut rules = recipe.build_rules(job, &layout);

    let mut scripts = BTreeMap::new();
    for (role, rel) in recipe.templates() {
        let template_path = job.template_dir.join(rel);
        let text = fs::read_to_string(&template_path).map_err(|e| {
            SpoolError::IoError(format!(
                "failed to read template '{}': {}",
                template_path.display(),
                e
            ))
        })?;

        let rule_set = rules.remove(role).ok_or_else(|| {
            SpoolError::ConfigError(format!("recipe '{}' has no rules for role '{}'", recipe, role))
        })?;

        let rendered = template::render(&text, &rule_set).map_err(|e| {
            SpoolError::ConfigError(format!(
                "failed to render template '{}': {}\n\
                 Available rules: {}",
                template_path.display(),
                e,
                rule_set.names().collect::<Vec<_>>().join(", ")
            ))
        })?;

        let dest = layout.path(*role);
        println!("Writing slurm script ({}) to {}", role, dest.display());
        write_script(dest, &rendered)?;
        scripts.insert(*role, dest.to_path_buf());
    }

    Ok(ScriptSet::new(scripts))
}
