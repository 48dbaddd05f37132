//! Recipe definitions and rule-table construction.
//!
//! A recipe is a named, fixed set of (role, template path) entries plus the
//! logic that derives each role's rule set from a job specification. Exactly
//! one recipe is active per job. The set of recipes is closed: selection is a
//! dispatch over the `Recipe` enum, and an unrecognized name fails before any
//! generation work is attempted.
//!
//! Rule tables cross-reference generated paths (the orchestrating script
//! embeds the submission script's destination, the submission script embeds
//! the node-startup scripts' destinations), so the destination layout is
//! computed first and passed into rule building.

mod ray;

use crate::error::{Result, SpoolError};
use crate::job::JobSpec;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// The functional label of one template/script within a recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Role {
    /// Orchestrating script sourced to launch the whole job.
    Master,
    /// Submission script handed to the scheduler.
    Sbatch,
    /// Startup script for the head node of the cluster.
    HeadNode,
    /// Startup script for each worker node.
    WorkerNode,
}

impl Role {
    /// Stable label used in progress output and event details.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Master => "master",
            Role::Sbatch => "sbatch",
            Role::HeadNode => "head-node",
            Role::WorkerNode => "worker-node",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Substitution table for one template: placeholder name to stringified value.
///
/// Produced fresh for each generation run. Every placeholder name appearing
/// in the template must be present as a key, or rendering fails.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    rules: BTreeMap<String, String>,
}

impl RuleSet {
    /// Create an empty rule set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a rule. Values are stringified on insertion so numeric rule
    /// values (counts, durations) can be set directly.
    pub fn set(&mut self, name: impl Into<String>, value: impl ToString) {
        self.rules.insert(name.into(), value.to_string());
    }

    /// Look up a rule value by its exact name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.rules.get(name).map(String::as_str)
    }

    /// Registered rule names, in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }
}

/// A named, fixed template-and-rule-generation strategy for one class of job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recipe {
    /// Ray cluster over a scheduler job array: one orchestrating script, one
    /// submission script, head/worker node startup scripts.
    Ray,
}

/// All recipes, for listings.
pub const RECIPES: &[Recipe] = &[Recipe::Ray];

impl Recipe {
    /// Select a recipe by name. Unrecognized names fail immediately; no
    /// partial work is attempted.
    pub fn parse(name: &str) -> Result<Self> {
        match name {
            "ray" => Ok(Recipe::Ray),
            other => Err(SpoolError::ConfigError(format!(
                "recipe: {} unrecognised",
                other
            ))),
        }
    }

    /// The recipe's name as used on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Recipe::Ray => "ray",
        }
    }

    /// The fixed (role, template path) table, paths relative to the
    /// template root.
    pub fn templates(&self) -> &'static [(Role, &'static str)] {
        match self {
            Recipe::Ray => ray::TEMPLATES,
        }
    }

    /// Build the rule set for every role of this recipe.
    ///
    /// The destination layout must be resolved beforehand: rule values embed
    /// the generated scripts' destination paths.
    pub fn build_rules(&self, job: &JobSpec, layout: &ScriptLayout) -> BTreeMap<Role, RuleSet> {
        match self {
            Recipe::Ray => ray::build_rules(job, layout),
        }
    }
}

impl fmt::Display for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Destination paths of a recipe's generated scripts, keyed by role.
///
/// Computed deterministically from the destination root before any rendering
/// happens: the destination mirrors each template's path relative to the
/// template root.
#[derive(Debug, Clone)]
pub struct ScriptLayout {
    dest: BTreeMap<Role, PathBuf>,
}

impl ScriptLayout {
    /// Resolve the destination path for every role of `recipe` under
    /// `dest_root`.
    pub fn resolve(recipe: Recipe, dest_root: &Path) -> Self {
        let dest = recipe
            .templates()
            .iter()
            .map(|(role, rel)| (*role, dest_root.join(rel)))
            .collect();
        Self { dest }
    }

    /// Destination path for a role of the resolved recipe.
    pub fn path(&self, role: Role) -> &Path {
        self.dest
            .get(&role)
            .expect("role missing from resolved layout")
    }
}
