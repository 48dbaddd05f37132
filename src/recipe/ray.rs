//! The `ray` recipe: a Ray cluster launched over a scheduler job array.
//!
//! Four scripts cooperate: a master script that submits the batch job, the
//! sbatch script the scheduler executes per array task, and head/worker node
//! startup scripts the sbatch script sources on each node. The sbatch rules
//! embed the node scripts' destination paths, and the master rules embed the
//! sbatch script's destination path.

use crate::job::JobSpec;
use crate::recipe::{Role, RuleSet, ScriptLayout};
use std::collections::BTreeMap;

/// Role to template path table, relative to the template root.
pub(crate) const TEMPLATES: &[(Role, &str)] = &[
    (Role::Master, "ray/ray-master.sh"),
    (Role::Sbatch, "ray/ray-sbatch.sh"),
    (Role::HeadNode, "ray/start-ray-head-node.sh"),
    (Role::WorkerNode, "ray/start-ray-worker-node.sh"),
];

/// Environment setup used when the job supplies none.
pub(crate) const DEFAULT_ENV_SETUP: &str = concat!(
    "export PYTHONPATH=\"${BASE}\":$PYTHONPATH\n",
    "export PATH=\"${HOME}/local/anaconda3/condabin/:$PATH\"\n",
    "source ~/local/anaconda3/etc/profile.d/conda.sh\n",
    "conda activate pt37",
);

/// Seconds between NFS refresh checks in the master script.
const NFS_UPDATE_SECS: u32 = 1;

/// Seconds the sbatch script waits for the head node to initialize.
const APPROX_RAY_INIT_TIME_IN_SECS: u32 = 10;

/// Build the rule set for every ray role.
pub(crate) fn build_rules(job: &JobSpec, layout: &ScriptLayout) -> BTreeMap<Role, RuleSet> {
    let env_setup = job
        .env_setup
        .as_deref()
        .unwrap_or(DEFAULT_ENV_SETUP);

    let mut master = RuleSet::new();
    master.set("nfs_update_secs", NFS_UPDATE_SECS);
    master.set("ray_sbatch_path", layout.path(Role::Sbatch).display());

    let mut sbatch = RuleSet::new();
    sbatch.set("cmd", &job.cmd);
    sbatch.set("log_path", job.log_template().display());
    sbatch.set("job_name", &job.job_name);
    sbatch.set("partition", &job.partition);
    sbatch.set("env_setup", env_setup);
    sbatch.set("array", format!("1-{}", job.job_array_size));
    sbatch.set("cpus_per_task", job.cpus_per_task);
    sbatch.set("approx_ray_init_time_in_secs", APPROX_RAY_INIT_TIME_IN_SECS);
    sbatch.set("head_init_script", layout.path(Role::HeadNode).display());
    sbatch.set("worker_init_script", layout.path(Role::WorkerNode).display());
    if job.gpus_per_task > 0 {
        // Omitted entirely when zero: a template referencing it then fails
        // to render, which is a template/recipe mismatch.
        sbatch.set(
            "sbatch_resources",
            format!("SBATCH --gres=gpu:{}", job.gpus_per_task),
        );
    }

    let mut head_node = RuleSet::new();
    head_node.set("env_setup", env_setup);

    let mut worker_node = RuleSet::new();
    worker_node.set("env_setup", env_setup);

    BTreeMap::from([
        (Role::Master, master),
        (Role::Sbatch, sbatch),
        (Role::HeadNode, head_node),
        (Role::WorkerNode, worker_node),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::Recipe;
    use std::path::{Path, PathBuf};

    fn spec() -> JobSpec {
        JobSpec {
            job_name: "trainer".to_string(),
            cmd: "python train.py".to_string(),
            partition: "gpu".to_string(),
            job_array_size: 4,
            cpus_per_task: 5,
            gpus_per_task: 1,
            env_setup: None,
            template_dir: PathBuf::from("templates"),
            gen_script_dir: PathBuf::from("/gen"),
            log_dir: PathBuf::from("/logs"),
            refresh_logs: false,
        }
    }

    fn build(spec: &JobSpec) -> BTreeMap<Role, RuleSet> {
        let layout = ScriptLayout::resolve(Recipe::Ray, &spec.gen_script_dir);
        build_rules(spec, &layout)
    }

    #[test]
    fn every_role_gets_a_rule_set() {
        let rules = build(&spec());
        for (role, _) in TEMPLATES {
            assert!(rules.contains_key(role), "missing rules for {}", role);
        }
    }

    #[test]
    fn master_embeds_sbatch_destination() {
        let rules = build(&spec());
        assert_eq!(
            rules[&Role::Master].get("ray_sbatch_path"),
            Some("/gen/ray/ray-sbatch.sh")
        );
        assert_eq!(rules[&Role::Master].get("nfs_update_secs"), Some("1"));
    }

    #[test]
    fn sbatch_embeds_node_script_destinations() {
        let rules = build(&spec());
        let sbatch = &rules[&Role::Sbatch];
        assert_eq!(
            sbatch.get("head_init_script"),
            Some("/gen/ray/start-ray-head-node.sh")
        );
        assert_eq!(
            sbatch.get("worker_init_script"),
            Some("/gen/ray/start-ray-worker-node.sh")
        );
    }

    #[test]
    fn array_rule_is_one_based_range() {
        let rules = build(&spec());
        assert_eq!(rules[&Role::Sbatch].get("array"), Some("1-4"));
    }

    #[test]
    fn log_path_rule_uses_array_token() {
        let rules = build(&spec());
        assert_eq!(
            rules[&Role::Sbatch].get("log_path"),
            Some("/logs/trainer/%4a-log.txt")
        );
    }

    #[test]
    fn gpu_count_zero_omits_resource_rule() {
        let mut spec = spec();
        spec.gpus_per_task = 0;
        let rules = build(&spec);
        assert!(rules[&Role::Sbatch].get("sbatch_resources").is_none());
    }

    #[test]
    fn gpu_count_two_is_in_resource_rule() {
        let mut spec = spec();
        spec.gpus_per_task = 2;
        let rules = build(&spec);
        assert_eq!(
            rules[&Role::Sbatch].get("sbatch_resources"),
            Some("SBATCH --gres=gpu:2")
        );
    }

    #[test]
    fn missing_env_setup_falls_back_to_recipe_default() {
        let rules = build(&spec());
        assert_eq!(
            rules[&Role::HeadNode].get("env_setup"),
            Some(DEFAULT_ENV_SETUP)
        );
        assert_eq!(
            rules[&Role::Sbatch].get("env_setup"),
            Some(DEFAULT_ENV_SETUP)
        );
    }

    #[test]
    fn supplied_env_setup_wins_over_default() {
        let mut spec = spec();
        spec.env_setup = Some("module load cuda".to_string());
        let rules = build(&spec);
        assert_eq!(
            rules[&Role::WorkerNode].get("env_setup"),
            Some("module load cuda")
        );
    }

    #[test]
    fn layout_paths_are_relative_to_dest_root() {
        let layout = ScriptLayout::resolve(Recipe::Ray, Path::new("/gen"));
        assert_eq!(
            layout.path(Role::HeadNode),
            Path::new("/gen/ray/start-ray-head-node.sh")
        );
    }
}
