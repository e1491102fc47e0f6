//! Per-job log download for successful workflow runs.
//!
//! For every successful run of a workflow, lists the run's job ids via a
//! jq-style `--json`/`-q` query and writes each job's full log to
//! `logs/<job_id>.log`. Strictly sequential, run-by-run then job-by-job in
//! tool-reported order; the first failed invocation aborts the pipeline.

use std::fs;
use std::path::Path;

use anyhow::Context;

use crate::exec::CommandRunner;
use crate::runs::{list_successful_runs, parse_integer_prefix};

/// Directory receiving job logs, relative to the working directory.
const LOG_DIR: &str = "logs";

/// Query handed to `gh` to flatten a run's jobs to one id per line.
const JOB_IDS_QUERY: &str = ".jobs[].databaseId";

/// Download the logs of every job of every successful run of `workflow`.
///
/// Prints one `Writing <path>` line per file. Existing files are
/// overwritten; repeated job ids are not deduplicated.
pub fn fetch_logs(gh: &dyn CommandRunner, workflow: &str) -> anyhow::Result<()> {
    fetch_logs_into(gh, workflow, Path::new(LOG_DIR))
}

/// As [`fetch_logs`], with an explicit target directory.
pub fn fetch_logs_into(
    gh: &dyn CommandRunner,
    workflow: &str,
    dir: &Path,
) -> anyhow::Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

    for run in list_successful_runs(gh, workflow)? {
        let run_id = run.run_id.to_string();
        let ids_output =
            gh.run(&["run", "view", &run_id, "--json", "jobs", "-q", JOB_IDS_QUERY])?;

        for job_id in ids_output.lines().map(parse_integer_prefix) {
            let log = gh.run(&["run", "view", &format!("--job={job_id}"), "--log"])?;
            let path = dir.join(format!("{job_id}.log"));
            println!("Writing {}", path.display());
            fs::write(&path, log.lines().collect::<Vec<_>>().join("\n"))
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
    }

    Ok(())
}
