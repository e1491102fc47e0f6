//! Successful-run listing and duration averaging.
//!
//! `gh workflow view <name>` prints a workflow's run history as
//! tab-separated columns. We keep only the lines reporting `success` and
//! read two fixed columns from each. The column contract is load-bearing,
//! so the indices live in named constants rather than inline magic numbers.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::ProfileError;
use crate::exec::CommandRunner;

/// Column holding the human-readable duration field (e.g. `3m45s`).
const DURATION_FIELD: usize = 6;
/// Column holding the run id.
const RUN_ID_FIELD: usize = 7;

static DIGIT_GROUPS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("digit pattern is valid"));

/// One successful run of a workflow, as reported by `gh workflow view`.
///
/// Derived from a single output line; lives only within one pipeline
/// invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuccessfulRun {
    pub duration_secs: u64,
    pub run_id: u64,
}

/// List the successful runs of `workflow`, newest first (tool order).
///
/// Filtering is a plain text match on `success`, mirroring the original
/// `gh workflow view <name> | grep success` pipeline.
pub fn list_successful_runs(
    gh: &dyn CommandRunner,
    workflow: &str,
) -> anyhow::Result<Vec<SuccessfulRun>> {
    let output = gh.run(&["workflow", "view", workflow])?;

    output
        .lines()
        .filter(|line| line.contains("success"))
        .map(parse_run_line)
        .collect()
}

/// Mean duration over all successful runs, rendered for the CLI.
///
/// Integer division, matching the original tool's integer arithmetic.
/// Zero successful runs is an error, never a silent zero.
pub fn average_duration(gh: &dyn CommandRunner, workflow: &str) -> anyhow::Result<String> {
    let runs = list_successful_runs(gh, workflow)?;
    if runs.is_empty() {
        return Err(ProfileError::NoSuccessfulRuns {
            workflow: workflow.to_string(),
        }
        .into());
    }

    let total: u64 = runs.iter().map(|run| run.duration_secs).sum();
    let avg = total / runs.len() as u64;
    Ok(format!("Avg duration for {workflow}: {avg}s"))
}

fn parse_run_line(line: &str) -> anyhow::Result<SuccessfulRun> {
    let fields: Vec<&str> = line.split('\t').collect();

    Ok(SuccessfulRun {
        duration_secs: parse_duration_field(field(&fields, DURATION_FIELD, line)?),
        run_id: parse_integer_prefix(field(&fields, RUN_ID_FIELD, line)?),
    })
}

fn field<'a>(fields: &[&'a str], index: usize, line: &str) -> anyhow::Result<&'a str> {
    fields.get(index).copied().ok_or_else(|| {
        ProfileError::ParseError {
            message: format!(
                "expected at least {} tab-separated columns in run line {line:?}",
                index + 1
            ),
        }
        .into()
    })
}

/// Collapse a human-readable duration field to seconds.
///
/// Every digit group folds left-to-right as `acc * 60 + group`, so `3m45s`
/// is 225 and a bare `59s` is 59. At most minutes+seconds granularity is
/// assumed in the source text; the formula is not generalized beyond what
/// `gh` emits. A field with no digits collapses to 0.
pub(crate) fn parse_duration_field(field: &str) -> u64 {
    DIGIT_GROUPS
        .find_iter(field)
        .map(|group| group.as_str().parse::<u64>().unwrap_or(0))
        .fold(0, |acc, value| acc * 60 + value)
}

/// Integer-parse the leading run of ASCII digits, ignoring the rest.
///
/// Non-numeric content parses to 0 rather than erroring; run-id columns
/// have relied on that since the original tool.
pub(crate) fn parse_integer_prefix(text: &str) -> u64 {
    text.trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect::<String>()
        .parse()
        .unwrap_or(0)
}
