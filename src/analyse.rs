//! Log-file parsing and duration reports.
//!
//! A downloaded job log is tab-separated: job, step, then a combined
//! `<timestamp>Z <message>` field. All durations come from timestamp
//! differencing: per line against the next line, per step between the
//! first and last line carrying that step. File order is assumed
//! chronological; out-of-order input is not validated and shows up as a
//! negative duration.

use std::fs;
use std::path::Path;

use anyhow::Context;
use chrono::{Duration, NaiveDateTime};
use indexmap::IndexMap;

use crate::error::ProfileError;

const JOB_FIELD: usize = 0;
const STEP_FIELD: usize = 1;
/// Combined `<timestamp>Z <message>` field. Content after a further tab,
/// if any, is discarded.
const MIXED_FIELD: usize = 2;

/// ISO-8601 UTC marker separating the timestamp from the message text.
const ZULU_MARKER: &str = "Z ";

/// Timestamp layout as written by `gh run view --log`, zone marker
/// excluded. The fractional part is optional.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// How many of the slowest lines the actions report shows.
const TOP_ACTIONS: usize = 10;

const SEPARATOR: &str = "++++++++++++++++++++";

/// One parsed log line.
///
/// Immutable once parsed; per-line durations live in a separate parallel
/// vector (see [`line_durations`]) rather than a mutable field.
///
/// The timestamp is kept naive: the `Z` marker is stripped at parse time
/// and no zone is attached, since only differences between timestamps are
/// consumed downstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub job: String,
    pub step: String,
    pub timestamp: NaiveDateTime,
    pub message: String,
}

/// Parse a whole log file body. Any malformed line is a hard error naming
/// its 1-based line number; lines are never silently skipped.
pub fn parse_log_lines(text: &str) -> anyhow::Result<Vec<LogLine>> {
    text.lines()
        .enumerate()
        .map(|(idx, line)| parse_line(idx + 1, line))
        .collect()
}

fn parse_line(number: usize, line: &str) -> anyhow::Result<LogLine> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() <= MIXED_FIELD {
        return Err(ProfileError::MalformedLogLine {
            line: number,
            message: format!("expected 3 tab-separated fields, got {}", fields.len()),
        }
        .into());
    }

    let mixed = fields[MIXED_FIELD];
    let Some((timestamp_text, message)) = mixed.split_once(ZULU_MARKER) else {
        return Err(ProfileError::MalformedLogLine {
            line: number,
            message: format!("no {ZULU_MARKER:?} marker in field {mixed:?}"),
        }
        .into());
    };

    let timestamp =
        NaiveDateTime::parse_from_str(timestamp_text, TIMESTAMP_FORMAT).map_err(|e| {
            ProfileError::MalformedLogLine {
                line: number,
                message: format!("bad timestamp {timestamp_text:?}: {e}"),
            }
        })?;

    Ok(LogLine {
        job: fields[JOB_FIELD].to_string(),
        step: fields[STEP_FIELD].to_string(),
        timestamp,
        message: message.to_string(),
    })
}

/// Per-line durations: each line against the next. The final line has no
/// next line and therefore no duration.
pub fn line_durations(lines: &[LogLine]) -> Vec<Option<Duration>> {
    lines
        .iter()
        .enumerate()
        .map(|(i, line)| lines.get(i + 1).map(|next| next.timestamp - line.timestamp))
        .collect()
}

/// Per-step durations, descending by duration (stable for ties).
///
/// A step's duration is the timestamp of its last line minus its first, so
/// a single-line step is 0. Grouping assumes a step's lines are contiguous;
/// if a step reappears later, only its first and last occurrence matter and
/// the gap in between is counted.
pub fn step_durations(lines: &[LogLine]) -> Vec<(String, Duration)> {
    let mut groups: IndexMap<&str, (NaiveDateTime, NaiveDateTime)> = IndexMap::new();
    for line in lines {
        groups
            .entry(line.step.as_str())
            .and_modify(|(_, last)| *last = line.timestamp)
            .or_insert((line.timestamp, line.timestamp));
    }

    let mut steps: Vec<(String, Duration)> = groups
        .into_iter()
        .map(|(step, (first, last))| (step.to_string(), last - first))
        .collect();
    steps.sort_by(|a, b| b.1.cmp(&a.1));
    steps
}

/// The slowest lines, excluding the final line (it has no duration).
/// Descending by duration; ties keep file order.
pub fn top_actions(lines: &[LogLine]) -> Vec<(&LogLine, Duration)> {
    let durations = line_durations(lines);
    let mut timed: Vec<(&LogLine, Duration)> = lines
        .iter()
        .zip(durations)
        .filter_map(|(line, duration)| duration.map(|d| (line, d)))
        .collect();
    timed.sort_by(|a, b| b.1.cmp(&a.1));
    timed.truncate(TOP_ACTIONS);
    timed
}

/// Render both reports: steps by duration, then the top-10 slowest lines.
pub fn render_reports(lines: &[LogLine]) -> String {
    let mut out = String::new();

    out.push_str("Steps in order of duration\n");
    for (step, duration) in step_durations(lines) {
        out.push_str(&format!(
            "Step: {step} | Duration: {}\n",
            format_duration(duration)
        ));
    }
    out.push_str(SEPARATOR);
    out.push('\n');

    out.push_str("Top 10 actions:\n");
    for (rank, (line, duration)) in top_actions(lines).iter().enumerate() {
        out.push_str(&format!(
            "{} - {} - {}\n",
            rank + 1,
            line.message,
            format_duration(*duration)
        ));
    }
    out.push_str(SEPARATOR);
    out.push('\n');

    out
}

/// Read, parse, and render one log file.
pub fn analyse_log(path: &Path) -> anyhow::Result<String> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read log file {}", path.display()))?;
    let lines = parse_log_lines(&text)?;
    Ok(render_reports(&lines))
}

/// Seconds, with a fractional part only when one is present (`5s`, `7.25s`).
fn format_duration(duration: Duration) -> String {
    let secs = duration.num_milliseconds() as f64 / 1000.0;
    format!("{secs}s")
}
