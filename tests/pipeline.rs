//! End-to-end pipeline test: a scripted `gh` feeds the log fetcher, and
//! the analyser reads back the file it wrote.

use std::collections::HashMap;
use std::fs;

use runprof::analyse::{analyse_log, parse_log_lines};
use runprof::exec::CommandRunner;
use runprof::fetch::fetch_logs_into;
use runprof::runs::average_duration;

struct FakeGh {
    responses: HashMap<String, String>,
}

impl FakeGh {
    fn new(responses: &[(&str, &str)]) -> Self {
        Self {
            responses: responses
                .iter()
                .map(|(args, stdout)| (args.to_string(), stdout.to_string()))
                .collect(),
        }
    }
}

impl CommandRunner for FakeGh {
    fn run(&self, args: &[&str]) -> anyhow::Result<String> {
        let key = args.join(" ");
        self.responses
            .get(&key)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("unscripted gh call: {key}"))
    }
}

const WORKFLOW_VIEW: &str = "completed\tsuccess\tAdd caching\tci\tmain\tpush\t3m45s\t910\n\
                             completed\tfailure\tBreak things\tci\tmain\tpush\t1m2s\t911\n";

const JOB_LOG: &str = "build\tSet up job\t2024-06-01T10:00:00.0000000Z Runner started\n\
                       build\tSet up job\t2024-06-01T10:00:02.0000000Z Image ready\n\
                       build\tRun tests\t2024-06-01T10:00:02.5000000Z cargo test\n\
                       build\tRun tests\t2024-06-01T10:00:42.0000000Z test result: ok\n";

#[test]
fn fetch_then_analyse_round_trips() {
    let gh = FakeGh::new(&[
        ("workflow view ci", WORKFLOW_VIEW),
        ("run view 910 --json jobs -q .jobs[].databaseId", "37\n"),
        ("run view --job=37 --log", JOB_LOG),
    ]);

    let dir = tempfile::tempdir().unwrap();
    fetch_logs_into(&gh, "ci", dir.path()).unwrap();

    let log_path = dir.path().join("37.log");
    let written = fs::read_to_string(&log_path).unwrap();
    let lines = parse_log_lines(&written).unwrap();

    // The fetcher-written file parses back to the same (job, step, message)
    // tuples the fake gh emitted.
    let tuples: Vec<(&str, &str, &str)> = lines
        .iter()
        .map(|l| (l.job.as_str(), l.step.as_str(), l.message.as_str()))
        .collect();
    assert_eq!(
        tuples,
        vec![
            ("build", "Set up job", "Runner started"),
            ("build", "Set up job", "Image ready"),
            ("build", "Run tests", "cargo test"),
            ("build", "Run tests", "test result: ok"),
        ]
    );

    let report = analyse_log(&log_path).unwrap();
    insta::assert_snapshot!(report, @r"
    Steps in order of duration
    Step: Run tests | Duration: 39.5s
    Step: Set up job | Duration: 2s
    ++++++++++++++++++++
    Top 10 actions:
    1 - cargo test - 39.5s
    2 - Runner started - 2s
    3 - Image ready - 0.5s
    ++++++++++++++++++++
    ");
}

#[test]
fn duration_uses_only_successful_runs() {
    let gh = FakeGh::new(&[("workflow view ci", WORKFLOW_VIEW)]);
    assert_eq!(
        average_duration(&gh, "ci").unwrap(),
        "Avg duration for ci: 225s"
    );
}
