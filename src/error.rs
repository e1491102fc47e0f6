//! Typed errors for runprof.
//!
//! Domain failures are `ProfileError` variants converted to `anyhow::Error`
//! with `.into()`, so intermediate layers propagate with `?` while `main`
//! can still downcast for pattern matching and display. There is no
//! recovery anywhere: every variant terminates the run with a message and
//! a non-zero exit.

use thiserror::Error;

/// Domain errors for the three pipelines.
#[derive(Debug, Clone, Error)]
pub enum ProfileError {
    /// `gh` exited non-zero. Carries whatever the tool printed.
    #[error("gh {command} failed: {message}")]
    CommandFailed { command: String, message: String },

    /// `gh` output did not have the expected column shape.
    #[error("{message}")]
    ParseError { message: String },

    /// A log-file line was missing fields or its timestamp marker.
    #[error("malformed log line {line}: {message}")]
    MalformedLogLine { line: usize, message: String },

    /// Averaging was requested for a workflow with no successful runs.
    #[error("no successful runs found for workflow '{workflow}'")]
    NoSuccessfulRuns { workflow: String },

    /// Unknown CLI subcommand.
    #[error("{command} is not a valid command")]
    InvalidCommand { command: String },
}

/// Check if an error is a specific ProfileError variant
pub fn is_profile_error<F>(err: &anyhow::Error, predicate: F) -> bool
where
    F: FnOnce(&ProfileError) -> bool,
{
    err.downcast_ref::<ProfileError>().is_some_and(predicate)
}
