//! Subprocess execution for the GitHub CLI.
//!
//! Every external invocation goes through the [`CommandRunner`] trait, so
//! tests can substitute canned output for a live, authenticated `gh`. The
//! production [`GhRunner`] blocks until `gh` exits; there is no timeout, so
//! a hung tool hangs the program.

use std::process::Command;

use anyhow::Context;

use crate::error::ProfileError;

/// Capability for running `gh` and capturing its stdout.
pub trait CommandRunner {
    /// Run `gh` with `args`, returning captured stdout on success.
    ///
    /// A non-zero exit is an error carrying the tool's own output; callers
    /// propagate it rather than retrying.
    fn run(&self, args: &[&str]) -> anyhow::Result<String>;
}

/// Production runner: invokes `gh` from `PATH`.
///
/// `gh` must be installed and authenticated. A missing or unauthenticated
/// tool surfaces as an error from the first invocation.
#[derive(Debug, Clone, Copy, Default)]
pub struct GhRunner;

impl CommandRunner for GhRunner {
    fn run(&self, args: &[&str]) -> anyhow::Result<String> {
        log::debug!("Running: gh {}", args.join(" "));

        let output = Command::new("gh")
            .args(args)
            .output()
            .with_context(|| format!("Failed to execute: gh {}", args.join(" ")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            let message = [stderr.trim(), stdout.trim()]
                .into_iter()
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join("\n");
            return Err(ProfileError::CommandFailed {
                command: args.join(" "),
                message,
            }
            .into());
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
