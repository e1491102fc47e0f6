use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use runprof::ProfileError;
use runprof::analyse::analyse_log;
use runprof::exec::GhRunner;
use runprof::fetch::fetch_logs;
use runprof::runs::average_duration;

#[derive(Parser)]
#[command(name = "runprof")]
#[command(about = "Profile GitHub Actions workflow runs via the gh CLI", long_about = None)]
#[command(version)]
#[command(disable_help_subcommand = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the average duration of successful runs of a workflow
    Duration {
        /// Workflow name, as known to `gh workflow view`
        workflow: String,
    },

    /// Download per-job logs for successful runs into logs/<job_id>.log
    Logs {
        /// Workflow name, as known to `gh workflow view`
        workflow: String,
    },

    /// Report the slowest steps and log lines of a downloaded log file
    Analyse {
        /// Path to a log file written by `runprof logs`
        logfile: PathBuf,
    },

    // Anything else is rejected with "<command> is not a valid command".
    #[command(external_subcommand)]
    Unknown(Vec<String>),
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    if let Err(e) = run(cli.command) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(command: Commands) -> anyhow::Result<()> {
    let gh = GhRunner;

    match command {
        Commands::Duration { workflow } => {
            println!("{}", average_duration(&gh, &workflow)?);
            Ok(())
        }
        Commands::Logs { workflow } => fetch_logs(&gh, &workflow),
        Commands::Analyse { logfile } => {
            print!("{}", analyse_log(&logfile)?);
            Ok(())
        }
        Commands::Unknown(args) => {
            let command = args.first().cloned().unwrap_or_default();
            Err(ProfileError::InvalidCommand { command }.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_unknown_command_maps_to_invalid_command_error() {
        let cli = Cli::try_parse_from(["runprof", "frobnicate", "ci"]).unwrap();
        let err = run(cli.command).unwrap_err();
        assert_eq!(err.to_string(), "frobnicate is not a valid command");
    }

    #[test]
    fn test_known_subcommands_parse() {
        assert!(Cli::try_parse_from(["runprof", "duration", "ci"]).is_ok());
        assert!(Cli::try_parse_from(["runprof", "logs", "ci"]).is_ok());
        assert!(Cli::try_parse_from(["runprof", "analyse", "logs/1.log"]).is_ok());
    }
}
