//! # landreg CLI entry point
//!
//! Parses command-line arguments, initializes tracing and dispatches to
//! the registry subcommands.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use landreg_cli::commands::{run_command, Command, SessionOpts};
use landreg_cli::DEFAULT_LEDGER_FILE;

/// Land registry CLI.
///
/// Files, reviews, registers and transfers land parcels against a local
/// ledger snapshot.
#[derive(Parser, Debug)]
#[command(name = "landreg", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Ledger snapshot file.
    #[arg(long, global = true, default_value = DEFAULT_LEDGER_FILE)]
    ledger: PathBuf,

    /// Workflow configuration YAML.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// MSP id of the submitting organization.
    #[arg(long, global = true, default_value = "Org3MSP")]
    msp: String,

    #[command(subcommand)]
    command: Command,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let opts = SessionOpts {
        ledger: cli.ledger,
        config: cli.config,
        msp: cli.msp,
    };
    tracing::debug!(ledger = %opts.ledger.display(), msp = %opts.msp, "landreg starting");

    match run_command(&cli.command, &opts) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "landreg",
            "deed",
            "--id",
            "17x",
            "--msp",
            "Org2MSP",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.msp, "Org2MSP");
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.ledger, PathBuf::from(DEFAULT_LEDGER_FILE));
        assert!(matches!(cli.command, Command::Deed { .. }));
    }

    #[test]
    fn review_flags_parse() {
        let cli = Cli::try_parse_from([
            "landreg",
            "approve",
            "--id",
            "12dhakadhaka7xy",
            "--official-nid",
            "900",
            "--reject",
            "--comment",
            "survey missing",
            "--role",
            "mol",
        ])
        .unwrap();
        match cli.command {
            Command::Approve(review) => {
                assert!(review.reject);
                assert_eq!(review.official_nid, 900);
                assert_eq!(review.comment, "survey missing");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn create_requires_owner() {
        assert!(Cli::try_parse_from([
            "landreg", "create", "--dag-no", "1", "--district", "a", "--division", "b",
            "--khatian-no", "2", "--mouza", "c", "--upazila", "d",
        ])
        .is_err());
    }
}
