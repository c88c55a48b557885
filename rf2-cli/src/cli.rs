//! Command line definition and dispatch.
//!
//! Commands:
//! - rf2 check <paths>... [--exclude GLOB] [--json]
//! - rf2 create --date YYYYMMDD --source <path>... --output <file> [--type T] [--release R]

use std::io::{self, Write};

use clap::{ArgAction, Parser, Subcommand};

use crate::check::{self, CheckArgs};
use crate::create::{self, CreateArgs};
use crate::logging;

/// Check and assemble SNOMED CT RF2 release files
#[derive(Parser, Debug)]
#[command(name = "rf2")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate headers and column values of RF2 content files
    Check(CheckArgs),

    /// Assemble a Full, Snapshot or Delta content file from source files
    Create(CreateArgs),
}

/// Parse the process arguments and run the selected command.
///
/// # Errors
/// Returns an error if the command fails or, for `check`, finds errors.
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose)?;
    execute(&cli.command)
}

/// Run `command`, writing results to stdout and issues to stderr.
///
/// # Errors
/// See [`run`].
pub fn execute(command: &Command) -> anyhow::Result<()> {
    match command {
        Command::Check(args) => {
            let report = check::run(args, &mut io::stdout().lock())?;
            if !report.ok {
                anyhow::bail!("{} error(s) found", report.errors_count());
            }
        }
        Command::Create(args) => {
            let outcome = create::run(args)?;
            let mut stderr = io::stderr().lock();
            for issue in &outcome.issues {
                writeln!(stderr, "{}", create::paint(issue))?;
            }
            writeln!(
                io::stdout().lock(),
                "Created '{}' ({} {}): {} rows, {} conflicting duplicates skipped",
                outcome.file.path().display(),
                outcome.file.content_type(),
                outcome.file.release_type(),
                outcome.summary.rows_written,
                outcome.summary.conflicts
            )?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rf2::{ContentType, ReleaseType};
    use std::path::PathBuf;

    #[test]
    fn test_parse_check() {
        let cli = Cli::try_parse_from([
            "rf2", "-vv", "check", "release", "--exclude", "*Delta*", "--json",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        let Command::Check(args) = cli.command else {
            panic!("expected check");
        };
        assert_eq!(args.paths, [PathBuf::from("release")]);
        assert_eq!(args.exclude, ["*Delta*"]);
        assert!(args.json);
        assert!(args.validation_config().allow_unpublished);
    }

    #[test]
    fn test_check_requires_a_path() {
        assert!(Cli::try_parse_from(["rf2", "check"]).is_err());
    }

    #[test]
    fn test_parse_create() {
        let cli = Cli::try_parse_from([
            "rf2",
            "create",
            "--type",
            "statedrelationship",
            "--release",
            "snapshot",
            "--date",
            "20200131",
            "--source",
            "a",
            "--source",
            "b",
            "--output",
            "out.txt",
        ])
        .unwrap();
        let Command::Create(args) = cli.command else {
            panic!("expected create");
        };
        assert_eq!(args.content_type, Some(ContentType::StatedRelationship));
        assert_eq!(args.release, Some(ReleaseType::Snapshot));
        assert_eq!(args.sources, [PathBuf::from("a"), PathBuf::from("b")]);
    }

    #[test]
    fn test_parse_create_rejects_unknown_release() {
        let result = Cli::try_parse_from([
            "rf2", "create", "--release", "weekly", "--date", "20200131", "--source", "a",
            "--output", "o.txt",
        ]);
        assert!(result.is_err());
    }
}
