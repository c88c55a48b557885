//! `rf2 check`: validate the RF2 content files found under some paths.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use rf2_validator::{CheckReport, FsSourceConfig, ValidationConfig, check_paths, output};

#[derive(Debug, Clone, Args)]
pub struct CheckArgs {
    /// Files or directories to check
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Glob pattern of paths to leave out (repeatable)
    #[arg(long, value_name = "GLOB")]
    pub exclude: Vec<String>,

    /// Report an empty effectiveTime as an error
    #[arg(long)]
    pub published_only: bool,

    /// Validate rows on the calling thread only
    #[arg(long)]
    pub sequential: bool,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

impl CheckArgs {
    #[must_use]
    pub fn fs_config(&self) -> FsSourceConfig {
        let mut config = FsSourceConfig::new(self.paths.clone());
        config.exclude.clone_from(&self.exclude);
        config
    }

    #[must_use]
    pub fn validation_config(&self) -> ValidationConfig {
        let mut config = ValidationConfig::default();
        config.allow_unpublished = !self.published_only;
        config.parallel = !self.sequential;
        config
    }
}

/// Check the files selected by `args` and write the report to `out`.
///
/// # Errors
/// Returns an error if the check cannot run to completion or the report
/// cannot be written. Content issues are in the returned report.
pub fn run(args: &CheckArgs, out: &mut dyn Write) -> anyhow::Result<CheckReport> {
    let report = check_paths(&args.fs_config(), &args.validation_config())?;
    if args.json {
        output::write_json(&report, out)?;
    } else {
        output::write_human(&report, out)?;
    }
    Ok(report)
}
