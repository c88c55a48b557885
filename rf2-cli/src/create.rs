//! `rf2 create`: assemble one content file from source release files.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use colored::{ColoredString, Colorize};
use rf2::{
    ContentFile, ContentType, CreateContext, FsRowSource, FsSourceConfig, Issue, IssueCollector,
    MergeSummary, ReleaseType, Severity,
};
use tracing::warn;

#[derive(Debug, Clone, Args)]
pub struct CreateArgs {
    /// Content type of the output, e.g. Concept or Language.
    /// Inferred from the output file name when omitted.
    #[arg(long = "type", value_name = "TYPE")]
    pub content_type: Option<ContentType>,

    /// Full, Snapshot or Delta. Inferred from the output file name when omitted.
    #[arg(long)]
    pub release: Option<ReleaseType>,

    /// Release date (YYYYMMDD); selects the rows of a Delta
    #[arg(long)]
    pub date: String,

    /// Source file or directory of release files (repeatable)
    #[arg(long = "source", value_name = "PATH", required = true)]
    pub sources: Vec<PathBuf>,

    /// Glob pattern of source paths to leave out (repeatable)
    #[arg(long, value_name = "GLOB")]
    pub exclude: Vec<String>,

    /// File to create; must not exist yet
    #[arg(long)]
    pub output: PathBuf,
}

/// What a create run produced.
#[derive(Debug)]
pub struct CreateOutcome {
    pub file: ContentFile,
    pub summary: MergeSummary,
    pub issues: Vec<Issue>,
}

/// The content file `args` asks for, filling in unset types from the output name.
///
/// # Errors
/// Returns an error if a type is neither given nor inferable.
pub fn resolve_file(args: &CreateArgs) -> anyhow::Result<ContentFile> {
    let inferred = ContentFile::from_path(&args.output);
    let content_type = args
        .content_type
        .or_else(|| inferred.as_ref().map(ContentFile::content_type))
        .with_context(|| {
            format!(
                "Cannot infer the content type from '{}'; pass --type",
                args.output.display()
            )
        })?;
    let release_type = args
        .release
        .or_else(|| inferred.as_ref().map(ContentFile::release_type))
        .with_context(|| {
            format!(
                "Cannot infer the release type from '{}'; pass --release",
                args.output.display()
            )
        })?;
    Ok(ContentFile::new(&args.output, content_type, release_type))
}

/// Create the file described by `args`.
///
/// # Errors
/// Returns an error if the release date is invalid, a source cannot be read,
/// or the output cannot be created.
pub fn run(args: &CreateArgs) -> anyhow::Result<CreateOutcome> {
    let file = resolve_file(args)?;

    let mut fs_config = FsSourceConfig::new(args.sources.clone());
    fs_config.exclude.clone_from(&args.exclude);
    let source = FsRowSource::discover(&fs_config)?;
    if source.files().is_empty() {
        warn!("No release files found under the source paths");
    }

    let collector = IssueCollector::new();
    let context = CreateContext::new(&args.date, &source, &collector)?;
    let summary = file
        .create(&context)
        .with_context(|| format!("Failed to create '{}'", args.output.display()))?;

    Ok(CreateOutcome {
        file,
        summary,
        issues: collector.into_issues(),
    })
}

/// An issue line colored by severity.
#[must_use]
pub fn paint(issue: &Issue) -> ColoredString {
    let line = issue.format_human_readable();
    match issue.severity {
        Severity::Warn => line.yellow(),
        Severity::Error => line.red(),
    }
}
