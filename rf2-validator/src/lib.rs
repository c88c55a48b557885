//! # rf2-validator
//!
//! Header and column validation of SNOMED CT RF2 content files.
//!
//! Every file is first held against the header of its content type. Files
//! whose header conforms then have each cell checked by the validator the
//! catalogue assigns to its column. Problems are reported as issues; only I/O
//! and catalogue defects abort a run.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//! use rf2_validator::{check_paths, FsSourceConfig, ValidationConfig};
//!
//! let mut fs_config = FsSourceConfig::default();
//! fs_config.paths = vec![PathBuf::from("release/Snapshot")];
//!
//! let report = check_paths(&fs_config, &ValidationConfig::default()).unwrap();
//! println!("Files checked: {}", report.files_checked);
//! println!("Errors: {}", report.errors_count());
//! println!("OK: {}", report.ok);
//! ```

mod config;
mod error;
mod header;
pub mod output;
mod pipeline;
mod report;
mod validator;

pub use config::ValidationConfig;
pub use error::CatalogueError;
pub use header::{HeaderCheck, check_header};
pub use pipeline::{check_file, validate_row};
pub use report::CheckReport;
pub use rf2::FsSourceConfig;
pub use validator::{CatalogueEntry, ColumnValidator, SCTID_COLUMNS, ValidatorCatalogue};

use anyhow::Context;
use rf2::{ContentFile, IdentifierScheme, IssueCollector, find_release_files};
use tracing::{debug, info};

/// Check every RF2 content file found under `fs_config`.
///
/// Content and release type are inferred from each file name; `.txt` files
/// with other names are skipped.
///
/// # Errors
///
/// Returns an error if `fs_config.paths` is empty, a path does not exist, the
/// validator catalogue is inconsistent, or a file cannot be read.
pub fn check_paths(
    fs_config: &FsSourceConfig,
    validation_config: &ValidationConfig,
) -> anyhow::Result<CheckReport> {
    if fs_config.paths.is_empty() {
        anyhow::bail!("No paths provided for validation");
    }
    let files = find_release_files(fs_config)?;

    let components = ValidatorCatalogue::builtin(IdentifierScheme::Sctid)?;
    let members = ValidatorCatalogue::builtin(IdentifierScheme::Uuid)?;

    let collector = IssueCollector::new();
    let mut files_checked: usize = 0;
    let mut files_skipped: usize = 0;
    for path in files {
        let Some(file) = ContentFile::from_path(&path) else {
            debug!("Skipping '{}': not an RF2 content file name", path.display());
            files_skipped += 1;
            continue;
        };
        let catalogue = match file.content_type().identifier_scheme() {
            IdentifierScheme::Sctid => &components,
            IdentifierScheme::Uuid => &members,
        };
        info!(
            "Checking '{}' ({} {})",
            path.display(),
            file.content_type(),
            file.release_type()
        );
        check_file(&file, catalogue, validation_config, &collector)
            .with_context(|| format!("Failed to check '{}'", path.display()))?;
        files_checked += 1;
    }

    Ok(CheckReport::new(
        files_checked,
        files_skipped,
        collector.into_issues(),
    ))
}
