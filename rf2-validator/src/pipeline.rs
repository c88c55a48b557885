//! Per-row and per-file validation.
//!
//! Rows validate independently of one another, so a file's rows are checked
//! in chunks on the rayon pool. Issues are gathered per row and forwarded in
//! row order, making reports independent of scheduling.

use std::path::Path;

use rayon::prelude::*;
use rf2::{
    ContentFile, Issue, IssueAcceptor, IssueCollector, IssueLocation, Rf2Error, Row, ScopedAcceptor,
};
use tracing::debug;

use crate::config::ValidationConfig;
use crate::header::check_header;
use crate::validator::{ColumnValidator, ValidatorCatalogue};

/// Rows read ahead and validated together.
const CHUNK_ROWS: usize = 8192;

/// Apply `validators` to the cells of one data row.
///
/// `row_number` is 1-based and does not count the header. Every failing cell
/// is reported; validation never stops at the first one.
pub fn validate_row(
    file: &Path,
    header: &[String],
    row_number: usize,
    row: &[String],
    validators: &[ColumnValidator],
    config: &ValidationConfig,
    acceptor: &dyn IssueAcceptor,
) {
    if row.len() != header.len() {
        acceptor.accept(Issue {
            location: IssueLocation {
                file: Some(file.to_path_buf()),
                row: Some(row_number),
                column: None,
            },
            ..Issue::error(format!(
                "Row {row_number} has {} columns, expected {}",
                row.len(),
                header.len()
            ))
        });
        return;
    }
    for ((value, column), validator) in row.iter().zip(header).zip(validators) {
        if let Err(e) = validator.check(value, config) {
            let scoped = ScopedAcceptor::with_location(
                acceptor,
                IssueLocation {
                    file: Some(file.to_path_buf()),
                    row: Some(row_number),
                    column: Some(column.clone()),
                },
            );
            scoped.error(e.to_string());
        }
    }
}

/// Check one content file: header contract, then every row.
///
/// A header mismatch is reported once and no row is checked.
///
/// # Errors
/// Returns an error if the file cannot be read.
pub fn check_file(
    file: &ContentFile,
    catalogue: &ValidatorCatalogue,
    config: &ValidationConfig,
    acceptor: &dyn IssueAcceptor,
) -> Result<(), Rf2Error> {
    let path = file.path();
    let file_acceptor = ScopedAcceptor::for_file(acceptor, path);
    let header = file.header()?;
    if !check_header(&header, &file.header_spec(), &file_acceptor).conforms() {
        debug!("Skipping rows of '{}': header mismatch", path.display());
        return Ok(());
    }
    let validators = catalogue.resolve(&header, &file_acceptor);

    let mut chunk: Vec<(usize, Row)> = Vec::with_capacity(CHUNK_ROWS);
    for (index, row) in file.rows()?.enumerate() {
        chunk.push((index + 1, row?));
        if chunk.len() == CHUNK_ROWS {
            check_chunk(path, &header, &chunk, &validators, config, acceptor);
            chunk.clear();
        }
    }
    check_chunk(path, &header, &chunk, &validators, config, acceptor);
    Ok(())
}

fn check_chunk(
    path: &Path,
    header: &[String],
    chunk: &[(usize, Row)],
    validators: &[ColumnValidator],
    config: &ValidationConfig,
    acceptor: &dyn IssueAcceptor,
) {
    let check = |(row_number, row): &(usize, Row)| {
        let collector = IssueCollector::new();
        validate_row(path, header, *row_number, row, validators, config, &collector);
        collector.into_issues()
    };
    let issues: Vec<Vec<Issue>> = if config.parallel {
        chunk.par_iter().map(check).collect()
    } else {
        chunk.iter().map(check).collect()
    };
    for issue in issues.into_iter().flatten() {
        acceptor.accept(issue);
    }
}
