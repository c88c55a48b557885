//! Shared output formatting for check reports.
//!
//! JSON and plain-text writers for [`CheckReport`].

use std::collections::HashMap;
use std::io::Write;
use std::path::Path;

use rf2::Issue;

use crate::report::CheckReport;

/// Format a `CheckReport` as JSON to a writer.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_json(report: &CheckReport, writer: &mut dyn Write) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    writeln!(writer, "{json}")?;
    Ok(())
}

/// Write a `CheckReport` as plain text, issues grouped by file.
///
/// Files are listed in the order their first issue was reported. Issues not
/// tied to a file come last.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_human(report: &CheckReport, writer: &mut dyn Write) -> anyhow::Result<()> {
    writeln!(
        writer,
        "RF2 check: {} file(s) checked, {} skipped, {} error(s), {} warning(s)",
        report.files_checked,
        report.files_skipped,
        report.errors_count(),
        report.warnings_count()
    )?;

    for (file, issues) in group_by_file(&report.issues) {
        writeln!(writer)?;
        match file {
            Some(path) => writeln!(writer, "{}", path.display())?,
            None => writeln!(writer, "(general)")?,
        }
        for issue in issues {
            writeln!(writer, "  {}", describe(issue))?;
        }
    }

    writeln!(writer)?;
    if report.ok {
        writeln!(writer, "OK: all {} file(s) passed", report.files_checked)?;
    } else {
        writeln!(
            writer,
            "FAILED: {} error(s) in {} checked file(s)",
            report.errors_count(),
            report.files_checked
        )?;
    }
    Ok(())
}

fn group_by_file(issues: &[Issue]) -> Vec<(Option<&Path>, Vec<&Issue>)> {
    let mut groups: Vec<(Option<&Path>, Vec<&Issue>)> = Vec::new();
    let mut index: HashMap<Option<&Path>, usize> = HashMap::new();
    for issue in issues {
        let file = issue.location.file.as_deref();
        let slot = *index.entry(file).or_insert_with(|| {
            groups.push((file, Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(issue);
    }
    groups.sort_by_key(|(file, _)| file.is_none());
    groups
}

/// `row 3, column id: error: message`, leaving out unknown parts.
fn describe(issue: &Issue) -> String {
    let mut place = Vec::new();
    if let Some(row) = issue.location.row {
        place.push(format!("row {row}"));
    }
    if let Some(column) = &issue.location.column {
        place.push(format!("column {column}"));
    }
    if place.is_empty() {
        format!("{}: {}", issue.severity, issue.message)
    } else {
        format!("{}: {}: {}", place.join(", "), issue.severity, issue.message)
    }
}
