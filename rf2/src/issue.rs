//! Issue reporting: the sink both assembly and validation report into.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde::Serialize;

/// How serious a reported issue is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warn,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warn => f.write_str("warn"),
            Self::Error => f.write_str("error"),
        }
    }
}

/// Where an issue was found. Every part is optional; the narrower scopes are
/// filled in by [`ScopedAcceptor`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IssueLocation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    /// 1-based data row number (the header is not counted).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
}

/// A single non-fatal problem found while assembling or checking a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub severity: Severity,
    pub message: String,
    #[serde(flatten)]
    pub location: IssueLocation,
}

impl Issue {
    #[must_use]
    pub fn warn(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warn,
            message: message.into(),
            location: IssueLocation::default(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            location: IssueLocation::default(),
        }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Format the issue for human-readable output.
    ///
    /// `{file}:{row}: {severity}: {message} (column {column})`, omitting the
    /// parts that are unknown.
    #[must_use]
    pub fn format_human_readable(&self) -> String {
        let mut out = String::new();
        if let Some(file) = &self.location.file {
            out.push_str(&file.display().to_string());
            if let Some(row) = self.location.row {
                out.push(':');
                out.push_str(&row.to_string());
            }
            out.push_str(": ");
        }
        out.push_str(&self.severity.to_string());
        out.push_str(": ");
        out.push_str(&self.message);
        if let Some(column) = &self.location.column {
            out.push_str(" (column ");
            out.push_str(column);
            out.push(')');
        }
        out
    }
}

/// Sink for warnings and errors. Implementations never fail and are shared
/// across the threads of a parallel scan.
pub trait IssueAcceptor: Send + Sync {
    fn accept(&self, issue: Issue);

    fn warn(&self, message: String) {
        self.accept(Issue::warn(message));
    }

    fn error(&self, message: String) {
        self.accept(Issue::error(message));
    }
}

/// Collects every accepted issue in acceptance order.
#[derive(Debug, Default)]
pub struct IssueCollector {
    issues: Mutex<Vec<Issue>>,
}

impl IssueCollector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of the issues collected so far.
    #[must_use]
    pub fn issues(&self) -> Vec<Issue> {
        self.issues
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn into_issues(self) -> Vec<Issue> {
        self.issues
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        self.issues
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|i| i.severity == severity)
            .count()
    }
}

impl IssueAcceptor for IssueCollector {
    fn accept(&self, issue: Issue) {
        self.issues
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(issue);
    }
}

/// Fills in the location parts an issue does not carry yet, then forwards it.
pub struct ScopedAcceptor<'a> {
    inner: &'a dyn IssueAcceptor,
    location: IssueLocation,
}

impl<'a> ScopedAcceptor<'a> {
    #[must_use]
    pub fn for_file(inner: &'a dyn IssueAcceptor, file: &Path) -> Self {
        Self {
            inner,
            location: IssueLocation {
                file: Some(file.to_path_buf()),
                ..IssueLocation::default()
            },
        }
    }

    #[must_use]
    pub fn with_location(inner: &'a dyn IssueAcceptor, location: IssueLocation) -> Self {
        Self { inner, location }
    }
}

impl IssueAcceptor for ScopedAcceptor<'_> {
    fn accept(&self, mut issue: Issue) {
        let location = &mut issue.location;
        if location.file.is_none() {
            location.file.clone_from(&self.location.file);
        }
        if location.row.is_none() {
            location.row = self.location.row;
        }
        if location.column.is_none() {
            location.column.clone_from(&self.location.column);
        }
        self.inner.accept(issue);
    }
}
