//! Check report types.

use serde::Serialize;

use rf2::{Issue, Severity};

/// Result of a check run.
///
/// `ok` is `false` as soon as one error issue was reported; warnings alone
/// keep a run green.
#[derive(Debug, Clone, Serialize)]
#[non_exhaustive]
pub struct CheckReport {
    /// Number of content files whose header and rows were checked.
    pub files_checked: usize,
    /// Number of `.txt` files skipped because their name is not an RF2 content file name.
    pub files_skipped: usize,
    /// Whether no error issue was reported.
    pub ok: bool,
    /// Every issue, grouped by file and in row order within a file.
    pub issues: Vec<Issue>,
}

impl CheckReport {
    #[must_use]
    pub fn new(files_checked: usize, files_skipped: usize, issues: Vec<Issue>) -> Self {
        Self {
            files_checked,
            files_skipped,
            ok: !issues.iter().any(Issue::is_error),
            issues,
        }
    }

    /// Number of error issues.
    #[must_use]
    pub fn errors_count(&self) -> usize {
        self.count(Severity::Error)
    }

    /// Number of warning issues.
    #[must_use]
    pub fn warnings_count(&self) -> usize {
        self.count(Severity::Warn)
    }

    fn count(&self, severity: Severity) -> usize {
        self.issues.iter().filter(|i| i.severity == severity).count()
    }
}
