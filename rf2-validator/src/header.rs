//! Header contract check: a file's first line must equal its content type's
//! header, column for column.

use rf2::IssueAcceptor;

/// Outcome of [`check_header`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderCheck {
    Conforms,
    /// Row validation must be skipped: column positions cannot be trusted.
    Mismatch,
}

impl HeaderCheck {
    #[must_use]
    pub fn conforms(self) -> bool {
        self == Self::Conforms
    }
}

/// Compare `actual` against `spec` and report a single error on mismatch.
///
/// The error names the first differing position.
#[must_use]
pub fn check_header(
    actual: &[String],
    spec: &[String],
    acceptor: &dyn IssueAcceptor,
) -> HeaderCheck {
    if actual == spec {
        return HeaderCheck::Conforms;
    }
    let position = actual
        .iter()
        .zip(spec)
        .position(|(a, s)| a != s)
        .unwrap_or_else(|| actual.len().min(spec.len()));
    let found = actual.get(position).map_or("<none>", String::as_str);
    let expected = spec.get(position).map_or("<none>", String::as_str);
    acceptor.error(format!(
        "Header does not conform to specification: column {} is '{found}', expected '{expected}'",
        position + 1
    ));
    HeaderCheck::Mismatch
}
