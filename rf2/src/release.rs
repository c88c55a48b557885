//! Release types and the reconciliation policy each one selects.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::Rf2Error;

/// The release policy of an output content file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ReleaseType {
    /// Every historical version of every component.
    Full,
    /// The current version of every component.
    Snapshot,
    /// Only the versions that became effective on the release date.
    Delta,
}

impl ReleaseType {
    /// All release types, in file naming order.
    pub const ALL: [Self; 3] = [Self::Full, Self::Snapshot, Self::Delta];

    #[must_use]
    pub fn is_full(self) -> bool {
        self == Self::Full
    }

    #[must_use]
    pub fn is_snapshot(self) -> bool {
        self == Self::Snapshot
    }

    #[must_use]
    pub fn is_delta(self) -> bool {
        self == Self::Delta
    }

    /// The token used for this release type in RF2 file names.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Full => "Full",
            Self::Snapshot => "Snapshot",
            Self::Delta => "Delta",
        }
    }
}

impl fmt::Display for ReleaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReleaseType {
    type Err = Rf2Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| Rf2Error::UnknownReleaseType(s.to_owned()))
    }
}
