//! Error types for RF2 file assembly.

use std::path::PathBuf;

use rf2_id::Rf2IdError;
use thiserror::Error;

/// Fatal failures of an RF2 operation.
///
/// Content problems (bad cells, conflicting duplicates) are never represented
/// here; they are reported through an [`IssueAcceptor`](crate::IssueAcceptor).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Rf2Error {
    /// Reading a source or writing the destination failed.
    #[error("I/O error on '{}': {source}", .path.display())]
    Io {
        /// The file being read or written.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The destination of a create operation is already present on disk.
    #[error("Output file '{}' already exists", .0.display())]
    DestinationExists(PathBuf),

    /// A release type name is not one of `Full`, `Snapshot`, `Delta`.
    #[error("Unknown release type '{0}'")]
    UnknownReleaseType(String),

    /// A content type name is not one of the supported RF2 content types.
    #[error("Unknown content type '{0}'")]
    UnknownContentType(String),

    /// The release date handed to a create operation is not a valid effective time.
    #[error("Invalid release date: {0}")]
    InvalidReleaseDate(#[from] Rf2IdError),

    /// An exclude glob pattern could not be parsed.
    #[error("Invalid exclude glob pattern '{pattern}': {cause}")]
    InvalidExcludePattern {
        /// The raw pattern.
        pattern: String,
        /// Human-readable description of the problem.
        cause: String,
    },

    /// A scan root does not exist.
    #[error("Path does not exist: {}", .0.display())]
    MissingPath(PathBuf),
}

impl Rf2Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
