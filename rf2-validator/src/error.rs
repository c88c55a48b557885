//! Error types for RF2 validation.

use thiserror::Error;

/// A defect in the set of column validators, detected before any file is read.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum CatalogueError {
    /// Two validators claim the same column header.
    #[error("Column '{column}' is claimed by both the {first} and the {second} validator")]
    DuplicateColumn {
        column: String,
        first: &'static str,
        second: &'static str,
    },
}
