//! Configuration types for RF2 validation.
//!
//! Where files are discovered is described by [`rf2::FsSourceConfig`]; this
//! module only holds what applies to the content of every file.

/// Core validation config, applies regardless of how files were found.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct ValidationConfig {
    /// Accept an empty `effectiveTime` (unpublished content). Default: `true`.
    pub allow_unpublished: bool,
    /// Validate the rows of a file on the rayon thread pool. Default: `true`.
    ///
    /// Issues are reported in row order either way.
    pub parallel: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            allow_unpublished: true,
            parallel: true,
        }
    }
}
