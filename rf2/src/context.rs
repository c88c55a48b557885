//! Everything a content file needs to create itself.

use crate::error::Rf2Error;
use crate::issue::IssueAcceptor;
use crate::source::RowSource;

/// Release date, row source and issue sink of a create operation.
#[derive(Clone, Copy)]
pub struct CreateContext<'a> {
    release_date: &'a str,
    source: &'a dyn RowSource,
    acceptor: &'a dyn IssueAcceptor,
}

impl<'a> CreateContext<'a> {
    /// # Errors
    /// Returns [`Rf2Error::InvalidReleaseDate`] unless `release_date` is a
    /// calendar date in `YYYYMMDD` form.
    pub fn new(
        release_date: &'a str,
        source: &'a dyn RowSource,
        acceptor: &'a dyn IssueAcceptor,
    ) -> Result<Self, Rf2Error> {
        rf2_id::validate_effective_time(release_date, false)?;
        Ok(Self {
            release_date,
            source,
            acceptor,
        })
    }

    #[must_use]
    pub fn release_date(&self) -> &'a str {
        self.release_date
    }

    #[must_use]
    pub fn source(&self) -> &'a dyn RowSource {
        self.source
    }

    #[must_use]
    pub fn acceptor(&self) -> &'a dyn IssueAcceptor {
        self.acceptor
    }
}
