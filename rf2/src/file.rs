//! Content files: one RF2 file of a given content type and release type.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, ErrorKind};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::content::ContentType;
use crate::context::CreateContext;
use crate::error::Rf2Error;
use crate::format::{Row, new_line, split_line};
use crate::merge::{LineSink, MergeRequest, MergeSummary, merge};
use crate::release::ReleaseType;
use crate::source::fs::read_header;

/// A content file on disk, existing or about to be created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentFile {
    path: PathBuf,
    content_type: ContentType,
    release_type: ReleaseType,
}

impl ContentFile {
    #[must_use]
    pub fn new(
        path: impl Into<PathBuf>,
        content_type: ContentType,
        release_type: ReleaseType,
    ) -> Self {
        Self {
            path: path.into(),
            content_type,
            release_type,
        }
    }

    /// Infer content and release type from a standard RF2 file name.
    #[must_use]
    pub fn from_path(path: impl Into<PathBuf>) -> Option<Self> {
        let path = path.into();
        let (content_type, release_type) =
            ContentType::from_file_name(path.file_name()?.to_str()?)?;
        Some(Self::new(path, content_type, release_type))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn content_type(&self) -> ContentType {
        self.content_type
    }

    #[must_use]
    pub fn release_type(&self) -> ReleaseType {
        self.release_type
    }

    /// The header mandated for this file's content type.
    #[must_use]
    pub fn header_spec(&self) -> Vec<String> {
        self.content_type.header()
    }

    /// The file's actual first line if the file exists, else the mandated header.
    ///
    /// # Errors
    /// Returns an error if an existing file cannot be read.
    pub fn header(&self) -> Result<Vec<String>, Rf2Error> {
        if self.path.exists() {
            read_header(&self.path)
        } else {
            Ok(self.header_spec())
        }
    }

    /// Stream the data rows of an existing file, skipping the header.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened. Read failures of
    /// individual lines surface as `Err` items.
    pub fn rows(&self) -> Result<impl Iterator<Item = Result<Row, Rf2Error>> + '_, Rf2Error> {
        let file = File::open(&self.path).map_err(|e| Rf2Error::io(&self.path, e))?;
        Ok(BufReader::new(file).lines().skip(1).map(|line| {
            line.map(|l| split_line(&l))
                .map_err(|e| Rf2Error::io(&self.path, e))
        }))
    }

    /// Create this file from the rows of `context`'s source.
    ///
    /// Writes the mandated header followed by the rows selected by this file's
    /// release type, as TAB separated CRLF terminated lines.
    ///
    /// # Errors
    /// Returns [`Rf2Error::DestinationExists`] if the path is already taken,
    /// or an I/O error from reading the source or writing the file.
    pub fn create(&self, context: &CreateContext<'_>) -> Result<MergeSummary, Rf2Error> {
        info!(
            "Creating '{}' ({} {})...",
            self.path.display(),
            self.content_type,
            self.release_type
        );
        let header = self.header_spec();
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
            .map_err(|e| {
                if e.kind() == ErrorKind::AlreadyExists {
                    Rf2Error::DestinationExists(self.path.clone())
                } else {
                    Rf2Error::io(&self.path, e)
                }
            })?;

        let mut sink = LineSink::new(&self.path, BufWriter::new(file));
        sink.write_line(&new_line(&header))?;

        let content_type = self.content_type;
        let filter = move |row: &[String]| content_type.filter(row);
        let request = MergeRequest {
            content_type,
            header: &header,
            release_type: self.release_type,
            release_date: context.release_date(),
            filter: &filter,
        };
        let summary = merge(&request, context.source(), context.acceptor(), &mut sink)?;
        sink.finish()?;

        info!(
            "Created '{}': {} rows written, {} conflicting duplicates skipped",
            self.path.display(),
            summary.rows_written,
            summary.conflicts
        );
        Ok(summary)
    }
}
