//! SNOMED CT RF2 release files: content types, the line format, and assembly
//! of Full, Snapshot and Delta content files from source rows.

pub mod config;
pub mod content;
pub mod context;
pub mod error;
pub mod file;
pub mod fingerprint;
pub mod format;
pub mod issue;
pub mod merge;
pub mod release;
pub mod source;

// Re-export commonly used types
pub use config::FsSourceConfig;
pub use content::{ContentType, IdentifierScheme};
pub use context::CreateContext;
pub use error::Rf2Error;
pub use file::ContentFile;
pub use fingerprint::Fingerprint;
pub use format::{CRLF, Row, TAB, new_line, split_line};
pub use issue::{Issue, IssueAcceptor, IssueCollector, IssueLocation, ScopedAcceptor, Severity};
pub use merge::{
    IdentityRegistry, LineSink, MergeRequest, MergeSummary, Registration, RowFilter, RowSink,
    assemble, merge,
};
pub use release::ReleaseType;
pub use source::fs::{FsRowSource, find_release_files, read_header};
pub use source::{MemoryRowSource, RowConsumer, RowSource};
