//! Release merge engine.
//!
//! Reconciles the rows of one or more source files into the rows of a single
//! output file under the [`ReleaseType`] policy:
//!
//! - `Full` keeps every distinct `(id, effectiveTime)` version, in source order.
//! - `Snapshot` keeps one version per `id`, the one with the greatest effective
//!   time (an empty effective time beats every published one). Winners are
//!   chosen in a first pass and written in a second pass over the source.
//! - `Delta` keeps the versions whose effective time is the release date.
//!
//! Under every policy the first occurrence of an `(id, effectiveTime)` key wins;
//! later occurrences are dropped and, if their content differs, reported as a
//! warning.
//!
//! Rows may be delivered from several threads. Parsing, serialization and
//! fingerprinting happen on the delivering thread; the registry transition and
//! the write of an accepted row happen under a single lock, so two rows with
//! the same key can never both be taken as the first occurrence.
//!
//! Only the Snapshot winner election runs on parallel delivery. Its keys are
//! registered during the sequential second pass, so "first occurrence" means
//! first in source order under every policy.

use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use tracing::debug;

use crate::content::ContentType;
use crate::error::Rf2Error;
use crate::fingerprint::Fingerprint;
use crate::format::{Row, new_line};
use crate::issue::IssueAcceptor;
use crate::release::ReleaseType;
use crate::source::RowSource;

/// Type specific predicate deciding whether a source row belongs in the output.
pub type RowFilter = dyn Fn(&[String]) -> bool + Sync;

/// Outcome of registering an `(id, effectiveTime)` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// First occurrence of the key.
    New,
    /// The key was seen before with identical content.
    Duplicate,
    /// The key was seen before with different content.
    Conflict,
}

/// Transient map from identifier to the versions seen for it, scoped to one
/// merge operation.
#[derive(Debug, Default)]
pub struct IdentityRegistry {
    versions: HashMap<String, HashMap<String, Fingerprint>>,
    // Snapshot only: the effective time currently winning for each id.
    winners: HashMap<String, String>,
}

impl IdentityRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the fingerprint of `(id, time)` unless the key is already known.
    pub fn register(&mut self, id: &str, time: &str, fingerprint: Fingerprint) -> Registration {
        let times = self.versions.entry(id.to_owned()).or_default();
        match times.get(time) {
            Some(existing) if *existing == fingerprint => Registration::Duplicate,
            Some(_) => Registration::Conflict,
            None => {
                times.insert(time.to_owned(), fingerprint);
                Registration::New
            }
        }
    }

    /// Offer `time` as the snapshot version of `id`. Returns whether it became
    /// the current winner.
    pub fn offer(&mut self, id: &str, time: &str) -> bool {
        let Some(current) = self.winners.get_mut(id) else {
            self.winners.insert(id.to_owned(), time.to_owned());
            return true;
        };
        if supersedes(time, current) {
            time.clone_into(current);
            true
        } else {
            false
        }
    }

    /// If `(id, time)` is the live snapshot winner, retire it and return `true`.
    ///
    /// Each winner is taken at most once, so an identifier contributes at most
    /// one row even when its winning line occurs several times in the source.
    pub fn take_winner(&mut self, id: &str, time: &str) -> bool {
        if self.winners.get(id).is_some_and(|winner| winner == time) {
            self.winners.remove(id);
            true
        } else {
            false
        }
    }

    /// Number of live snapshot winners.
    #[must_use]
    pub fn winner_count(&self) -> usize {
        self.winners.len()
    }

    /// Number of distinct identifiers registered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.versions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }
}

/// Whether a version effective at `incoming` replaces one effective at `current`.
///
/// An empty effective time marks an unpublished, hence newest, version.
fn supersedes(incoming: &str, current: &str) -> bool {
    if current.is_empty() {
        return false;
    }
    incoming.is_empty() || incoming > current
}

fn key(row: &[String]) -> (&str, &str) {
    (
        row.first().map_or("", String::as_str),
        row.get(1).map_or("", String::as_str),
    )
}

/// Destination of the rows a merge accepts, in output order.
pub trait RowSink: Send {
    /// Append one accepted row. `line` is its serialized form.
    ///
    /// # Errors
    /// Returns an error if the row cannot be written.
    fn emit(&mut self, row: Row, line: &str) -> Result<(), Rf2Error>;
}

impl RowSink for Vec<Row> {
    fn emit(&mut self, row: Row, _line: &str) -> Result<(), Rf2Error> {
        self.push(row);
        Ok(())
    }
}

/// Writes accepted rows as lines to `writer`, attributing failures to `path`.
pub struct LineSink<W> {
    path: PathBuf,
    writer: W,
}

impl<W: Write + Send> LineSink<W> {
    pub fn new(path: impl Into<PathBuf>, writer: W) -> Self {
        Self {
            path: path.into(),
            writer,
        }
    }

    /// Write a line that is not a row, such as the header.
    ///
    /// # Errors
    /// Returns an error if writing fails.
    pub fn write_line(&mut self, line: &str) -> Result<(), Rf2Error> {
        self.writer
            .write_all(line.as_bytes())
            .map_err(|e| Rf2Error::io(&self.path, e))
    }

    /// Flush and return the underlying writer.
    ///
    /// # Errors
    /// Returns an error if flushing fails.
    pub fn finish(mut self) -> Result<W, Rf2Error> {
        self.writer
            .flush()
            .map_err(|e| Rf2Error::io(&self.path, e))?;
        Ok(self.writer)
    }
}

impl<W: Write + Send> RowSink for LineSink<W> {
    fn emit(&mut self, _row: Row, line: &str) -> Result<(), Rf2Error> {
        self.write_line(line)
    }
}

/// What to merge: the output's schema and policy.
#[derive(Clone, Copy)]
pub struct MergeRequest<'a> {
    pub content_type: ContentType,
    pub header: &'a [String],
    pub release_type: ReleaseType,
    /// Effective time selected by the `Delta` policy.
    pub release_date: &'a str,
    pub filter: &'a RowFilter,
}

/// Counters of a finished merge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeSummary {
    pub rows_written: usize,
    /// Rows dropped by the content type filter.
    pub filtered: usize,
    /// Rows dropped as verbatim repeats of an earlier key.
    pub duplicates: usize,
    /// Rows dropped as repeats of an earlier key with different content.
    pub conflicts: usize,
}

struct MergeState<'s> {
    registry: IdentityRegistry,
    sink: &'s mut dyn RowSink,
    summary: MergeSummary,
}

impl MergeState<'_> {
    /// Register `(id, time)`; `true` if this is its first occurrence.
    fn admit(
        &mut self,
        id: &str,
        time: &str,
        fingerprint: Fingerprint,
        acceptor: &dyn IssueAcceptor,
    ) -> bool {
        match self.registry.register(id, time, fingerprint) {
            Registration::New => true,
            Registration::Duplicate => {
                self.summary.duplicates += 1;
                false
            }
            Registration::Conflict => {
                self.summary.conflicts += 1;
                acceptor.warn(format!(
                    "Skipping duplicate row with id '{id}' and effectiveTime '{time}': \
                     column values differ from the first occurrence, which is kept"
                ));
                false
            }
        }
    }

    fn emit(&mut self, row: Row, line: &str) -> Result<(), Rf2Error> {
        self.sink.emit(row, line)?;
        self.summary.rows_written += 1;
        Ok(())
    }
}

/// Run the merge policy of `request` over `source`, sending accepted rows to `sink`.
///
/// Content conflicts are reported to `acceptor` as warnings and never abort.
///
/// # Errors
/// Returns the first I/O error from reading `source` or writing to `sink`.
pub fn merge(
    request: &MergeRequest<'_>,
    source: &dyn RowSource,
    acceptor: &dyn IssueAcceptor,
    sink: &mut dyn RowSink,
) -> Result<MergeSummary, Rf2Error> {
    let release_type = request.release_type;
    let filtered = AtomicUsize::new(0);
    let state = Mutex::new(MergeState {
        registry: IdentityRegistry::new(),
        sink,
        summary: MergeSummary::default(),
    });

    source.visit_rows(
        request.content_type,
        request.header,
        release_type.is_snapshot(),
        &|row| {
            if !(request.filter)(&row) {
                filtered.fetch_add(1, Ordering::Relaxed);
                return Ok(());
            }
            let (id, time) = key(&row);
            if release_type.is_delta() && time != request.release_date {
                return Ok(());
            }
            if release_type.is_snapshot() {
                state
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .registry
                    .offer(id, time);
                return Ok(());
            }
            let line = new_line(&row);
            let fingerprint = Fingerprint::of_line(&line);

            let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);
            if state.admit(id, time, fingerprint, acceptor) {
                state.emit(row, &line)
            } else {
                Ok(())
            }
        },
    )?;

    if release_type.is_snapshot() {
        debug!(
            "Snapshot of {} selected {} versions, writing",
            request.content_type,
            state
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .registry
                .winner_count()
        );
        source.visit_rows(request.content_type, request.header, false, &|row| {
            if !(request.filter)(&row) {
                return Ok(());
            }
            let (id, time) = key(&row);
            let line = new_line(&row);
            let fingerprint = Fingerprint::of_line(&line);

            let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);
            if state.admit(id, time, fingerprint, acceptor) && state.registry.take_winner(id, time)
            {
                state.emit(row, &line)
            } else {
                Ok(())
            }
        })?;
    }

    let mut summary = state
        .into_inner()
        .unwrap_or_else(PoisonError::into_inner)
        .summary;
    summary.filtered = filtered.into_inner();
    Ok(summary)
}

/// Run the merge policy of `request` over `source` and return the resulting rows.
///
/// # Errors
/// Returns the first I/O error from reading `source`.
pub fn assemble(
    request: &MergeRequest<'_>,
    source: &dyn RowSource,
    acceptor: &dyn IssueAcceptor,
) -> Result<Vec<Row>, Rf2Error> {
    let mut rows = Vec::new();
    merge(request, source, acceptor, &mut rows)?;
    Ok(rows)
}
