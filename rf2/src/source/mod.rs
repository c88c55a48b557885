//! Row sources: where the rows of a content file being created come from.
//!
//! A source delivers raw rows (already split into fields) of one content type.
//! The parallel hint asks for rows to be delivered from several threads; the
//! consumer must then serialize whatever shared state it touches.

pub mod fs;

use std::collections::HashMap;

use rayon::prelude::*;

use crate::content::ContentType;
use crate::error::Rf2Error;
use crate::format::Row;

/// Callback receiving one row at a time. Returning an error aborts the visit.
pub type RowConsumer<'a> = dyn Fn(Row) -> Result<(), Rf2Error> + Sync + 'a;

/// Supplies the rows of a given content type.
pub trait RowSource: Sync {
    /// Invoke `consumer` once per source row whose file matches `header`.
    ///
    /// With `parallel` unset, rows are delivered sequentially in source order.
    /// With it set, delivery may happen concurrently in any order.
    ///
    /// # Errors
    /// Returns the first error raised by reading the source or by `consumer`.
    fn visit_rows(
        &self,
        content_type: ContentType,
        header: &[String],
        parallel: bool,
        consumer: &RowConsumer<'_>,
    ) -> Result<(), Rf2Error>;
}

/// Rows held in memory, grouped by content type.
#[derive(Debug, Clone, Default)]
pub struct MemoryRowSource {
    rows: HashMap<ContentType, Vec<Row>>,
}

impl MemoryRowSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append rows for `content_type`, after any already present.
    #[must_use]
    pub fn with_rows<I, R, S>(mut self, content_type: ContentType, rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows
            .entry(content_type)
            .or_default()
            .extend(rows.into_iter().map(|r| r.into_iter().map(Into::into).collect()));
        self
    }
}

impl RowSource for MemoryRowSource {
    fn visit_rows(
        &self,
        content_type: ContentType,
        _header: &[String],
        parallel: bool,
        consumer: &RowConsumer<'_>,
    ) -> Result<(), Rf2Error> {
        let Some(rows) = self.rows.get(&content_type) else {
            return Ok(());
        };
        if parallel {
            rows.par_iter().try_for_each(|row| consumer(row.clone()))
        } else {
            rows.iter().try_for_each(|row| consumer(row.clone()))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_memory_source_sequential_keeps_order() {
        let source = MemoryRowSource::new().with_rows(
            ContentType::Concept,
            [["a", "1"], ["b", "2"], ["c", "3"]],
        );
        let seen = Mutex::new(Vec::new());
        source
            .visit_rows(ContentType::Concept, &[], false, &|row| {
                seen.lock().unwrap().push(row[0].clone());
                Ok(())
            })
            .unwrap();
        assert_eq!(seen.into_inner().unwrap(), ["a", "b", "c"]);
    }

    #[test]
    fn test_memory_source_parallel_delivers_every_row() {
        let rows: Vec<Vec<String>> = (0..1000).map(|i| vec![i.to_string()]).collect();
        let source = MemoryRowSource::new().with_rows(ContentType::Concept, rows);
        let count = AtomicUsize::new(0);
        let result = source.visit_rows(ContentType::Concept, &[], true, &|_| {
            count.fetch_add(1, Ordering::Relaxed);
            Ok(())
        });
        assert!(result.is_ok());
        assert_eq!(count.into_inner(), 1000);
    }

    #[test]
    fn test_memory_source_other_type_is_empty() {
        let source = MemoryRowSource::new().with_rows(ContentType::Concept, [["a"]]);
        let result = source.visit_rows(ContentType::Description, &[], false, &|_| {
            Err(Rf2Error::UnknownContentType("unexpected".to_owned()))
        });
        assert!(result.is_ok());
    }

    #[test]
    fn test_consumer_error_aborts_visit() {
        let source = MemoryRowSource::new().with_rows(ContentType::Concept, [["a"], ["b"]]);
        let result = source.visit_rows(ContentType::Concept, &[], false, &|_| {
            Err(Rf2Error::UnknownContentType("stop".to_owned()))
        });
        assert!(matches!(result, Err(Rf2Error::UnknownContentType(ref s)) if s == "stop"));
    }
}
