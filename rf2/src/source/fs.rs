//! Filesystem row source and release file discovery.
//!
//! Source files are matched to a requested content type by their header: every
//! discovered `.txt` file whose first line equals the requested header
//! contributes its rows. Inferred and stated relationship files share a header,
//! as do description and text definition files; their rows are told apart
//! later by the content type's row filter.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use glob::Pattern;
use rayon::prelude::*;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::FsSourceConfig;
use crate::content::ContentType;
use crate::error::Rf2Error;
use crate::format::split_line;
use crate::source::{RowConsumer, RowSource};

/// Directories to skip
pub const SKIP_DIRS: &[&str] = &["target", ".git", "__MACOSX"];

/// Check if a path matches any of the exclude patterns
fn matches_exclude(path: &Path, exclude_patterns: &[Pattern]) -> bool {
    let path_str = path.to_string_lossy();
    exclude_patterns.iter().any(|pattern| {
        pattern.matches(&path_str)
            || path
                .file_name()
                .is_some_and(|name| pattern.matches(&name.to_string_lossy()))
    })
}

/// Returns `true` if the entry should be **included** (i.e., is NOT a skip dir).
fn is_not_skip_dir(entry: &walkdir::DirEntry) -> bool {
    if entry.file_type().is_dir()
        && entry.depth() > 0
        && let Some(name) = entry.file_name().to_str()
    {
        return !SKIP_DIRS.contains(&name);
    }
    true
}

fn is_release_file(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("txt")
}

/// Find all `.txt` release files under the configured paths, sorted.
///
/// # Errors
/// Returns an error if a path does not exist, an exclude pattern is invalid,
/// or a directory cannot be traversed.
pub fn find_release_files(config: &FsSourceConfig) -> Result<Vec<PathBuf>, Rf2Error> {
    let exclude_patterns = config
        .exclude
        .iter()
        .map(|pat| {
            Pattern::new(pat).map_err(|e| Rf2Error::InvalidExcludePattern {
                pattern: pat.clone(),
                cause: e.to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut files = Vec::new();
    for root in &config.paths {
        if !root.exists() {
            return Err(Rf2Error::MissingPath(root.clone()));
        }
        if root.is_file() {
            if is_release_file(root) && !matches_exclude(root, &exclude_patterns) {
                files.push(root.clone());
            }
            continue;
        }

        for entry in WalkDir::new(root)
            .follow_links(config.follow_links)
            .max_depth(config.max_depth)
            .into_iter()
            .filter_entry(is_not_skip_dir)
        {
            let entry = entry.map_err(|walk_err| {
                let path = walk_err
                    .path()
                    .map_or_else(|| root.clone(), Path::to_path_buf);
                Rf2Error::io(path, walk_err.into())
            })?;
            let path = entry.path();
            if entry.file_type().is_file()
                && is_release_file(path)
                && !matches_exclude(path, &exclude_patterns)
            {
                files.push(path.to_path_buf());
            }
        }
    }

    files.sort();
    files.dedup();
    Ok(files)
}

/// Reads the header of a release file: its first line split by TAB.
///
/// An empty file yields an empty header.
///
/// # Errors
/// Returns an error if the file cannot be opened or read.
pub fn read_header(path: &Path) -> Result<Vec<String>, Rf2Error> {
    let file = File::open(path).map_err(|e| Rf2Error::io(path, e))?;
    let mut first = String::new();
    BufReader::new(file)
        .read_line(&mut first)
        .map_err(|e| Rf2Error::io(path, e))?;
    if first.is_empty() {
        return Ok(Vec::new());
    }
    Ok(split_line(&first))
}

/// Rows from release files on disk.
#[derive(Debug, Clone, Default)]
pub struct FsRowSource {
    files: Vec<PathBuf>,
}

impl FsRowSource {
    /// A source reading exactly the given files, in the given order.
    #[must_use]
    pub fn new(files: Vec<PathBuf>) -> Self {
        Self { files }
    }

    /// A source reading every release file discovered under `config`.
    ///
    /// # Errors
    /// See [`find_release_files`].
    pub fn discover(config: &FsSourceConfig) -> Result<Self, Rf2Error> {
        Ok(Self::new(find_release_files(config)?))
    }

    #[must_use]
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    fn visit_file(
        path: &Path,
        arity: usize,
        parallel: bool,
        consumer: &RowConsumer<'_>,
    ) -> Result<(), Rf2Error> {
        let file = File::open(path).map_err(|e| Rf2Error::io(path, e))?;
        let mut lines = BufReader::new(file).lines().enumerate().skip(1);

        let accept = |index: usize, line: &str| -> Result<(), Rf2Error> {
            let row = split_line(line);
            if row.len() == arity {
                consumer(row)
            } else {
                warn!(
                    "Skipping line {} of '{}': {} columns, expected {arity}",
                    index + 1,
                    path.display(),
                    row.len()
                );
                Ok(())
            }
        };

        if parallel {
            let lines = lines
                .map(|(i, line)| line.map(|l| (i, l)))
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| Rf2Error::io(path, e))?;
            lines
                .par_iter()
                .try_for_each(|(index, line)| accept(*index, line.as_str()))
        } else {
            lines.try_for_each(|(index, line)| {
                let line = line.map_err(|e| Rf2Error::io(path, e))?;
                accept(index, line.as_str())
            })
        }
    }
}

impl RowSource for FsRowSource {
    fn visit_rows(
        &self,
        content_type: ContentType,
        header: &[String],
        parallel: bool,
        consumer: &RowConsumer<'_>,
    ) -> Result<(), Rf2Error> {
        for path in &self.files {
            if read_header(path)? != header {
                debug!(
                    "Skipping '{}': header does not match {content_type}",
                    path.display()
                );
                continue;
            }
            debug!("Reading {content_type} rows from '{}'", path.display());
            Self::visit_file(path, header.len(), parallel, consumer)?;
        }
        Ok(())
    }
}
