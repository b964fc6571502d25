//! Error types shared across kigrep-core.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Which index table a query ran against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Parts,
    Footprints,
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableKind::Parts => f.write_str("part"),
            TableKind::Footprints => f.write_str("footprint"),
        }
    }
}

/// A source file's text does not match the grammar for its kind.
///
/// `line` is 1-based and refers to the physical file; normalization keeps
/// blanked lines in place so the number stays accurate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {message}")]
pub struct GrammarError {
    pub line: usize,
    pub message: String,
}

impl GrammarError {
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    /// One source file failed to parse. Caught at the index builder and
    /// never propagated past that file's indexing attempt.
    #[error("{}: {source}", file.display())]
    Parse {
        file: PathBuf,
        #[source]
        source: GrammarError,
    },

    /// One source file could not be read. Handled like a parse failure.
    #[error("{}: {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A persisted index table is missing at load time. Fatal: queries
    /// cannot run without an index.
    #[error("index table not found at {}", path.display())]
    IndexNotFound { path: PathBuf },

    /// A persisted index table exists but cannot be read or written.
    #[error("index table {}: {message}", path.display())]
    Table { path: PathBuf, message: String },

    /// The query name does not compile as a regular expression.
    #[error("invalid name pattern {pattern:?}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A single-result query matched nothing. The `*_all` variants return
    /// an empty set instead of this.
    #[error("no {table} with count {count} matches name pattern {pattern:?}")]
    NoMatch {
        table: TableKind,
        count: u32,
        pattern: String,
    },

    #[error("walking directory tree failed: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serializing results failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("building worker pool failed: {0}")]
    Threads(#[from] rayon::ThreadPoolBuildError),
}
