//! Library file discovery for kigrep-core.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{Error, Result};

/// What a discovered file claims to be, keyed by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Legacy schematic symbol library (`.lib`).
    SymbolLib,
    /// Footprint module (`.kicad_mod`).
    FootprintMod,
}

/// Path to a candidate library source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRef {
    pub path: PathBuf,
    pub kind: SourceKind,
}

/// Trait for enumerating library sources from some backing store
/// (filesystem, a fixed fixture list, etc.).
pub trait SourceDiscovery {
    fn discover(&self) -> Result<Vec<SourceRef>>;
}

/// Recursive filesystem walker that collects indexable library files.
#[derive(Debug, Clone)]
pub struct PathDiscovery {
    roots: Vec<PathBuf>,
    follow_symlinks: bool,
}

impl PathDiscovery {
    pub fn new<I, P>(roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let roots = roots.into_iter().map(Into::into).collect();
        Self {
            roots,
            follow_symlinks: false,
        }
    }

    pub fn follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }
}

impl SourceDiscovery for PathDiscovery {
    fn discover(&self) -> Result<Vec<SourceRef>> {
        let mut found = Vec::new();

        for root in &self.roots {
            if !root.exists() {
                return Err(Error::File {
                    path: root.clone(),
                    source: std::io::Error::new(
                        std::io::ErrorKind::NotFound,
                        "root path does not exist",
                    ),
                });
            }

            for entry in WalkDir::new(root).follow_links(self.follow_symlinks) {
                let entry = entry?;
                if !entry.file_type().is_file() {
                    continue;
                }
                if let Some(kind) = classify(entry.path()) {
                    found.push(SourceRef {
                        path: entry.path().to_path_buf(),
                        kind,
                    });
                }
            }
        }

        // Sorted so table insertion order is stable across runs over the
        // same tree.
        found.sort_by(|a, b| a.path.cmp(&b.path));

        Ok(found)
    }
}

fn classify(path: &Path) -> Option<SourceKind> {
    let ext = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => ext.to_ascii_lowercase(),
        None => return None,
    };

    match ext.as_str() {
        "lib" => Some(SourceKind::SymbolLib),
        "kicad_mod" => Some(SourceKind::FootprintMod),
        _ => None,
    }
}
