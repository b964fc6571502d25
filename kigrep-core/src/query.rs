//! Count + name queries over the loaded index tables.

use std::path::Path;

use regex::{Regex, RegexBuilder};

use crate::error::{Error, Result, TableKind};
use crate::index::IndexTables;
use crate::records::{FootprintRecord, PartRecord};

/// First part hit: the library (file extension stripped) and the matched
/// part name, which is all a circuit generator needs to instantiate it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartHit {
    pub location: String,
    pub part_name: String,
}

/// First footprint hit: the footprint library directory and module name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FootprintHit {
    pub location: String,
    pub name: String,
}

/// Read-only snapshot of the two tables. Picking up a rebuilt index means
/// constructing a fresh `SearchIndex`.
#[derive(Debug, Clone)]
pub struct SearchIndex {
    tables: IndexTables,
}

impl SearchIndex {
    /// Load the persisted tables from `dir`.
    pub fn load(dir: &Path) -> Result<Self> {
        Ok(Self {
            tables: IndexTables::load(dir)?,
        })
    }

    /// Wrap freshly built tables without touching the filesystem.
    pub fn from_tables(tables: IndexTables) -> Self {
        Self { tables }
    }

    pub fn parts(&self) -> &[PartRecord] {
        &self.tables.parts
    }

    pub fn footprints(&self) -> &[FootprintRecord] {
        &self.tables.footprints
    }

    /// First part whose pin count matches exactly and whose name matches
    /// the case-insensitive pattern, in table insertion order. The
    /// returned location has its file extension stripped.
    ///
    /// # Panics
    ///
    /// Panics if `name` is empty.
    pub fn query_part(&self, pin_count: u32, name: &str) -> Result<PartHit> {
        let matcher = name_matcher(name)?;
        self.tables
            .parts
            .iter()
            .filter(|row| row.pin_count == pin_count)
            .find(|row| matcher.is_match(&row.part_name))
            .map(|row| PartHit {
                location: strip_extension(&row.location),
                part_name: row.part_name.clone(),
            })
            .ok_or_else(|| no_match(TableKind::Parts, pin_count, name))
    }

    /// Every part row surviving both filters; an empty set is not an
    /// error.
    ///
    /// # Panics
    ///
    /// Panics if `name` is empty.
    pub fn query_part_all(&self, pin_count: u32, name: &str) -> Result<Vec<PartRecord>> {
        let matcher = name_matcher(name)?;
        Ok(self
            .tables
            .parts
            .iter()
            .filter(|row| row.pin_count == pin_count)
            .filter(|row| matcher.is_match(&row.part_name))
            .cloned()
            .collect())
    }

    /// First footprint whose pad count and name both match. The location
    /// comes back as stored: the footprint library directory name.
    ///
    /// # Panics
    ///
    /// Panics if `name` is empty.
    pub fn query_footprint(&self, pad_count: u32, name: &str) -> Result<FootprintHit> {
        let matcher = name_matcher(name)?;
        self.tables
            .footprints
            .iter()
            .filter(|row| row.pad_count == pad_count)
            .find(|row| matcher.is_match(&row.name))
            .map(|row| FootprintHit {
                location: row.location.clone(),
                name: row.name.clone(),
            })
            .ok_or_else(|| no_match(TableKind::Footprints, pad_count, name))
    }

    /// Every footprint row surviving both filters. `by_pad_count_first`
    /// picks which filter runs first; both predicates are independent,
    /// so the choice affects scan cost only, never the rows returned.
    ///
    /// # Panics
    ///
    /// Panics if `name` is empty.
    pub fn query_footprint_all(
        &self,
        pad_count: u32,
        name: &str,
        by_pad_count_first: bool,
    ) -> Result<Vec<FootprintRecord>> {
        let matcher = name_matcher(name)?;
        let rows = self.tables.footprints.iter();
        let filtered = if by_pad_count_first {
            rows.filter(|row| row.pad_count == pad_count)
                .filter(|row| matcher.is_match(&row.name))
                .cloned()
                .collect()
        } else {
            rows.filter(|row| matcher.is_match(&row.name))
                .filter(|row| row.pad_count == pad_count)
                .cloned()
                .collect()
        };
        Ok(filtered)
    }
}

/// Compile the caller's name into the match regex: upper-cased, then
/// case-insensitive, so partial names and regex fragments both work.
fn name_matcher(name: &str) -> Result<Regex> {
    assert!(!name.is_empty(), "name pattern must not be empty");
    RegexBuilder::new(&name.to_uppercase())
        .case_insensitive(true)
        .build()
        .map_err(|source| Error::Pattern {
            pattern: name.to_string(),
            source,
        })
}

fn no_match(table: TableKind, count: u32, pattern: &str) -> Error {
    Error::NoMatch {
        table,
        count,
        pattern: pattern.to_string(),
    }
}

/// `regul.lib` becomes `regul`; a location without an extension passes
/// through unchanged.
fn strip_extension(location: &str) -> String {
    Path::new(location).with_extension("").display().to_string()
}
