//! Index build pipeline and CSV persistence.
//!
//! A build run discovers every library file under the given roots, parses
//! them in parallel, and merges the resulting rows in discovery order, so
//! a build over an unchanged tree reproduces the same tables row for row.
//! Files that fail to read or parse are logged, recorded in the report
//! and skipped; one broken file never aborts a bulk run. The persisted
//! form is two CSV tables whose column names downstream tools rely on.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use rayon::ThreadPoolBuilder;

use crate::discovery::{PathDiscovery, SourceDiscovery, SourceKind, SourceRef};
use crate::error::{Error, Result};
use crate::footprints;
use crate::records::{footprint_row, part_rows, FootprintRecord, PartRecord};
use crate::symbols;

/// File name of the persisted part table inside the index directory.
pub const PART_TABLE: &str = "part_index.csv";
/// File name of the persisted footprint table inside the index directory.
pub const FOOTPRINT_TABLE: &str = "footprint_index.csv";

// Leading unnamed column holds the row ordinal.
const PART_COLUMNS: [&str; 5] = ["", "part_name", "pin_count", "location", "alias_of"];
const FOOTPRINT_COLUMNS: [&str; 4] = ["", "name", "pad_count", "location"];

#[derive(Debug, Default, Clone)]
pub struct IndexOptions {
    pub follow_symlinks: bool,
    /// Bound the worker pool used for parsing; `None` uses the default.
    pub jobs: Option<usize>,
}

/// The two accumulated tables.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IndexTables {
    pub parts: Vec<PartRecord>,
    pub footprints: Vec<FootprintRecord>,
}

/// One skipped file and the reason it was skipped.
#[derive(Debug, Clone)]
pub struct FileFailure {
    pub path: PathBuf,
    pub reason: String,
}

/// What a build run did: files scanned, rows produced, files skipped.
#[derive(Debug, Default, Clone)]
pub struct IndexReport {
    pub files_scanned: usize,
    pub libraries_indexed: usize,
    pub footprints_indexed: usize,
    pub failures: Vec<FileFailure>,
}

enum FileRows {
    Parts(Vec<PartRecord>),
    Footprint(FootprintRecord),
}

/// Scan the given roots and build both tables.
pub fn build_index(roots: &[PathBuf], opts: &IndexOptions) -> Result<(IndexTables, IndexReport)> {
    let discovery =
        PathDiscovery::new(roots.iter().cloned()).follow_symlinks(opts.follow_symlinks);
    let sources = discovery.discover()?;

    let run_build = || {
        sources
            .par_iter()
            .map(|source| (source.path.clone(), index_file(source)))
            .collect::<Vec<_>>()
    };

    let outcomes = if let Some(jobs) = opts.jobs {
        let pool = ThreadPoolBuilder::new().num_threads(jobs).build()?;
        pool.install(run_build)
    } else {
        run_build()
    };

    let mut tables = IndexTables::default();
    let mut report = IndexReport::default();
    for (path, outcome) in outcomes {
        report.files_scanned += 1;
        match outcome {
            Ok(FileRows::Parts(rows)) => {
                report.libraries_indexed += 1;
                tables.parts.extend(rows);
            }
            Ok(FileRows::Footprint(row)) => {
                report.footprints_indexed += 1;
                tables.footprints.push(row);
            }
            Err(err) => {
                // The path is reported separately, so strip it from the
                // reason text.
                let reason = match &err {
                    Error::Parse { source, .. } => source.to_string(),
                    Error::File { source, .. } => source.to_string(),
                    other => other.to_string(),
                };
                log::warn!("skipping {}: {reason}", path.display());
                report.failures.push(FileFailure { path, reason });
            }
        }
    }

    Ok((tables, report))
}

/// Parse one discovered file into its table rows. A library that defines
/// nothing yields an empty row set, which is not a failure.
fn index_file(source: &SourceRef) -> Result<FileRows> {
    let text = fs::read_to_string(&source.path).map_err(|err| Error::File {
        path: source.path.clone(),
        source: err,
    })?;

    match source.kind {
        SourceKind::SymbolLib => {
            let lib = symbols::parse_symbol_lib(&text).map_err(|err| Error::Parse {
                file: source.path.clone(),
                source: err,
            })?;
            let location = source
                .path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| source.path.display().to_string());
            Ok(FileRows::Parts(part_rows(&lib, &location)))
        }
        SourceKind::FootprintMod => {
            let def = footprints::parse_module(&text).map_err(|err| Error::Parse {
                file: source.path.clone(),
                source: err,
            })?;
            Ok(FileRows::Footprint(footprint_row(&def, &source.path)))
        }
    }
}

impl IndexTables {
    /// Write both tables under `dir`, creating it if missing.
    pub fn save(&self, dir: &Path) -> Result<()> {
        fs::create_dir_all(dir).map_err(|err| Error::File {
            path: dir.to_path_buf(),
            source: err,
        })?;
        write_parts(&self.parts, &dir.join(PART_TABLE))?;
        write_footprints(&self.footprints, &dir.join(FOOTPRINT_TABLE))?;
        Ok(())
    }

    /// Load both tables from `dir`. A missing table file is fatal.
    pub fn load(dir: &Path) -> Result<Self> {
        Ok(Self {
            parts: read_parts(&dir.join(PART_TABLE))?,
            footprints: read_footprints(&dir.join(FOOTPRINT_TABLE))?,
        })
    }
}

fn table_error(path: &Path, err: impl ToString) -> Error {
    Error::Table {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

fn write_parts(rows: &[PartRecord], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| table_error(path, e))?;
    writer
        .write_record(PART_COLUMNS)
        .map_err(|e| table_error(path, e))?;
    for (ordinal, row) in rows.iter().enumerate() {
        let ordinal = ordinal.to_string();
        let pin_count = row.pin_count.to_string();
        writer
            .write_record([
                ordinal.as_str(),
                row.part_name.as_str(),
                pin_count.as_str(),
                row.location.as_str(),
                row.alias_of.as_str(),
            ])
            .map_err(|e| table_error(path, e))?;
    }
    writer.flush().map_err(|e| table_error(path, e))?;
    Ok(())
}

fn write_footprints(rows: &[FootprintRecord], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| table_error(path, e))?;
    writer
        .write_record(FOOTPRINT_COLUMNS)
        .map_err(|e| table_error(path, e))?;
    for (ordinal, row) in rows.iter().enumerate() {
        let ordinal = ordinal.to_string();
        let pad_count = row.pad_count.to_string();
        writer
            .write_record([
                ordinal.as_str(),
                row.name.as_str(),
                pad_count.as_str(),
                row.location.as_str(),
            ])
            .map_err(|e| table_error(path, e))?;
    }
    writer.flush().map_err(|e| table_error(path, e))?;
    Ok(())
}

fn open_table(path: &Path) -> Result<csv::Reader<fs::File>> {
    if !path.exists() {
        return Err(Error::IndexNotFound {
            path: path.to_path_buf(),
        });
    }
    csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|e| table_error(path, e))
}

/// Columns are looked up by name so the ordinal column and any reordering
/// stay harmless.
fn column(header: &csv::StringRecord, name: &str, path: &Path) -> Result<usize> {
    header
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| table_error(path, format!("missing column {name:?}")))
}

fn field<'r>(record: &'r csv::StringRecord, idx: usize, path: &Path) -> Result<&'r str> {
    record
        .get(idx)
        .ok_or_else(|| table_error(path, format!("row is missing column {idx}")))
}

fn parse_count(raw: &str, path: &Path) -> Result<u32> {
    raw.parse()
        .map_err(|_| table_error(path, format!("bad count value {raw:?}")))
}

fn read_parts(path: &Path) -> Result<Vec<PartRecord>> {
    let mut reader = open_table(path)?;
    let header = reader.headers().map_err(|e| table_error(path, e))?.clone();
    let part_name = column(&header, "part_name", path)?;
    let pin_count = column(&header, "pin_count", path)?;
    let location = column(&header, "location", path)?;
    let alias_of = column(&header, "alias_of", path)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| table_error(path, e))?;
        rows.push(PartRecord {
            part_name: field(&record, part_name, path)?.to_string(),
            pin_count: parse_count(field(&record, pin_count, path)?, path)?,
            location: field(&record, location, path)?.to_string(),
            alias_of: field(&record, alias_of, path)?.to_string(),
        });
    }
    Ok(rows)
}

fn read_footprints(path: &Path) -> Result<Vec<FootprintRecord>> {
    let mut reader = open_table(path)?;
    let header = reader.headers().map_err(|e| table_error(path, e))?.clone();
    let name = column(&header, "name", path)?;
    let pad_count = column(&header, "pad_count", path)?;
    let location = column(&header, "location", path)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| table_error(path, e))?;
        rows.push(FootprintRecord {
            name: field(&record, name, path)?.to_string(),
            pad_count: parse_count(field(&record, pad_count, path)?, path)?,
            location: field(&record, location, path)?.to_string(),
        });
    }
    Ok(rows)
}
