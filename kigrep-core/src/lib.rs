//! kigrep-core: index and query engine for KiCad legacy libraries.
//!
//! Schematic symbol libraries (`.lib`) and footprint modules
//! (`.kicad_mod`) are loosely structured text formats. This crate turns
//! a tree of them into two queryable tables:
//!
//! - **Parse**: two fault-tolerant grammars read part definitions
//!   (name, pins, aliases) out of symbol libraries and pad counts out
//!   of footprint modules.
//! - **Index**: discovered files are parsed in parallel and flattened
//!   into part and footprint rows; aliases become rows of their own, so
//!   a part is findable under every name it answers to. A file that
//!   fails to parse is skipped and logged, never fatal. The tables
//!   persist as plain CSV.
//! - **Query**: count plus name lookups over the loaded tables, with
//!   case-insensitive regex name matching, in insertion order.
//!
//! ```rust,no_run
//! use std::path::{Path, PathBuf};
//!
//! use kigrep_core::index::{build_index, IndexOptions};
//! use kigrep_core::query::SearchIndex;
//!
//! let roots = vec![PathBuf::from("/usr/share/kicad/library")];
//! let (tables, report) = build_index(&roots, &IndexOptions::default())?;
//! println!(
//!     "indexed {} parts, {} footprints ({} files skipped)",
//!     tables.parts.len(),
//!     tables.footprints.len(),
//!     report.failures.len()
//! );
//! tables.save(Path::new("indexes"))?;
//!
//! let index = SearchIndex::load(Path::new("indexes"))?;
//! let hit = index.query_part(8, "lp2951")?;
//! println!("{} in {}", hit.part_name, hit.location);
//! # Ok::<(), kigrep_core::Error>(())
//! ```

pub mod discovery;
pub mod error;
pub mod footprints;
pub mod index;
pub mod output;
pub mod query;
pub mod records;
pub mod symbols;

pub use error::{Error, GrammarError, Result};
