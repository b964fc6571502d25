//! Index row types and the extraction step that produces them.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::footprints::FootprintDef;
use crate::symbols::SymbolLib;

/// One row of the part table.
///
/// Column names are the external contract; downstream tools read the
/// persisted CSV by these names. The canonical row for a part carries its
/// own name in `alias_of`; alias rows point back at the canonical name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartRecord {
    pub part_name: String,
    pub pin_count: u32,
    pub location: String,
    pub alias_of: String,
}

/// One row of the footprint table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FootprintRecord {
    pub name: String,
    pub pad_count: u32,
    pub location: String,
}

/// Flatten a parsed library into part rows: per part, the canonical row
/// first, then one row per alias in parsed order. `location` is the
/// source file name.
pub fn part_rows(lib: &SymbolLib, location: &str) -> Vec<PartRecord> {
    let mut rows = Vec::new();
    for part in &lib.parts {
        let pin_count = part.pins.len() as u32;
        rows.push(PartRecord {
            part_name: part.name.clone(),
            pin_count,
            location: location.to_string(),
            alias_of: part.name.clone(),
        });
        for alias in &part.aliases {
            rows.push(PartRecord {
                part_name: alias.clone(),
                pin_count,
                location: location.to_string(),
                alias_of: part.name.clone(),
            });
        }
    }
    rows
}

/// Build the one footprint row for a parsed module. `location` is the
/// parent directory name of the module file: footprint libraries are
/// laid out one directory per library.
pub fn footprint_row(def: &FootprintDef, module_path: &Path) -> FootprintRecord {
    let location = module_path
        .parent()
        .and_then(|dir| dir.file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    FootprintRecord {
        name: def.name.clone(),
        pad_count: def.pad_count,
        location,
    }
}
