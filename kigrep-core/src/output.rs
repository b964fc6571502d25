//! Streaming output helpers for query results.

use std::io::Write;

use serde::Serialize;

use crate::error::Result;

/// Write rows as a prettified JSON array.
pub fn write_json_pretty<T: Serialize>(rows: &[T], mut w: impl Write) -> Result<()> {
    let json = serde_json::to_string_pretty(rows)?;
    w.write_all(json.as_bytes())?;
    Ok(())
}

/// Write rows as newline-delimited JSON (NDJSON).
pub fn write_ndjson<T: Serialize>(rows: &[T], mut w: impl Write) -> Result<()> {
    for row in rows {
        let line = serde_json::to_string(row)?;
        w.write_all(line.as_bytes())?;
        w.write_all(b"\n")?;
    }
    Ok(())
}
