//! kigrep CLI.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};

use kigrep_core::index::{build_index, IndexOptions};
use kigrep_core::output::{write_json_pretty, write_ndjson};
use kigrep_core::query::SearchIndex;
use kigrep_core::records::{FootprintRecord, PartRecord};

/// CLI entrypoint for kigrep.
#[derive(Debug, Parser)]
#[command(
    name = "kigrep",
    about = "Index and search KiCad part and footprint libraries"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Scan library trees and write the index tables
    Index(IndexArgs),
    /// Find a schematic part by pin count and name pattern
    Part(QueryArgs),
    /// Find a footprint module by pad count and name pattern
    Footprint(QueryArgs),
}

#[derive(Debug, Args)]
struct IndexArgs {
    /// Library trees to scan
    #[arg(value_hint = ValueHint::DirPath, required = true)]
    paths: Vec<PathBuf>,

    /// Directory the index tables are written to
    #[arg(long = "out-dir", default_value = "indexes", value_hint = ValueHint::DirPath)]
    out_dir: PathBuf,

    /// Follow symlinks while walking paths
    #[arg(long = "follow-symlinks", action = ArgAction::SetTrue)]
    follow_symlinks: bool,

    /// Bound the parser worker pool
    #[arg(short = 'j', long = "jobs")]
    jobs: Option<usize>,
}

#[derive(Debug, Args)]
struct QueryArgs {
    /// Required pin (or pad) count
    count: u32,

    /// Case-insensitive regex matched against part or footprint names
    name: String,

    /// Directory holding the index tables
    #[arg(long = "index-dir", default_value = "indexes", value_hint = ValueHint::DirPath)]
    index_dir: PathBuf,

    /// List every match instead of the first
    #[arg(long = "all", action = ArgAction::SetTrue)]
    all: bool,

    /// Emit every match as a single JSON array
    #[arg(long = "json", action = ArgAction::SetTrue, conflicts_with = "ndjson")]
    json: bool,

    /// Emit every match as newline-delimited JSON
    #[arg(long = "ndjson", action = ArgAction::SetTrue)]
    ndjson: bool,
}

impl QueryArgs {
    fn wants_all(&self) -> bool {
        self.all || self.json || self.ndjson
    }

    fn pattern(&self) -> Result<&str> {
        if self.name.is_empty() {
            return Err(anyhow!("name pattern must not be empty"));
        }
        Ok(&self.name)
    }
}

/// Parse CLI args and execute the selected command.
pub fn run() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match cli.command {
        Command::Index(args) => run_index(args),
        Command::Part(args) => run_part(args),
        Command::Footprint(args) => run_footprint(args),
    }
}

fn run_index(args: IndexArgs) -> Result<()> {
    let opts = IndexOptions {
        follow_symlinks: args.follow_symlinks,
        jobs: args.jobs,
    };
    let (tables, report) = build_index(&args.paths, &opts)?;
    tables.save(&args.out_dir)?;

    println!(
        "indexed {} parts from {} libraries and {} footprints ({} of {} files skipped)",
        tables.parts.len(),
        report.libraries_indexed,
        report.footprints_indexed,
        report.failures.len(),
        report.files_scanned,
    );
    Ok(())
}

fn run_part(args: QueryArgs) -> Result<()> {
    let name = args.pattern()?;
    let index = SearchIndex::load(&args.index_dir)?;

    if args.wants_all() {
        let rows = index.query_part_all(args.count, name)?;
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        if args.ndjson {
            write_ndjson(&rows, &mut handle)?;
        } else if args.json {
            write_json_pretty(&rows, &mut handle)?;
        } else {
            write_part_rows(&rows, &mut handle)?;
        }
        return Ok(());
    }

    let hit = index.query_part(args.count, name)?;
    println!("{} {}", hit.location, hit.part_name);
    Ok(())
}

fn run_footprint(args: QueryArgs) -> Result<()> {
    let name = args.pattern()?;
    let index = SearchIndex::load(&args.index_dir)?;

    if args.wants_all() {
        let rows = index.query_footprint_all(args.count, name, true)?;
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        if args.ndjson {
            write_ndjson(&rows, &mut handle)?;
        } else if args.json {
            write_json_pretty(&rows, &mut handle)?;
        } else {
            write_footprint_rows(&rows, &mut handle)?;
        }
        return Ok(());
    }

    let hit = index.query_footprint(args.count, name)?;
    println!("{} {}", hit.location, hit.name);
    Ok(())
}

fn write_part_rows(rows: &[PartRecord], mut w: impl Write) -> Result<()> {
    let location_width = column_width(rows.iter().map(|r| r.location.len()));
    let name_width = column_width(rows.iter().map(|r| r.part_name.len()));

    for row in rows {
        let alias = if row.alias_of == row.part_name {
            String::new()
        } else {
            format!("  alias of {}", row.alias_of)
        };
        writeln!(
            w,
            "{:<location_width$}  {:<name_width$}  {} pins{alias}",
            row.location, row.part_name, row.pin_count
        )?;
    }
    Ok(())
}

fn write_footprint_rows(rows: &[FootprintRecord], mut w: impl Write) -> Result<()> {
    let location_width = column_width(rows.iter().map(|r| r.location.len()));
    let name_width = column_width(rows.iter().map(|r| r.name.len()));

    for row in rows {
        writeln!(
            w,
            "{:<location_width$}  {:<name_width$}  {} pads",
            row.location, row.name, row.pad_count
        )?;
    }
    Ok(())
}

fn column_width(lengths: impl Iterator<Item = usize>) -> usize {
    lengths.max().unwrap_or(0).clamp(0, 120)
}

#[cfg(test)]
mod tests;
