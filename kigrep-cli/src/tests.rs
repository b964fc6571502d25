use super::*;
use clap::CommandFactory;
use std::io::Cursor;

fn part_row(name: &str, pins: u32, location: &str, alias_of: &str) -> PartRecord {
    PartRecord {
        part_name: name.to_string(),
        pin_count: pins,
        location: location.to_string(),
        alias_of: alias_of.to_string(),
    }
}

#[test]
fn parses_index_args() {
    let cli = Cli::try_parse_from([
        "kigrep",
        "index",
        "--out-dir",
        "tables",
        "--follow-symlinks",
        "-j",
        "4",
        "/usr/share/kicad",
    ])
    .expect("parse cli");

    let Command::Index(args) = cli.command else {
        panic!("expected index command");
    };
    assert_eq!(args.paths, [PathBuf::from("/usr/share/kicad")]);
    assert_eq!(args.out_dir, PathBuf::from("tables"));
    assert!(args.follow_symlinks);
    assert_eq!(args.jobs, Some(4));
}

#[test]
fn index_defaults_to_the_indexes_dir() {
    let cli = Cli::try_parse_from(["kigrep", "index", "libs"]).expect("parse cli");

    let Command::Index(args) = cli.command else {
        panic!("expected index command");
    };
    assert_eq!(args.out_dir, PathBuf::from("indexes"));
    assert_eq!(args.jobs, None);
    assert!(!args.follow_symlinks);
}

#[test]
fn index_requires_at_least_one_path() {
    let parse = Cli::try_parse_from(["kigrep", "index"]);
    assert!(parse.is_err());
}

#[test]
fn parses_part_query_args() {
    let cli = Cli::try_parse_from(["kigrep", "part", "8", "lp295[0-9]", "--index-dir", "tables"])
        .expect("parse cli");

    let Command::Part(args) = cli.command else {
        panic!("expected part command");
    };
    assert_eq!(args.count, 8);
    assert_eq!(args.name, "lp295[0-9]");
    assert_eq!(args.index_dir, PathBuf::from("tables"));
    assert!(!args.wants_all());
}

#[test]
fn json_and_ndjson_conflict() {
    let parse = Cli::try_parse_from(["kigrep", "part", "8", "lp", "--json", "--ndjson"]);
    assert!(parse.is_err());
}

#[test]
fn json_output_lists_every_match() {
    let cli = Cli::try_parse_from(["kigrep", "footprint", "8", "soic", "--json"])
        .expect("parse cli");

    let Command::Footprint(args) = cli.command else {
        panic!("expected footprint command");
    };
    assert!(args.json);
    assert!(args.wants_all());
}

#[test]
fn empty_name_is_rejected_before_querying() {
    let cli = Cli::try_parse_from(["kigrep", "part", "8", ""]).expect("parse cli");

    let Command::Part(args) = cli.command else {
        panic!("expected part command");
    };
    assert!(args.pattern().is_err());
}

#[test]
fn part_rows_align_and_mark_aliases() {
    let rows = vec![
        part_row("LP2951", 8, "regul.lib", "LP2951"),
        part_row("LP2951CM", 8, "regul.lib", "LP2951"),
    ];

    let mut buf = Cursor::new(Vec::new());
    write_part_rows(&rows, &mut buf).expect("write");

    let output = String::from_utf8(buf.into_inner()).expect("utf8");
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 2);

    let first_pos = lines[0].find("LP2951").expect("name");
    let second_pos = lines[1].find("LP2951CM").expect("name");
    assert_eq!(first_pos, second_pos);

    assert!(!lines[0].contains("alias of"));
    assert!(lines[1].contains("alias of LP2951"));
}

#[test]
fn footprint_rows_show_pad_counts() {
    let rows = vec![FootprintRecord {
        name: "SOIC-8".to_string(),
        pad_count: 8,
        location: "Package_SO.pretty".to_string(),
    }];

    let mut buf = Cursor::new(Vec::new());
    write_footprint_rows(&rows, &mut buf).expect("write");

    let output = String::from_utf8(buf.into_inner()).expect("utf8");
    assert!(output.contains("Package_SO.pretty"));
    assert!(output.contains("8 pads"));
}

#[test]
fn help_lists_the_three_commands() {
    let help = Cli::command().render_long_help().to_string();
    assert!(help.contains("index"));
    assert!(help.contains("part"));
    assert!(help.contains("footprint"));
}
