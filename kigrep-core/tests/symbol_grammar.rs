use kigrep_core::symbols::parse_symbol_lib;

const GATE_LIB: &str = r#"EESchema-LIBRARY Version 2.4
#encoding utf-8
#
# 74LVC1G17
#
DEF 74LVC1G17 U 0 10 Y Y 1 F N
F0 "U" -50 150 50 H V C CNN
F1 "74LVC1G17" -50 -150 50 H V C CNN
F2 "" 0 0 50 H I C CNN
F3 "" 0 0 50 H I C CNN
ALIAS 74LVC1G17X
$FPLIST
 SOT*
 SC-70*
$ENDFPLIST
DRAW
S -150 100 150 -100 0 1 10 f
P 2 0 1 0 -100 50 -50 50 N
X A 2 -250 0 100 R 50 50 1 1 I
X GND 3 0 -200 100 U 50 50 1 1 W
X VCC 5 0 200 100 D 50 50 1 1 W
X Y 4 250 0 100 L 50 50 1 1 O V
X NC 1 -250 200 100 R 50 50 1 1 N N
ENDDRAW
ENDDEF
#
#End Library
"#;

#[test]
fn parses_a_realistic_library() {
    let lib = parse_symbol_lib(GATE_LIB).expect("parse");

    assert_eq!(lib.version, "2.4");
    assert_eq!(lib.parts.len(), 1);

    let part = &lib.parts[0];
    assert_eq!(part.name, "74LVC1G17");
    assert_eq!(part.ref_id, "U");
    assert_eq!(part.aliases, ["74LVC1G17X"]);
    assert_eq!(part.pins.len(), 5);
}

#[test]
fn pin_fields_land_in_named_slots() {
    let lib = parse_symbol_lib(GATE_LIB).expect("parse");
    let pins = &lib.parts[0].pins;

    assert_eq!(pins[0].name, "A");
    assert_eq!(pins[0].num, "2");
    assert_eq!(pins[0].orientation, "R");
    assert_eq!(pins[0].unit, "1");
    assert_eq!(pins[0].etype, "I");
    assert_eq!(pins[0].style, None);

    // The last pin carries the optional twelfth field.
    assert_eq!(pins[3].etype, "O");
    assert_eq!(pins[3].style.as_deref(), Some("V"));
}

#[test]
fn sub_sections_merge_in_any_order() {
    let text = "\
EESchema-LIBRARY Version 2.3
DEF RELAY_2RT K 0 40 Y Y 1 F N
DRAW
X COIL+ 1 -300 200 100 R 50 50 1 1 P
ENDDRAW
ALIAS FINDER_40.52
F0 \"K\" 0 450 50 H V C CNN
DRAW
X COIL- 2 -300 -200 100 R 50 50 1 1 P
X COM1 3 300 200 100 L 50 50 1 1 P
ENDDRAW
ALIAS G5V-2
ENDDEF
";
    let lib = parse_symbol_lib(text).expect("parse");
    let part = &lib.parts[0];

    assert_eq!(part.pins.len(), 3);
    assert_eq!(part.aliases, ["FINDER_40.52", "G5V-2"]);
}

#[test]
fn version_clause_may_sit_on_a_later_line() {
    let text = "\
EESchema-LIBRARY
created by hand Version 2
DEF X U 0 40 Y Y 1 F N
ENDDEF
";
    let lib = parse_symbol_lib(text).expect("parse");
    assert_eq!(lib.version, "2");
    assert_eq!(lib.parts.len(), 1);
}

#[test]
fn quoted_part_names_keep_inner_spaces() {
    let text = "\
EESchema-LIBRARY Version 2.4
DEF \"PIN ARRAY 10X1\" J 0 40 Y N 1 F N
DRAW
X 1 1 -150 400 200 R 40 40 1 1 P
ENDDRAW
ENDDEF
";
    let lib = parse_symbol_lib(text).expect("parse");
    assert_eq!(lib.parts[0].name, "PIN ARRAY 10X1");
}

#[test]
fn an_empty_library_has_no_parts() {
    let lib = parse_symbol_lib("EESchema-LIBRARY Version 2.4\n#End Library\n").expect("parse");
    assert!(lib.parts.is_empty());
}

#[test]
fn missing_header_is_reported_on_line_one() {
    let err = parse_symbol_lib("DEF X U 0 40 Y Y 1 F N\nENDDEF\n").unwrap_err();
    assert_eq!(err.line, 1);
    assert!(err.message.contains("EESchema-LIBRARY"), "{}", err.message);
}

#[test]
fn missing_version_clause_is_an_error() {
    let err = parse_symbol_lib("EESchema-LIBRARY by hand\n").unwrap_err();
    assert!(err.message.contains("version"), "{}", err.message);
}

#[test]
fn unknown_line_inside_def_reports_its_physical_line() {
    let text = "\
EESchema-LIBRARY Version 2.4
# a comment keeps its line
DEF X U 0 40 Y Y 1 F N
GARBAGE here
ENDDEF
";
    let err = parse_symbol_lib(text).unwrap_err();
    assert_eq!(err.line, 4);
    assert!(err.message.contains("GARBAGE"), "{}", err.message);
}

#[test]
fn unterminated_def_names_the_part() {
    let err = parse_symbol_lib("EESchema-LIBRARY Version 2.4\nDEF LM317 U 0 40 Y Y 1 F N\n")
        .unwrap_err();
    assert!(err.message.contains("LM317"), "{}", err.message);
    assert!(err.message.contains("ENDDEF"), "{}", err.message);
}

#[test]
fn unterminated_draw_is_an_error() {
    let text = "\
EESchema-LIBRARY Version 2.4
DEF X U 0 40 Y Y 1 F N
DRAW
X A 1 0 0 100 R 50 50 1 1 I
";
    let err = parse_symbol_lib(text).unwrap_err();
    assert!(err.message.contains("ENDDRAW"), "{}", err.message);
}

#[test]
fn short_pin_lines_are_rejected() {
    let text = "\
EESchema-LIBRARY Version 2.4
DEF X U 0 40 Y Y 1 F N
DRAW
X A 1 0 0 100 R
ENDDRAW
ENDDEF
";
    let err = parse_symbol_lib(text).unwrap_err();
    assert_eq!(err.line, 4);
    assert!(err.message.contains("fields"), "{}", err.message);
}

#[test]
fn fplist_contents_never_reach_the_grammar() {
    // Wildcard patterns would be unknown tags anywhere else.
    let text = "\
EESchema-LIBRARY Version 2.4
DEF X U 0 40 Y Y 1 F N
$FPLIST
 DIP*
 Pin_Array*
 14DIP-ELL*
$ENDFPLIST
ENDDEF
";
    let lib = parse_symbol_lib(text).expect("parse");
    assert!(lib.parts[0].pins.is_empty());
}

#[test]
fn comments_are_ignored_inside_blocks_too() {
    let text = "\
EESchema-LIBRARY Version 2.4
DEF X U 0 40 Y Y 1 F N
DRAW
# pins below
X A 1 0 0 100 R 50 50 1 1 I
ENDDRAW
ENDDEF
";
    let lib = parse_symbol_lib(text).expect("parse");
    assert_eq!(lib.parts[0].pins.len(), 1);
}
