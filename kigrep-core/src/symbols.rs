//! Grammar for KiCad legacy `.lib` symbol libraries.
//!
//! The format is line-oriented but irregular: free-form trailing text,
//! optional quoting, multi-line sub-blocks. Raw text goes through a
//! normalization pass first (comment lines blanked in place, an
//! end-of-line sentinel appended) so the grammar can treat every line as
//! a closed field list while errors still report physical line numbers.

use crate::error::GrammarError;

/// End-of-line sentinel appended during normalization. Field splitting
/// stops at an unquoted sentinel, so trailing free text cannot bleed into
/// the next construct.
const TERMINATOR: char = '|';

// Pin line field positions, counted after the leading `X` tag.
const PIN_NAME: usize = 0;
const PIN_NUMBER: usize = 1;
const PIN_ORIENTATION: usize = 5;
const PIN_UNIT: usize = 8;
const PIN_ETYPE: usize = 10;
const PIN_STYLE: usize = 11;
/// Eleven fields are required; a twelfth (shape style) is optional.
const PIN_REQUIRED_FIELDS: usize = 11;
const PIN_MAX_FIELDS: usize = 12;

/// Tags that open a non-pin drawing line inside a DRAW section: arcs,
/// circles, polylines, rectangles and text.
const DRAW_TAGS: &str = "AaCcPpSsTt";

/// One pin line from a DRAW section.
///
/// Only the pin total reaches the index; the individual fields are kept
/// for debugging and forward compatibility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinDef {
    pub name: String,
    pub num: String,
    pub orientation: String,
    pub unit: String,
    pub etype: String,
    pub style: Option<String>,
}

/// One parsed `DEF ... ENDDEF` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartDef {
    pub name: String,
    pub ref_id: String,
    pub pins: Vec<PinDef>,
    pub aliases: Vec<String>,
}

/// A whole parsed library file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolLib {
    pub version: String,
    pub parts: Vec<PartDef>,
}

/// Parse the full text of one `.lib` file.
///
/// Returns every part definition in the file, or the first grammar fault
/// with its physical line number. Callers attach the file identity when
/// reporting.
pub fn parse_symbol_lib(text: &str) -> Result<SymbolLib, GrammarError> {
    let rows = tokenize(text);
    let mut parser = Parser { rows: &rows, pos: 0 };

    let version = parser.header()?;
    let mut parts = Vec::new();
    while let Some(row) = parser.bump() {
        if row.is_keyword("DEF") {
            parts.push(parser.part_def(row)?);
        } else {
            return Err(row.fail(format!(
                "expected DEF or end of file, found {:?}",
                row.tag()
            )));
        }
    }

    Ok(SymbolLib { version, parts })
}

/// Normalize raw library text: comment lines (first non-blank character
/// `#`) become blank lines, every other line gets a trailing sentinel,
/// and blank lines stay blank. Line count is preserved.
fn normalize(text: &str) -> Vec<String> {
    text.lines()
        .map(|raw| {
            let trimmed = raw.trim_start();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                String::new()
            } else {
                format!("{raw} {TERMINATOR}")
            }
        })
        .collect()
}

/// Split one normalized line into fields. Double- and single-quoted runs
/// form a single field with the quotes stripped; an unquoted sentinel
/// ends the line.
fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut chars = line.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
        } else if c == TERMINATOR {
            break;
        } else if c == '"' || c == '\'' {
            chars.next();
            let mut field = String::new();
            for q in chars.by_ref() {
                if q == c {
                    break;
                }
                field.push(q);
            }
            fields.push(field);
        } else {
            let mut field = String::new();
            while let Some(&c) = chars.peek() {
                if c.is_whitespace() || c == TERMINATOR {
                    break;
                }
                field.push(c);
                chars.next();
            }
            fields.push(field);
        }
    }

    fields
}

/// One non-blank normalized line, tokenized.
#[derive(Debug)]
struct Row {
    line: usize,
    fields: Vec<String>,
}

impl Row {
    fn tag(&self) -> &str {
        &self.fields[0]
    }

    fn is_keyword(&self, word: &str) -> bool {
        self.tag().eq_ignore_ascii_case(word)
    }

    fn fail(&self, message: impl Into<String>) -> GrammarError {
        GrammarError::new(self.line, message)
    }
}

fn tokenize(text: &str) -> Vec<Row> {
    normalize(text)
        .iter()
        .enumerate()
        .filter_map(|(idx, line)| {
            let fields = split_fields(line);
            if fields.is_empty() {
                None
            } else {
                Some(Row {
                    line: idx + 1,
                    fields,
                })
            }
        })
        .collect()
}

struct Parser<'a> {
    rows: &'a [Row],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn bump(&mut self) -> Option<&'a Row> {
        let row = self.rows.get(self.pos);
        if row.is_some() {
            self.pos += 1;
        }
        row
    }

    /// Header line: caseless `EESchema-LIBRARY`, then anything up to a
    /// caseless `version` keyword followed by a number, scanning across
    /// lines if it has to. The rest of the version line is discarded.
    fn header(&mut self) -> Result<String, GrammarError> {
        let first = self
            .bump()
            .ok_or_else(|| GrammarError::new(1, "missing EESchema-LIBRARY header"))?;
        if !first.is_keyword("EESchema-LIBRARY") {
            return Err(first.fail("missing EESchema-LIBRARY header"));
        }

        let mut row = first;
        let mut start = 1;
        loop {
            let fields = &row.fields;
            for i in start..fields.len() {
                if fields[i].eq_ignore_ascii_case("version") {
                    if let Some(number) = fields.get(i + 1) {
                        if is_version_number(number) {
                            return Ok(number.clone());
                        }
                    }
                }
            }
            row = match self.bump() {
                Some(next) => next,
                None => return Err(first.fail("missing version clause in header")),
            };
            start = 0;
        }
    }

    /// Body of one `DEF name ref_id ...` block. The four sub-section
    /// kinds may repeat and appear in any order; their contents are
    /// merged rather than matched against a fixed sequence.
    fn part_def(&mut self, start: &Row) -> Result<PartDef, GrammarError> {
        if start.fields.len() < 3 {
            return Err(start.fail("DEF needs a name and a reference id"));
        }
        let mut def = PartDef {
            name: start.fields[1].clone(),
            ref_id: start.fields[2].clone(),
            pins: Vec::new(),
            aliases: Vec::new(),
        };

        loop {
            let row = match self.bump() {
                Some(row) => row,
                None => {
                    return Err(start.fail(format!("DEF {:?} has no matching ENDDEF", def.name)))
                }
            };

            if row.is_keyword("ENDDEF") {
                return Ok(def);
            } else if is_field_line(row) {
                // F0/F1/... metadata lines carry no index data.
            } else if row.is_keyword("ALIAS") {
                def.aliases.extend(row.fields[1..].iter().cloned());
            } else if row.is_keyword("$FPLIST") {
                self.skip_fplist(row)?;
            } else if row.is_keyword("DRAW") {
                self.draw_section(row, &mut def.pins)?;
            } else {
                return Err(row.fail(format!("unexpected {:?} inside DEF", row.tag())));
            }
        }
    }

    /// `$FPLIST` contents are never indexed; skip to `$ENDFPLIST`.
    fn skip_fplist(&mut self, start: &Row) -> Result<(), GrammarError> {
        loop {
            match self.bump() {
                Some(row) if row.is_keyword("$ENDFPLIST") => return Ok(()),
                Some(_) => {}
                None => return Err(start.fail("$FPLIST has no matching $ENDFPLIST")),
            }
        }
    }

    fn draw_section(
        &mut self,
        start: &Row,
        pins: &mut Vec<PinDef>,
    ) -> Result<(), GrammarError> {
        loop {
            let row = match self.bump() {
                Some(row) => row,
                None => return Err(start.fail("DRAW has no matching ENDDRAW")),
            };

            if row.is_keyword("ENDDRAW") {
                return Ok(());
            } else if row.is_keyword("X") {
                pins.push(pin_line(row)?);
            } else if is_draw_tag(row.tag()) {
                // Shape lines are not indexed.
            } else {
                return Err(row.fail(format!("unexpected {:?} inside DRAW", row.tag())));
            }
        }
    }
}

fn pin_line(row: &Row) -> Result<PinDef, GrammarError> {
    let fields = &row.fields[1..];
    if fields.len() < PIN_REQUIRED_FIELDS || fields.len() > PIN_MAX_FIELDS {
        return Err(row.fail(format!(
            "pin line carries {} fields, expected {} or {}",
            fields.len(),
            PIN_REQUIRED_FIELDS,
            PIN_MAX_FIELDS
        )));
    }
    Ok(PinDef {
        name: fields[PIN_NAME].clone(),
        num: fields[PIN_NUMBER].clone(),
        orientation: fields[PIN_ORIENTATION].clone(),
        unit: fields[PIN_UNIT].clone(),
        etype: fields[PIN_ETYPE].clone(),
        style: fields.get(PIN_STYLE).cloned(),
    })
}

/// Field lines look like `F0 "U" 50 40 ...`; the tag and number are
/// usually fused but may be split.
fn is_field_line(row: &Row) -> bool {
    let tag = row.tag();
    if !tag.starts_with('F') && !tag.starts_with('f') {
        return false;
    }
    let rest = &tag[1..];
    if rest.is_empty() {
        matches!(row.fields.get(1), Some(num) if !num.is_empty() && num.bytes().all(|b| b.is_ascii_digit()))
    } else {
        rest.bytes().all(|b| b.is_ascii_digit())
    }
}

fn is_draw_tag(tag: &str) -> bool {
    let mut chars = tag.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if DRAW_TAGS.contains(c))
}

/// `2`, `2.` and `2.4` are all valid version numbers.
fn is_version_number(token: &str) -> bool {
    let (whole, frac) = match token.split_once('.') {
        Some((w, f)) => (w, Some(f)),
        None => (token, None),
    };
    if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    match frac {
        Some(f) => f.bytes().all(|b| b.is_ascii_digit()),
        None => true,
    }
}
