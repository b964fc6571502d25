//! Grammar for KiCad `.kicad_mod` footprint module files.

use crate::error::GrammarError;

/// One parsed footprint module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FootprintDef {
    pub name: String,
    pub pad_count: u32,
}

/// Parse the full text of one `.kicad_mod` file.
///
/// The module name comes from the `(module NAME ...` header; the rest of
/// the text is scanned for `(pad <id>` entries wherever they sit, so pads
/// interleaved with drawing sub-blocks are still counted. A bare numeric
/// identifier counts; a quoted identifier (including the empty `""` form)
/// matches but never counts; any other open paren is skipped.
pub fn parse_module(text: &str) -> Result<FootprintDef, GrammarError> {
    let mut scanner = Scanner { text, pos: 0 };

    scanner.skip_whitespace();
    scanner.expect_char('(')?;
    scanner.expect_keyword("module")?;
    let name = scanner.name_token()?;

    let mut pad_count = 0u32;
    while let Some(id) = scanner.next_pad_id() {
        if id.bytes().all(|b| b.is_ascii_digit()) {
            pad_count += 1;
        }
    }

    Ok(FootprintDef { name, pad_count })
}

struct Scanner<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.rest().chars().next() {
            if !c.is_whitespace() {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    /// 1-based line number at the current position.
    fn line(&self) -> usize {
        self.text[..self.pos].bytes().filter(|&b| b == b'\n').count() + 1
    }

    fn fail(&self, message: impl Into<String>) -> GrammarError {
        GrammarError::new(self.line(), message.into())
    }

    fn expect_char(&mut self, ch: char) -> Result<(), GrammarError> {
        if self.rest().starts_with(ch) {
            self.pos += ch.len_utf8();
            Ok(())
        } else {
            Err(self.fail(format!("expected {ch:?}")))
        }
    }

    /// Caseless keyword with a word boundary after it.
    fn expect_keyword(&mut self, word: &str) -> Result<(), GrammarError> {
        self.skip_whitespace();
        let rest = self.rest();
        let head = match rest.get(..word.len()) {
            Some(head) if head.eq_ignore_ascii_case(word) => head,
            _ => return Err(self.fail(format!("expected {word:?} keyword"))),
        };
        let boundary = rest[head.len()..]
            .chars()
            .next()
            .map_or(true, |c| !c.is_alphanumeric() && c != '_');
        if !boundary {
            return Err(self.fail(format!("expected {word:?} keyword")));
        }
        self.pos += head.len();
        Ok(())
    }

    /// Module name, optionally quoted. Quotes are stripped.
    fn name_token(&mut self) -> Result<String, GrammarError> {
        self.skip_whitespace();
        let rest = self.rest();
        match rest.chars().next() {
            Some(q @ ('"' | '\'')) => match rest[1..].find(q) {
                Some(end) => {
                    self.pos += end + 2;
                    Ok(rest[1..end + 1].to_string())
                }
                None => Err(self.fail("unterminated quoted module name")),
            },
            Some(c) if c != '(' && c != ')' => {
                let end = rest
                    .find(|c: char| c.is_whitespace() || c == '(' || c == ')')
                    .unwrap_or(rest.len());
                self.pos += end;
                Ok(rest[..end].to_string())
            }
            _ => Err(self.fail("missing module name")),
        }
    }

    /// Scan forward to the next `(pad <id>` entry and return the raw id
    /// token (quotes included), or None at end of input. An open paren
    /// that does not introduce a pad entry is stepped over.
    fn next_pad_id(&mut self) -> Option<&'a str> {
        loop {
            let offset = self.rest().find('(')?;
            self.pos += offset + 1;

            let mut probe = Scanner {
                text: self.text,
                pos: self.pos,
            };
            if probe.expect_keyword("pad").is_err() {
                continue;
            }
            probe.skip_whitespace();
            let rest = probe.rest();
            let token = match rest.chars().next() {
                Some(q @ ('"' | '\'')) => match rest[1..].find(q) {
                    Some(end) => &rest[..end + 2],
                    None => continue,
                },
                Some(c) if c != '(' && c != ')' => {
                    let end = rest
                        .find(|c: char| c.is_whitespace() || c == '(' || c == ')')
                        .unwrap_or(rest.len());
                    &rest[..end]
                }
                _ => continue,
            };

            self.pos = probe.pos + token.len();
            return Some(token);
        }
    }
}
