// SPDX-License-Identifier: PMPL-1.0-or-later

//! Line-oriented view of a source unit
//!
//! One forward pass strips comments, blanks string contents (quotes are
//! kept so columns line up with the raw text) and tracks block depth,
//! either from braces or from indentation depending on the language.
//! Every downstream scan works on this view instead of re-lexing.

use crate::patterns::{BlockStyle, LanguagePatternTable, SingleQuote};
use crate::types::Language;

/// Raw text plus the language it is analysed as
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    pub text: String,
    pub language: Language,
}

impl SourceUnit {
    pub fn new(text: impl Into<String>, language: Language) -> Self {
        Self {
            text: text.into(),
            language,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// UTF-8 first, then Windows-1252. A leading byte-order mark is dropped.
pub fn decode_source(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => {
            let (cow, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
            cow.into_owned()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    /// 1-based line number
    pub number: usize,
    pub raw: String,
    /// Comment-free text with string contents blanked
    pub code: String,
    pub is_blank: bool,
    pub is_comment: bool,
    /// Block depth before the line
    pub depth: usize,
    pub depth_after: usize,
    /// Deepest point reached within the line
    pub peak: usize,
    /// Shallowest point reached within the line
    pub trough: usize,
    /// Leading whitespace width (tab = 4)
    pub indent: usize,
}

impl SourceLine {
    pub fn is_code(&self) -> bool {
        !self.is_blank && !self.is_comment
    }

    pub fn trimmed(&self) -> &str {
        self.code.trim()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LexState {
    Code,
    BlockComment,
    Backtick,
    Triple(char),
}

#[derive(Debug, Clone)]
pub struct SourceView {
    pub language: Language,
    pub block_style: BlockStyle,
    pub lines: Vec<SourceLine>,
    /// Line where a block comment or multi-line string opened and never
    /// closed.
    pub unclosed_literal: Option<usize>,
}

impl SourceView {
    pub fn new(text: &str, table: &LanguagePatternTable) -> Self {
        let mut lines = Vec::new();
        let mut state = LexState::Code;
        let mut literal_start = None;
        let mut depth = 0usize;

        for (idx, raw) in text.lines().enumerate() {
            let number = idx + 1;
            if state == LexState::Code {
                literal_start = None;
            }
            let scanned = scan_line(raw, table, &mut state);
            if state != LexState::Code && literal_start.is_none() {
                literal_start = Some(number);
            }

            let is_blank = raw.trim().is_empty();
            let is_comment = !is_blank && scanned.saw_comment && scanned.code.trim().is_empty();

            let before = depth;
            let mut peak = depth;
            let mut trough = depth;
            if table.block_style == BlockStyle::Braces {
                for c in scanned.code.chars() {
                    match c {
                        '{' => {
                            depth += 1;
                            peak = peak.max(depth);
                        }
                        '}' => {
                            depth = depth.saturating_sub(1);
                            trough = trough.min(depth);
                        }
                        _ => {}
                    }
                }
            }

            lines.push(SourceLine {
                number,
                raw: raw.to_string(),
                code: scanned.code,
                is_blank,
                is_comment,
                depth: before,
                depth_after: depth,
                peak,
                trough,
                indent: indent_width(raw),
            });
        }

        if table.block_style == BlockStyle::Indentation {
            assign_indentation_depth(&mut lines);
        }

        let unclosed_literal = if state == LexState::Code {
            None
        } else {
            literal_start
        };

        Self {
            language: table.language,
            block_style: table.block_style,
            lines,
            unclosed_literal,
        }
    }

    pub fn code_lines(&self) -> impl Iterator<Item = &SourceLine> {
        self.lines.iter().filter(|l| l.is_code())
    }

    /// Line by 1-based number.
    pub fn line(&self, number: usize) -> Option<&SourceLine> {
        number.checked_sub(1).and_then(|i| self.lines.get(i))
    }

    pub fn non_blank_count(&self) -> usize {
        self.lines.iter().filter(|l| !l.is_blank).count()
    }

    /// Index of the last line of the block opened on line `start`
    /// (0-based) at or after byte offset `column` of its code.
    ///
    /// For brace languages this follows the first `{` to its match; a `;`
    /// before any `{` means there is no body. For indentation languages
    /// the block runs until the next code line at or above the start
    /// line's depth.
    pub fn block_end(&self, start: usize, column: usize) -> usize {
        match self.block_style {
            BlockStyle::Braces => self.brace_block_end(start, column),
            BlockStyle::Indentation => self.indent_block_end(start),
        }
    }

    fn brace_block_end(&self, start: usize, column: usize) -> usize {
        let mut level = 0usize;
        let mut opened = false;

        for (idx, line) in self.lines.iter().enumerate().skip(start) {
            let code = if idx == start {
                line.code.get(column..).unwrap_or("")
            } else {
                line.code.as_str()
            };
            for c in code.chars() {
                match c {
                    '{' => {
                        level += 1;
                        opened = true;
                    }
                    '}' if opened => {
                        level -= 1;
                        if level == 0 {
                            return idx;
                        }
                    }
                    ';' if !opened => return idx,
                    _ => {}
                }
            }
            // Signatures may wrap, but a body must open within a few lines.
            if !opened && idx >= start + 3 {
                return start;
            }
        }

        if opened {
            self.lines.len().saturating_sub(1)
        } else {
            start
        }
    }

    fn indent_block_end(&self, start: usize) -> usize {
        let Some(base) = self.lines.get(start).map(|l| l.depth) else {
            return start;
        };
        let mut end = start;
        for (idx, line) in self.lines.iter().enumerate().skip(start + 1) {
            if !line.is_code() {
                continue;
            }
            if line.depth <= base {
                break;
            }
            end = idx;
        }
        end
    }
}

struct ScannedLine {
    code: String,
    saw_comment: bool,
}

fn scan_line(raw: &str, table: &LanguagePatternTable, state: &mut LexState) -> ScannedLine {
    let chars: Vec<char> = raw.chars().collect();
    let mut code = String::with_capacity(raw.len());
    let mut saw_comment = false;
    let mut i = 0;

    while i < chars.len() {
        match *state {
            LexState::BlockComment => {
                saw_comment = true;
                let close = table.comments.block.map(|(_, close)| close).unwrap_or("*/");
                if starts_with_at(&chars, i, close) {
                    let n = close.chars().count();
                    push_blank(&mut code, n);
                    i += n;
                    *state = LexState::Code;
                } else {
                    push_blank(&mut code, 1);
                    i += 1;
                }
            }
            LexState::Backtick => {
                if chars[i] == '\\' && i + 1 < chars.len() {
                    push_blank(&mut code, 2);
                    i += 2;
                } else if chars[i] == '`' {
                    code.push('`');
                    i += 1;
                    *state = LexState::Code;
                } else {
                    push_blank(&mut code, 1);
                    i += 1;
                }
            }
            LexState::Triple(q) => {
                if chars[i] == '\\' && i + 1 < chars.len() {
                    push_blank(&mut code, 2);
                    i += 2;
                } else if chars[i] == q && triple_at(&chars, i, q) {
                    code.extend([q, q, q]);
                    i += 3;
                    *state = LexState::Code;
                } else {
                    push_blank(&mut code, 1);
                    i += 1;
                }
            }
            LexState::Code => {
                let c = chars[i];

                if let Some((open, _)) = table.comments.block {
                    let at_line_start = !open.starts_with('=') || i == 0;
                    if at_line_start && starts_with_at(&chars, i, open) {
                        saw_comment = true;
                        let n = open.chars().count();
                        push_blank(&mut code, n);
                        i += n;
                        *state = LexState::BlockComment;
                        continue;
                    }
                }

                if let Some(marker) = table
                    .comments
                    .line
                    .iter()
                    .find(|m| starts_with_at(&chars, i, m))
                {
                    let hash_ok = *marker != "#"
                        || i == 0
                        || chars[i - 1].is_whitespace()
                        || chars[i - 1] == ';';
                    if hash_ok {
                        saw_comment = true;
                        break;
                    }
                }

                match c {
                    '"' | '\'' if table.quotes.triple_quotes && triple_at(&chars, i, c) => {
                        code.extend([c, c, c]);
                        i += 3;
                        *state = LexState::Triple(c);
                    }
                    '"' => {
                        i = blank_string(&chars, i, '"', &mut code);
                    }
                    '\'' => match table.quotes.single {
                        SingleQuote::String => {
                            i = blank_string(&chars, i, '\'', &mut code);
                        }
                        SingleQuote::CharLiteral => {
                            let len = char_literal_len(&chars, i);
                            if len > 0 {
                                code.push('\'');
                                push_blank(&mut code, len - 2);
                                code.push('\'');
                                i += len;
                            } else {
                                code.push(c);
                                i += 1;
                            }
                        }
                        SingleQuote::Plain => {
                            code.push(c);
                            i += 1;
                        }
                    },
                    '`' if table.quotes.backtick_multiline => {
                        code.push('`');
                        i += 1;
                        *state = LexState::Backtick;
                    }
                    _ => {
                        code.push(c);
                        i += 1;
                    }
                }
            }
        }
    }

    ScannedLine { code, saw_comment }
}

fn starts_with_at(chars: &[char], i: usize, pat: &str) -> bool {
    let mut k = i;
    for p in pat.chars() {
        if chars.get(k) != Some(&p) {
            return false;
        }
        k += 1;
    }
    true
}

fn triple_at(chars: &[char], i: usize, q: char) -> bool {
    chars.get(i + 1) == Some(&q) && chars.get(i + 2) == Some(&q)
}

fn push_blank(code: &mut String, n: usize) {
    code.extend(std::iter::repeat(' ').take(n));
}

/// Blank a single-line string starting at `i`; returns the index after the
/// closing quote (or the end of the line when unterminated).
fn blank_string(chars: &[char], i: usize, quote: char, code: &mut String) -> usize {
    code.push(quote);
    let mut k = i + 1;
    while k < chars.len() {
        if chars[k] == '\\' && k + 1 < chars.len() {
            push_blank(code, 2);
            k += 2;
            continue;
        }
        if chars[k] == quote {
            code.push(quote);
            return k + 1;
        }
        push_blank(code, 1);
        k += 1;
    }
    k
}

/// Length of a char literal (`'x'`, `'\n'`) at `i`, or 0 when the quote
/// does not open one.
fn char_literal_len(chars: &[char], i: usize) -> usize {
    match (chars.get(i + 1), chars.get(i + 2), chars.get(i + 3)) {
        (Some('\\'), Some(_), Some('\'')) => 4,
        (Some(c), Some('\''), _) if *c != '\'' => 3,
        _ => 0,
    }
}

fn indent_width(raw: &str) -> usize {
    raw.chars()
        .take_while(|c| c.is_whitespace())
        .map(|c| if c == '\t' { 4 } else { 1 })
        .sum()
}

fn assign_indentation_depth(lines: &mut [SourceLine]) {
    let unit = lines
        .iter()
        .filter(|l| l.is_code() && l.indent > 0)
        .map(|l| l.indent)
        .min()
        .unwrap_or(4)
        .max(1);

    let mut current = 0usize;
    for line in lines.iter_mut() {
        if line.is_code() {
            current = line.indent / unit;
        }
        line.depth = current;
        line.depth_after = current;
        line.peak = current;
        line.trough = current;
    }
}

/// Identifier tokens in `code` with their byte offsets. `$` is treated as
/// a separator so `$name` and `name` are the same identifier.
pub fn identifiers(code: &str) -> impl Iterator<Item = (usize, &str)> {
    let mut chars = code.char_indices().peekable();
    std::iter::from_fn(move || {
        while let Some((start, c)) = chars.next() {
            if c.is_alphabetic() || c == '_' {
                let mut end = start + c.len_utf8();
                while let Some(&(i, n)) = chars.peek() {
                    if n.is_alphanumeric() || n == '_' {
                        end = i + n.len_utf8();
                        chars.next();
                    } else {
                        break;
                    }
                }
                return Some((start, &code[start..end]));
            }
            if c.is_ascii_digit() {
                // Skip the rest of a numeric literal (`0x1f`, `10u32`).
                while let Some(&(_, n)) = chars.peek() {
                    if n.is_alphanumeric() || n == '_' || n == '.' {
                        chars.next();
                    } else {
                        break;
                    }
                }
            }
        }
        None
    })
}

/// Whether `word` appears in `code` as a whole identifier.
pub fn has_token(code: &str, word: &str) -> bool {
    identifiers(code).any(|(_, t)| t == word)
}
