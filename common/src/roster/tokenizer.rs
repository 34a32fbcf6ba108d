//! Line-oriented CSV tokenizer.
//!
//! The file is normalized to LF line endings and split into physical lines
//! first; every line is then parsed on its own. A quoted cell therefore cannot
//! span several lines: an unterminated quote simply ends with its line.

use crate::error::RosterError;

/// One physical line of the file and its cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// 1-based physical line number.
    pub number: u32,
    pub cells: Vec<String>,
}

impl Line {
    /// True when every cell is empty after trimming.
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|cell| cell.trim().is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QuoteState {
    Unquoted,
    Quoted,
}

/// Decodes raw upload bytes into text.
///
/// A leading UTF-8 BOM is dropped. Invalid UTF-8 and NUL characters
/// (binary files renamed to `.csv`) are rejected as a whole.
pub fn decode(bytes: &[u8]) -> Result<&str, RosterError> {
    let text = std::str::from_utf8(bytes).map_err(|err| {
        RosterError::Unreadable(format!("invalid UTF-8 at byte {}", err.valid_up_to()))
    })?;
    if text.contains('\0') {
        return Err(RosterError::Unreadable("the file contains binary data".into()));
    }
    Ok(text.strip_prefix('\u{feff}').unwrap_or(text))
}

/// Splits text into physical lines (CRLF, CR and LF all end a line) and parses each one.
///
/// A final line terminator does not produce an extra empty line.
pub fn tokenize(text: &str) -> Vec<Line> {
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
    let mut raw_lines: Vec<&str> = normalized.split('\n').collect();
    if raw_lines.last() == Some(&"") {
        raw_lines.pop();
    }

    raw_lines
        .into_iter()
        .enumerate()
        .map(|(idx, raw)| Line {
            number: (idx + 1) as u32,
            cells: parse_line(raw),
        })
        .collect()
}

/// Parses a single line into cells.
///
/// `,` outside quotes ends a cell, `"` toggles the quote state and `""` inside
/// quotes yields one literal `"`. Everything else is copied as-is, including
/// surrounding whitespace.
pub fn parse_line(line: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut cell = String::new();
    let mut state = QuoteState::Unquoted;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match (state, ch) {
            (QuoteState::Quoted, '"') if chars.peek() == Some(&'"') => {
                chars.next();
                cell.push('"');
            }
            (QuoteState::Quoted, '"') => state = QuoteState::Unquoted,
            (QuoteState::Unquoted, '"') => state = QuoteState::Quoted,
            (QuoteState::Unquoted, ',') => cells.push(std::mem::take(&mut cell)),
            (_, other) => cell.push(other),
        }
    }
    cells.push(cell);
    cells
}
