//! Source positions attached to syntax nodes.
//!
//! Lines are 1-based and columns are 0-based, the convention used by
//! ESTree-producing parsers.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

/// A start/end span in the original source text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    pub start: Position,
    pub end: Position,
}

impl SourceLocation {
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// A span covering `[start_col, end_col)` of a single line.
    pub const fn on_line(line: u32, start_col: u32, end_col: u32) -> Self {
        Self {
            start: Position::new(line, start_col),
            end: Position::new(line, end_col),
        }
    }

    #[inline]
    pub fn line(&self) -> u32 {
        self.start.line
    }

    /// Extract the text covered by this span from the source lines.
    ///
    /// Returns an empty string when the span does not fit the text.
    pub fn snippet(&self, lines: &[&str]) -> String {
        let start_line = self.start.line as usize;
        let end_line = self.end.line as usize;
        if start_line == 0 || end_line < start_line || end_line > lines.len() {
            return String::new();
        }

        let first = lines[start_line - 1];
        if start_line == end_line {
            return slice_columns(first, self.start.column as usize, self.end.column as usize)
                .to_string();
        }

        let mut segments = vec![slice_columns(first, self.start.column as usize, first.len())];
        for line in &lines[start_line..end_line - 1] {
            segments.push(line);
        }
        let last = lines[end_line - 1];
        segments.push(slice_columns(last, 0, self.end.column as usize));
        segments.join("\n")
    }
}

fn slice_columns(line: &str, start: usize, end: usize) -> &str {
    let end = end.min(line.len());
    let start = start.min(end);
    line.get(start..end).unwrap_or("")
}
