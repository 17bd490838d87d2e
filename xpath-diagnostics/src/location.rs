//! Text ranges and display positions within an XPath expression

use std::fmt;

/// A half-open byte range `[start, end)` in the source text.
///
/// XPath expressions are single strings (usually embedded in an XML
/// attribute), so ranges are tracked as byte offsets; [`Position`] converts
/// an offset to a line/column pair for display when the host embeds the
/// expression in a larger document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextRange {
    /// Start offset in bytes (inclusive)
    pub start: usize,
    /// End offset in bytes (exclusive)
    pub end: usize,
}

impl TextRange {
    /// Create a new range.
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Create an empty range anchored at `offset`.
    pub const fn empty_at(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    /// Length of the range in bytes.
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the range is empty.
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether `offset` falls inside the range (end is exclusive).
    pub const fn contains(&self, offset: usize) -> bool {
        offset >= self.start && offset < self.end
    }

    /// Smallest range covering both `self` and `other`.
    pub fn cover(&self, other: TextRange) -> TextRange {
        TextRange {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// The slice of `source` addressed by this range.
    ///
    /// Returns an empty string when the range is out of bounds rather than
    /// panicking; ranges always come from the lexer and stay in bounds for
    /// the text they were produced from.
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        source.get(self.start..self.end).unwrap_or("")
    }
}

impl fmt::Display for TextRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// A line/column pair (0-indexed) for display purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    /// Line number (0-indexed)
    pub line: usize,
    /// Column number (0-indexed, in bytes)
    pub column: usize,
}

impl Position {
    /// Create a new position.
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Compute the position of a byte offset in `source`.
    pub fn from_offset(source: &str, offset: usize) -> Self {
        let mut line = 0;
        let mut column = 0;
        let mut current = 0;

        for ch in source.chars() {
            if current >= offset {
                break;
            }
            if ch == '\n' {
                line += 1;
                column = 0;
            } else {
                column += ch.len_utf8();
            }
            current += ch.len_utf8();
        }

        Self { line, column }
    }

    /// Convert to a 1-indexed pair for user-facing output.
    pub const fn to_display(self) -> (usize, usize) {
        (self.line + 1, self.column + 1)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (line, col) = self.to_display();
        write!(f, "{}:{}", line, col)
    }
}
