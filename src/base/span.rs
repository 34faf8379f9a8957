//! Source positions, spans and line lookup.

use std::cmp::Ordering;
use std::fmt;

use text_size::TextSize;

/// A line and character position in a resource.
///
/// Both line and character are 0-indexed internally, but displayed as 1-indexed.
/// Characters count Unicode scalar values within the line.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct Position {
    /// 0-indexed line number
    pub line: u32,
    /// 0-indexed character offset within the line
    pub character: u32,
}

impl Position {
    /// Create a new position.
    #[inline]
    pub const fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }

    /// Get 1-indexed line number (for display).
    #[inline]
    pub const fn line_one_indexed(self) -> u32 {
        self.line + 1
    }

    /// Get 1-indexed column number (for display).
    #[inline]
    pub const fn col_one_indexed(self) -> u32 {
        self.character + 1
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        self.line
            .cmp(&other.line)
            .then(self.character.cmp(&other.character))
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line_one_indexed(), self.col_one_indexed())
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line_one_indexed(), self.col_one_indexed())
    }
}

/// A start/end position pair within a resource.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    /// Create a new span. `start` is expected to not come after `end`.
    #[inline]
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Shorthand for a span from four 0-indexed coordinates.
    #[inline]
    pub const fn from_coords(start_line: u32, start_col: u32, end_line: u32, end_col: u32) -> Self {
        Self {
            start: Position::new(start_line, start_col),
            end: Position::new(end_line, end_col),
        }
    }

    /// Whether `other` lies entirely inside this span (bounds inclusive).
    #[inline]
    pub fn contains(&self, other: &Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// The four coordinates `[start_line, start_col, end_line, end_col]`.
    #[inline]
    pub const fn coords(&self) -> [u32; 4] {
        [
            self.start.line,
            self.start.character,
            self.end.line,
            self.end.character,
        ]
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}-{:?}", self.start, self.end)
    }
}

/// Index for converting line/character positions to byte offsets.
#[derive(Clone, Debug)]
pub struct LineIndex {
    /// Byte offset of the start of each line
    line_starts: Vec<TextSize>,
    /// Total length of the indexed text
    len: TextSize,
}

impl LineIndex {
    /// Build a line index from source text.
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![TextSize::from(0)];

        for (offset, c) in text.char_indices() {
            if c == '\n' {
                line_starts.push(TextSize::from((offset + 1) as u32));
            }
        }

        Self {
            line_starts,
            len: TextSize::from(text.len() as u32),
        }
    }

    /// The text of line `line` without its line terminator.
    pub fn line<'a>(&self, text: &'a str, line: u32) -> Option<&'a str> {
        let start = usize::from(*self.line_starts.get(line as usize)?);
        let end = self
            .line_starts
            .get(line as usize + 1)
            .map(|&s| usize::from(s) - 1)
            .unwrap_or_else(|| usize::from(self.len));
        let line_text = text.get(start..end)?;
        Some(line_text.strip_suffix('\r').unwrap_or(line_text))
    }

    /// Convert a position to a byte offset.
    ///
    /// Characters past the end of the line clamp to the line end; lines past
    /// the end of the text yield `None`.
    pub fn offset(&self, text: &str, pos: Position) -> Option<TextSize> {
        let line_start = *self.line_starts.get(pos.line as usize)?;
        let line_text = self.line(text, pos.line)?;
        let within = line_text
            .char_indices()
            .nth(pos.character as usize)
            .map(|(i, _)| i)
            .unwrap_or(line_text.len());
        Some(line_start + TextSize::from(within as u32))
    }

    /// Get the number of lines.
    pub fn len(&self) -> usize {
        self.line_starts.len()
    }

    /// Check if there are no lines.
    pub fn is_empty(&self) -> bool {
        self.line_starts.is_empty()
    }
}
