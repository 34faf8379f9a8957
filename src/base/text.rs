//! Text helpers for node labels: hit previews, search terms, match counts.

use std::ops::Range;

use smol_str::SmolStr;

use super::span::{LineIndex, Position, Span};

/// Characters of context shown before a hit.
pub const PREVIEW_BEFORE_CHARS: usize = 8;
/// Characters of context shown after a hit.
pub const PREVIEW_AFTER_CHARS: usize = 331;

/// A display label with an optional emphasized sub-range.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Label {
    pub text: SmolStr,
    /// Byte range into `text` to highlight (the matched term)
    pub highlight: Option<Range<usize>>,
}

impl Label {
    /// A label without highlight.
    pub fn plain(text: impl Into<SmolStr>) -> Self {
        Self {
            text: text.into(),
            highlight: None,
        }
    }

    /// The highlighted part of the label, if any.
    pub fn highlighted(&self) -> Option<&str> {
        self.highlight.clone().and_then(|r| self.text.get(r))
    }
}

impl From<&str> for Label {
    fn from(text: &str) -> Self {
        Self::plain(text)
    }
}

/// The text around a hit, split into context and matched parts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreviewChunks<'a> {
    pub before: &'a str,
    pub inside: &'a str,
    pub after: &'a str,
}

impl PreviewChunks<'_> {
    /// Join the chunks into a label highlighting the matched part.
    pub fn to_label(&self) -> Label {
        let mut text = String::with_capacity(self.before.len() + self.inside.len() + self.after.len());
        text.push_str(self.before);
        text.push_str(self.inside);
        text.push_str(self.after);
        let start = self.before.len();
        Label {
            text: SmolStr::from(text),
            highlight: Some(start..start + self.inside.len()),
        }
    }
}

/// A document's text together with its line index.
#[derive(Clone, Debug)]
pub struct DocumentText<'a> {
    text: &'a str,
    index: LineIndex,
}

impl<'a> DocumentText<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            index: LineIndex::new(text),
        }
    }

    /// The text of a line without its terminator.
    pub fn line(&self, line: u32) -> Option<&'a str> {
        self.index.line(self.text, line)
    }

    /// The text covered by `span`, clamped to the document.
    pub fn slice(&self, span: Span) -> Option<&'a str> {
        let start = usize::from(self.index.offset(self.text, span.start)?);
        let end = self
            .index
            .offset(self.text, span.end)
            .map(usize::from)
            .unwrap_or(self.text.len());
        self.text.get(start..end.max(start))
    }

    /// Split the text around `span` into preview chunks.
    ///
    /// The leading context starts up to [`PREVIEW_BEFORE_CHARS`] characters
    /// before the hit, moved back to the start of the word it lands in, and has
    /// its leading whitespace trimmed. The trailing context runs up to
    /// [`PREVIEW_AFTER_CHARS`] characters along the end line with trailing
    /// whitespace trimmed.
    pub fn preview(&self, span: Span) -> Option<PreviewChunks<'a>> {
        let start_line = self.line(span.start.line)?;
        let hit_start = char_to_byte(start_line, span.start.character as usize);
        let context_start = char_to_byte(
            start_line,
            (span.start.character as usize).saturating_sub(PREVIEW_BEFORE_CHARS),
        );
        let context_start = word_start(start_line, context_start);
        let before = start_line[context_start..hit_start].trim_start();

        let inside = self.slice(span)?;

        let end_line = self.line(span.end.line)?;
        let hit_end = char_to_byte(end_line, span.end.character as usize);
        let after_end = char_to_byte(
            end_line,
            span.end.character as usize + PREVIEW_AFTER_CHARS,
        );
        let after = end_line[hit_end..after_end].trim_end();

        Some(PreviewChunks {
            before,
            inside,
            after,
        })
    }

    /// The word under `pos`, falling back to the run of non-whitespace
    /// characters around it.
    pub fn word_at(&self, pos: Position) -> Option<&'a str> {
        let line = self.line(pos.line)?;
        let at = char_to_byte(line, pos.character as usize);

        word_range(line, at, is_word_char)
            .or_else(|| word_range(line, at, |c| !c.is_whitespace()))
            .map(|r| &line[r])
    }
}

/// `"1 match"` or `"<n> matches"`.
pub fn match_description(count: usize) -> String {
    if count == 1 {
        "1 match".to_string()
    } else {
        format!("{count} matches")
    }
}

fn is_word_char(c: char) -> bool {
    unicode_ident::is_xid_continue(c) || c == '$'
}

/// Byte offset of character `chars` in `line`, clamped to the line end.
fn char_to_byte(line: &str, chars: usize) -> usize {
    line.char_indices()
        .nth(chars)
        .map(|(i, _)| i)
        .unwrap_or(line.len())
}

/// Move `at` back to the start of the word that contains or ends at it.
fn word_start(line: &str, at: usize) -> usize {
    line[..at]
        .char_indices()
        .rev()
        .take_while(|&(_, c)| is_word_char(c))
        .last()
        .map(|(i, _)| i)
        .unwrap_or(at)
}

/// The maximal run of `pred` characters touching byte offset `at`.
fn word_range(line: &str, at: usize, pred: impl Fn(char) -> bool) -> Option<Range<usize>> {
    let start = line[..at]
        .char_indices()
        .rev()
        .take_while(|&(_, c)| pred(c))
        .last()
        .map(|(i, _)| i)
        .unwrap_or(at);
    let end = line[at..]
        .char_indices()
        .find(|&(_, c)| !pred(c))
        .map(|(i, _)| at + i)
        .unwrap_or(line.len());
    (start < end).then_some(start..end)
}
