use xi_rope::Rope;

use super::span::Span;

/// Default tab stop, as used by CommonMark for container arithmetic.
pub const DEFAULT_TAB_WIDTH: usize = 4;

/// One physical line of the document.
///
/// Block parsing works on `expanded`, where every tab has been replaced by
/// spaces up to the next tab stop. Reported columns always refer back to the
/// original line through [`SourceLine::original_column`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    /// 1-based line number.
    pub number: usize,
    /// Byte span of this line in the rope (includes the line ending).
    pub span: Span,
    /// Original line text without its line ending.
    pub text: String,
    /// The line ending: `"\n"`, `"\r\n"` or empty for a final unterminated line.
    pub ending: String,
    /// Line text with tabs expanded to spaces.
    pub expanded: String,
    /// Original 1-based column for every byte offset of `expanded`, plus one
    /// trailing entry for the end-of-line position.
    columns: Vec<usize>,
}

impl SourceLine {
    /// Builds a line from its raw text (line ending included, if any).
    pub fn new(number: usize, span: Span, raw: &str, tab_width: usize) -> Self {
        let (text, ending) = split_line_ending(raw);
        let (expanded, columns) = expand_tabs(text, tab_width);
        Self {
            number,
            span,
            text: text.to_string(),
            ending: ending.to_string(),
            expanded,
            columns,
        }
    }

    /// Maps a byte offset in `expanded` to the original 1-based column.
    ///
    /// Offsets past the end clamp to the end-of-line column.
    #[must_use]
    pub fn original_column(&self, offset: usize) -> usize {
        let last = self.columns.len() - 1;
        self.columns[offset.min(last)]
    }

    /// Column just past the last character of the original line.
    #[must_use]
    pub fn end_column(&self) -> usize {
        self.original_column(self.expanded.len())
    }

    /// Byte offset in the document of the original 1-based `column`, clamped
    /// to the end of the line text.
    #[must_use]
    pub fn document_offset(&self, column: usize) -> usize {
        let within = self
            .text
            .char_indices()
            .nth(column.saturating_sub(1))
            .map_or(self.text.len(), |(index, _)| index);
        self.span.start + within
    }

    #[must_use]
    pub fn has_tabs(&self) -> bool {
        self.text.contains('\t')
    }
}

fn split_line_ending(raw: &str) -> (&str, &str) {
    if let Some(text) = raw.strip_suffix("\r\n") {
        (text, "\r\n")
    } else if let Some(text) = raw.strip_suffix('\n') {
        (text, "\n")
    } else {
        (raw, "")
    }
}

/// Expands tabs to the next multiple of `tab_width`, returning the expanded
/// text and the column map described on [`SourceLine`].
pub fn expand_tabs(text: &str, tab_width: usize) -> (String, Vec<usize>) {
    let tab_width = tab_width.max(1);
    let mut expanded = String::with_capacity(text.len());
    let mut columns = Vec::with_capacity(text.len() + 1);
    let mut visual = 0usize;

    for (index, ch) in text.chars().enumerate() {
        let original = index + 1;
        if ch == '\t' {
            let width = tab_width - (visual % tab_width);
            for _ in 0..width {
                expanded.push(' ');
                columns.push(original);
            }
            visual += width;
        } else {
            expanded.push(ch);
            for _ in 0..ch.len_utf8() {
                columns.push(original);
            }
            visual += 1;
        }
    }
    columns.push(text.chars().count() + 1);
    (expanded, columns)
}

/// Returns an iterator over the lines of the rope with their byte spans.
///
/// Uses `lines_raw` to keep line endings, so spans tile the rope exactly.
pub fn lines_with_spans(rope: &Rope, tab_width: usize) -> impl Iterator<Item = SourceLine> + '_ {
    let mut offset = 0usize;
    rope.lines_raw(..).enumerate().map(move |(index, line)| {
        let start = offset;
        offset += line.len();
        SourceLine::new(index + 1, Span { start, end: offset }, &line, tab_width)
    })
}

/// The whole document as materialized source lines.
#[derive(Debug, Clone, Default)]
pub struct SourceBuffer {
    lines: Vec<SourceLine>,
}

impl SourceBuffer {
    pub fn from_rope(rope: &Rope, tab_width: usize) -> Self {
        Self {
            lines: lines_with_spans(rope, tab_width).collect(),
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(text: &str, tab_width: usize) -> Self {
        Self::from_rope(&Rope::from(text), tab_width)
    }

    pub fn lines(&self) -> &[SourceLine] {
        &self.lines
    }

    /// Returns the 1-based line `number`, if present.
    pub fn line(&self, number: usize) -> Option<&SourceLine> {
        number.checked_sub(1).and_then(|i| self.lines.get(i))
    }

    /// Byte offset in the document of a 1-based `(line, column)` position.
    pub fn offset_of(&self, line_number: usize, column: usize) -> Option<usize> {
        self.line(line_number).map(|line| line.document_offset(column))
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
