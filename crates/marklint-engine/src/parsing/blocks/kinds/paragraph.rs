use super::count_spaces;

/// Paragraph block type.
///
/// Paragraphs have no delimiters; they are the default leaf block when no
/// other block opener matches.
pub struct Paragraph;

impl Paragraph {
    /// The text a paragraph line contributes: leading indentation removed.
    pub fn line_text(rest: &str) -> &str {
        &rest[count_spaces(rest, 0)..]
    }
}
