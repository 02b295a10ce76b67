use super::kinds::{
    AtxHeading, CODE_INDENT, CodeFence, FenceOpen, SetextUnderline, ThematicBreak, count_spaces,
};

/// Classification of the unconsumed remainder of a line, made after the
/// container prefix has been matched and new containers opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeafClass {
    Blank,
    SetextUnderline(u8),
    /// Four or more spaces of indentation: indented code, or paragraph text
    /// when a paragraph is open.
    Indented,
    ThematicBreak,
    AtxHeading(AtxHeading),
    FenceOpen(FenceOpen),
    Text,
}

impl LeafClass {
    /// Whether the remainder would be ordinary text when a paragraph is open,
    /// the condition for a lazy continuation line.
    #[must_use]
    pub fn continues_paragraph(&self) -> bool {
        matches!(self, LeafClass::Indented | LeafClass::Text)
    }
}

/// Classifies leaf remainders; first match wins.
pub struct MarkdownLineClassifier;

impl MarkdownLineClassifier {
    /// `paragraph_open` enables setext underlines, which only exist directly
    /// below a paragraph line in the same container.
    pub fn classify(&self, rest: &str, paragraph_open: bool) -> LeafClass {
        let indent = count_spaces(rest, 0);
        if indent == rest.len() {
            return LeafClass::Blank;
        }
        if indent >= CODE_INDENT {
            return LeafClass::Indented;
        }
        if paragraph_open && let Some(level) = SetextUnderline::level(rest) {
            return LeafClass::SetextUnderline(level);
        }
        if let Some(heading) = AtxHeading::parse(rest) {
            return LeafClass::AtxHeading(heading);
        }
        if ThematicBreak::matches(rest) {
            return LeafClass::ThematicBreak;
        }
        if let Some(open) = CodeFence::open(rest) {
            return LeafClass::FenceOpen(open);
        }
        LeafClass::Text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn classify(rest: &str, paragraph_open: bool) -> LeafClass {
        MarkdownLineClassifier.classify(rest, paragraph_open)
    }

    #[test]
    fn blank_and_indented() {
        assert_eq!(classify("", false), LeafClass::Blank);
        assert_eq!(classify("   ", true), LeafClass::Blank);
        assert_eq!(classify("    code", false), LeafClass::Indented);
        assert_eq!(classify("    ---", true), LeafClass::Indented);
    }

    #[test]
    fn dashes_are_setext_only_below_a_paragraph() {
        assert_eq!(classify("---", true), LeafClass::SetextUnderline(2));
        assert_eq!(classify("---", false), LeafClass::ThematicBreak);
        assert_eq!(classify("===", false), LeafClass::Text);
    }

    #[test]
    fn spaced_dashes_are_a_break_even_below_a_paragraph() {
        assert_eq!(classify("- - -", true), LeafClass::ThematicBreak);
    }

    #[rstest]
    #[case("# title")]
    #[case("###")]
    fn headings(#[case] rest: &str) {
        assert!(matches!(classify(rest, true), LeafClass::AtxHeading(_)));
    }

    #[test]
    fn fences_and_text() {
        assert!(matches!(classify("```", true), LeafClass::FenceOpen(_)));
        assert_eq!(classify("#hashtag", false), LeafClass::Text);
        assert!(classify("plain", true).continues_paragraph());
        assert!(classify("     > item", true).continues_paragraph());
        assert!(!classify("***", true).continues_paragraph());
    }
}
