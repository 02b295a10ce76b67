use super::count_spaces;

/// Blockquote block type with owned delimiter constant.
///
/// All blockquote syntax knowledge lives here, not scattered in matcher code.
pub struct BlockQuote;

impl BlockQuote {
    /// The blockquote prefix character.
    pub const PREFIX: char = '>';

    /// Matches one blockquote marker starting at `offset`.
    ///
    /// Allows up to three spaces before the `>` and consumes one optional
    /// space after it. Returns the offset just past the consumed text.
    pub fn match_marker(text: &str, offset: usize) -> Option<usize> {
        let indent = count_spaces(text, offset);
        if indent > 3 {
            return None;
        }
        let at = offset + indent;
        if text.as_bytes().get(at) != Some(&(Self::PREFIX as u8)) {
            return None;
        }
        let after = at + 1;
        if text.as_bytes().get(after) == Some(&b' ') {
            Some(after + 1)
        } else {
            Some(after)
        }
    }
}
