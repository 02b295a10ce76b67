pub mod block_quote;
pub mod code_fence;
pub mod heading;
pub mod list_item;
pub mod paragraph;
pub mod thematic_break;

pub use block_quote::BlockQuote;
pub use code_fence::{CodeFence, FenceOpen};
pub use heading::{AtxHeading, SetextUnderline};
pub use list_item::ListItemStart;
pub use paragraph::Paragraph;
pub use thematic_break::ThematicBreak;

/// Indentation (beyond the container prefix) that turns a line into code.
pub const CODE_INDENT: usize = 4;

/// Counts spaces in `text` starting at byte `offset`.
///
/// Lines are tab-expanded before block parsing, so spaces are the only
/// indentation left to count.
pub fn count_spaces(text: &str, offset: usize) -> usize {
    text.as_bytes()
        .get(offset..)
        .map_or(0, |rest| rest.iter().take_while(|&&b| b == b' ').count())
}

/// Whether `text` from `offset` holds nothing but spaces.
pub fn is_blank_from(text: &str, offset: usize) -> bool {
    offset + count_spaces(text, offset) >= text.len()
}
