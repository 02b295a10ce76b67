use super::count_spaces;
use crate::parsing::blocks::types::{ContainerKind, ListItem};

/// A list marker recognized at the current position of a line.
///
/// Offsets are absolute byte offsets into the expanded line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListItemStart {
    pub kind: ContainerKind,
    /// The item number for ordered markers.
    pub number: Option<u64>,
    pub marker_offset: usize,
    pub marker_end: usize,
    /// End of the text consumed together with the marker: the marker plus
    /// the spaces that belong to it.
    pub consumed_end: usize,
    /// Spaces required, after the enclosing prefix, to continue the item.
    pub content_indent: usize,
    /// Nothing but spaces follow the marker.
    pub empty: bool,
}

impl ListItemStart {
    pub const BULLETS: [u8; 3] = [b'-', b'+', b'*'];
    pub const DELIMITERS: [u8; 2] = [b'.', b')'];
    pub const MAX_DIGITS: usize = 9;
    /// More spaces than this after a marker make the content indented code.
    pub const MAX_MARKER_SPACES: usize = 4;

    /// Detects a list marker at `offset`, after at most three spaces.
    pub fn detect(text: &str, offset: usize) -> Option<Self> {
        let indent = count_spaces(text, offset);
        if indent > 3 {
            return None;
        }
        let bytes = text.as_bytes();
        let marker_offset = offset + indent;
        let first = *bytes.get(marker_offset)?;

        let (kind, number, marker_end) = if Self::BULLETS.contains(&first) {
            (
                ContainerKind::UnorderedList {
                    bullet: first as char,
                },
                None,
                marker_offset + 1,
            )
        } else {
            let digits = bytes[marker_offset..]
                .iter()
                .take_while(|b| b.is_ascii_digit())
                .count();
            if digits == 0 || digits > Self::MAX_DIGITS {
                return None;
            }
            let delimiter = *bytes.get(marker_offset + digits)?;
            if !Self::DELIMITERS.contains(&delimiter) {
                return None;
            }
            let number = text[marker_offset..marker_offset + digits].parse::<u64>().ok()?;
            (
                ContainerKind::OrderedList {
                    start: number,
                    delimiter: delimiter as char,
                },
                Some(number),
                marker_offset + digits + 1,
            )
        };

        let spaces = count_spaces(text, marker_end);
        let marker_width = marker_end - offset;
        let (consumed_end, content_indent, empty) = if marker_end + spaces >= text.len() {
            (marker_end, marker_width + 1, true)
        } else if spaces == 0 {
            return None;
        } else if spaces <= Self::MAX_MARKER_SPACES {
            (marker_end + spaces, marker_width + spaces, false)
        } else {
            (marker_end + 1, marker_width + 1, false)
        };

        Some(Self {
            kind,
            number,
            marker_offset,
            marker_end,
            consumed_end,
            content_indent,
            empty,
        })
    }

    /// An empty item never interrupts a paragraph, and an ordered one only
    /// when it starts at 1.
    #[must_use]
    pub fn can_interrupt_paragraph(&self) -> bool {
        !self.empty && self.number.is_none_or(|n| n == 1)
    }

    /// The item state for a list frame, given the offset detection began at.
    #[must_use]
    pub fn list_item(&self, offset: usize) -> ListItem {
        ListItem {
            marker_offset: self.marker_offset,
            content_offset: offset + self.content_indent,
            content_indent: self.content_indent,
            content_pending: self.empty,
            has_content: false,
            closed: false,
        }
    }
}
