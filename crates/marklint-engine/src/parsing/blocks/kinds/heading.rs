use super::count_spaces;

/// A recognized ATX heading line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtxHeading {
    pub level: u8,
    /// Offset in the remainder where the heading content begins, after the
    /// opening hashes and the spaces that follow them.
    pub content_start: usize,
    /// Heading text with the optional closing sequence removed.
    pub text: String,
}

impl AtxHeading {
    pub const MARKER: char = '#';
    pub const MAX_LEVEL: usize = 6;

    pub fn parse(rest: &str) -> Option<Self> {
        let indent = count_spaces(rest, 0);
        if indent > 3 {
            return None;
        }
        let body = &rest[indent..];
        let level = body.chars().take_while(|&c| c == Self::MARKER).count();
        if level == 0 || level > Self::MAX_LEVEL {
            return None;
        }
        let after = &body[level..];
        if !after.is_empty() && !after.starts_with(' ') {
            return None;
        }
        let content_start = indent + level + count_spaces(after, 0);
        Some(Self {
            level: level as u8,
            content_start,
            text: strip_closing_sequence(&rest[content_start..]).to_string(),
        })
    }
}

fn strip_closing_sequence(raw: &str) -> &str {
    let raw = raw.trim_end_matches(' ');
    let without_hashes = raw.trim_end_matches(AtxHeading::MARKER);
    if without_hashes.is_empty() {
        ""
    } else if without_hashes.len() < raw.len() && without_hashes.ends_with(' ') {
        without_hashes.trim_end_matches(' ')
    } else {
        raw
    }
}

/// A setext underline: a run of `=` (level 1) or `-` (level 2).
pub struct SetextUnderline;

impl SetextUnderline {
    pub fn level(rest: &str) -> Option<u8> {
        let indent = count_spaces(rest, 0);
        if indent > 3 {
            return None;
        }
        let body = rest[indent..].trim_end_matches(' ');
        let first = body.chars().next()?;
        let level = match first {
            '=' => 1,
            '-' => 2,
            _ => return None,
        };
        body.chars().all(|c| c == first).then_some(level)
    }
}
