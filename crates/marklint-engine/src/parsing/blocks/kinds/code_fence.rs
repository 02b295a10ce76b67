use super::count_spaces;
use crate::parsing::blocks::types::LeafKind;

/// An opening code fence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FenceOpen {
    /// `` ` `` or `~`.
    pub fence: char,
    /// Length of the opening run; the closing run must be at least as long.
    pub length: usize,
    /// Spaces before the opening fence; stripped from content lines.
    pub indent: usize,
    /// Trimmed info string.
    pub info: String,
}

impl FenceOpen {
    pub fn leaf_kind(&self) -> LeafKind {
        LeafKind::FencedCode {
            fence: self.fence,
            length: self.length,
            info: self.info.clone(),
        }
    }
}

pub struct CodeFence;

impl CodeFence {
    pub const BACKTICK: char = '`';
    pub const TILDE: char = '~';
    pub const MIN_LENGTH: usize = 3;

    /// Recognizes an opening fence in a line remainder.
    pub fn open(rest: &str) -> Option<FenceOpen> {
        let indent = count_spaces(rest, 0);
        if indent > 3 {
            return None;
        }
        let body = &rest[indent..];
        let fence = body.chars().next()?;
        if fence != Self::BACKTICK && fence != Self::TILDE {
            return None;
        }
        let length = body.chars().take_while(|&c| c == fence).count();
        if length < Self::MIN_LENGTH {
            return None;
        }
        let info = body[length..].trim_matches(' ');
        if fence == Self::BACKTICK && info.contains(Self::BACKTICK) {
            return None;
        }
        Some(FenceOpen {
            fence,
            length,
            indent,
            info: info.to_string(),
        })
    }

    /// Whether `rest` closes the fence opened by `open`.
    pub fn closes(open: &FenceOpen, rest: &str) -> bool {
        let indent = count_spaces(rest, 0);
        if indent > 3 {
            return false;
        }
        let body = &rest[indent..];
        let length = body.chars().take_while(|&c| c == open.fence).count();
        length >= open.length && body[length..].bytes().all(|b| b == b' ')
    }
}
