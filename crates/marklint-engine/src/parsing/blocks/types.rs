use serde::Serialize;

/// The public identity of a container, as carried by start/end tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContainerKind {
    BlockQuote,
    OrderedList {
        /// Number of the first item in the list.
        start: u64,
        /// `.` or `)`.
        delimiter: char,
    },
    UnorderedList {
        /// `-`, `+` or `*`.
        bullet: char,
    },
}

impl ContainerKind {
    #[must_use]
    pub fn is_list(self) -> bool {
        !matches!(self, ContainerKind::BlockQuote)
    }

    /// Whether an item of `other` continues a list of this kind.
    ///
    /// Ordered lists must share the delimiter, bullet lists the bullet
    /// character; the start number is irrelevant.
    #[must_use]
    pub fn same_list_type(self, other: ContainerKind) -> bool {
        match (self, other) {
            (
                ContainerKind::OrderedList { delimiter: a, .. },
                ContainerKind::OrderedList { delimiter: b, .. },
            ) => a == b,
            (
                ContainerKind::UnorderedList { bullet: a },
                ContainerKind::UnorderedList { bullet: b },
            ) => a == b,
            _ => false,
        }
    }

    /// Short name used in token dumps (`block-quote`, `olist`, `ulist`).
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            ContainerKind::BlockQuote => "block-quote",
            ContainerKind::OrderedList { .. } => "olist",
            ContainerKind::UnorderedList { .. } => "ulist",
        }
    }
}

/// Geometry and state of the current item of an open list.
///
/// Offsets are 0-based byte offsets into the tab-expanded line, which equal
/// expanded columns in the whitespace-and-marker region they describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListItem {
    /// Offset of the marker's first character on the line that opened it.
    pub marker_offset: usize,
    /// Absolute offset of the item's content on the opening line.
    pub content_offset: usize,
    /// Spaces required after the enclosing containers' prefix for a line to
    /// continue this item.
    pub content_indent: usize,
    /// The item opened with nothing after its marker; its content column is
    /// fixed by the first non-blank line placed inside it.
    pub content_pending: bool,
    /// Something other than blank lines has been placed in the item.
    pub has_content: bool,
    /// The item met a blank line before any content. It still holds blank
    /// lines and lets a sibling marker continue the list, but takes no more
    /// content.
    pub closed: bool,
}

impl ListItem {
    /// Records that the item received content, committing a pending column.
    pub fn mark_content(&mut self) {
        self.has_content = true;
        self.content_pending = false;
    }

    /// Closes the item if it is still empty.
    pub fn close_if_empty(&mut self) {
        if !self.has_content {
            self.closed = true;
        }
    }
}

/// A frame in the container stack representing one nesting level.
///
/// Containers wrap leaf blocks and can nest arbitrarily.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerFrame {
    BlockQuote,
    OrderedList {
        start: u64,
        delimiter: char,
        item: ListItem,
    },
    UnorderedList {
        bullet: char,
        item: ListItem,
    },
}

impl ContainerFrame {
    #[must_use]
    pub fn kind(&self) -> ContainerKind {
        match *self {
            ContainerFrame::BlockQuote => ContainerKind::BlockQuote,
            ContainerFrame::OrderedList {
                start, delimiter, ..
            } => ContainerKind::OrderedList { start, delimiter },
            ContainerFrame::UnorderedList { bullet, .. } => ContainerKind::UnorderedList { bullet },
        }
    }

    #[must_use]
    pub fn item(&self) -> Option<&ListItem> {
        match self {
            ContainerFrame::BlockQuote => None,
            ContainerFrame::OrderedList { item, .. } | ContainerFrame::UnorderedList { item, .. } => {
                Some(item)
            }
        }
    }

    pub fn item_mut(&mut self) -> Option<&mut ListItem> {
        match self {
            ContainerFrame::BlockQuote => None,
            ContainerFrame::OrderedList { item, .. } | ContainerFrame::UnorderedList { item, .. } => {
                Some(item)
            }
        }
    }
}

/// The kind of a leaf block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LeafKind {
    /// The default when no other block opener matches.
    Paragraph,
    AtxHeading {
        level: u8,
    },
    /// A paragraph turned into a heading by a `=` or `-` underline.
    SetextHeading {
        level: u8,
    },
    ThematicBreak,
    IndentedCode,
    FencedCode {
        /// `` ` `` or `~`.
        fence: char,
        /// Number of fence characters on the opening line.
        length: usize,
        /// Trimmed info string, possibly empty.
        info: String,
    },
}

impl LeafKind {
    /// First word of a fenced code block's info string.
    #[must_use]
    pub fn language(&self) -> Option<&str> {
        match self {
            LeafKind::FencedCode { info, .. } => info.split_whitespace().next(),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_code(&self) -> bool {
        matches!(self, LeafKind::IndentedCode | LeafKind::FencedCode { .. })
    }

    /// Short name used in token dumps.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            LeafKind::Paragraph => "para",
            LeafKind::AtxHeading { .. } => "atx",
            LeafKind::SetextHeading { .. } => "setext",
            LeafKind::ThematicBreak => "tbreak",
            LeafKind::IndentedCode => "icode-block",
            LeafKind::FencedCode { .. } => "fcode-block",
        }
    }
}
