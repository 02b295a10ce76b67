//! The document token stream.
//!
//! Every token records where it sits (`line_number`, `column_number`, both
//! 1-based, columns counted in the original line) and the exact source text
//! it consumed. Concatenating `prefix + literal` over a whole stream gives
//! back the input for documents without tab characters.

use std::fmt;

use serde::Serialize;

use super::blocks::types::{ContainerKind, LeafKind, ListItem};

/// List item geometry reported on item starts, in 1-based expanded columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ItemGeometry {
    pub marker_column: usize,
    pub content_column: usize,
    /// The item opened with no content on its marker line.
    pub content_pending: bool,
}

impl From<&ListItem> for ItemGeometry {
    fn from(item: &ListItem) -> Self {
        Self {
            marker_column: item.marker_offset + 1,
            content_column: item.content_offset + 1,
            content_pending: item.content_pending,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "token", rename_all = "snake_case")]
pub enum TokenKind {
    ContainerStart {
        container: ContainerKind,
        /// Present for lists: the geometry of the first item.
        item: Option<ItemGeometry>,
    },
    /// A sibling item inside an already open list.
    NewListItem {
        item: ItemGeometry,
        /// The item's number, for ordered lists.
        number: Option<u64>,
    },
    ContainerEnd {
        container: ContainerKind,
        /// `false` when the container closed because a line's prefix stopped
        /// matching it, or at end of file.
        matched_naturally: bool,
    },
    LeafStart(LeafKind),
    LeafContent {
        text: String,
        /// The line continued a paragraph without matching every container.
        lazy: bool,
    },
    LeafEnd {
        leaf: LeafKind,
        matched_naturally: bool,
    },
    BlankLine,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub line_number: usize,
    pub column_number: usize,
    /// Container prefix consumed on this line before the token.
    pub prefix: String,
    /// Source text consumed by the token itself.
    pub literal: String,
}

impl Token {
    /// The exact source text attributed to this token.
    #[must_use]
    pub fn source_text(&self) -> String {
        format!("{}{}", self.prefix, self.literal)
    }

    #[must_use]
    pub fn is_end(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::ContainerEnd { .. } | TokenKind::LeafEnd { .. }
        )
    }

    /// The container opened by this token, if it opens one.
    #[must_use]
    pub fn opened_container(&self) -> Option<ContainerKind> {
        match self.kind {
            TokenKind::ContainerStart { container, .. } => Some(container),
            _ => None,
        }
    }

    /// The container closed by this token, if it closes one.
    #[must_use]
    pub fn closed_container(&self) -> Option<(ContainerKind, bool)> {
        match self.kind {
            TokenKind::ContainerEnd {
                container,
                matched_naturally,
            } => Some((container, matched_naturally)),
            _ => None,
        }
    }
}

fn close_label(matched_naturally: bool) -> &'static str {
    if matched_naturally { "natural" } else { "forced" }
}

fn leaf_label(leaf: &LeafKind) -> String {
    match leaf {
        LeafKind::AtxHeading { level } | LeafKind::SetextHeading { level } => {
            format!("{}({level})", leaf.name())
        }
        LeafKind::FencedCode {
            fence,
            length,
            info,
        } => {
            let fence: String = std::iter::repeat_n(*fence, *length).collect();
            format!("{}({fence}{info})", leaf.name())
        }
        _ => leaf.name().to_string(),
    }
}

fn item_label(item: &ItemGeometry) -> String {
    let pending = if item.content_pending { "?" } else { "" };
    format!("{}{pending}", item.content_column)
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::ContainerStart { container, item } => {
                write!(f, "start-{}", container.name())?;
                match container {
                    ContainerKind::BlockQuote => {}
                    ContainerKind::OrderedList { start, delimiter } => {
                        write!(f, "({start}{delimiter})")?
                    }
                    ContainerKind::UnorderedList { bullet } => write!(f, "({bullet})")?,
                }
                if let Some(item) = item {
                    write!(f, ":{}", item_label(item))?;
                }
                Ok(())
            }
            TokenKind::NewListItem { item, number } => match number {
                Some(n) => write!(f, "li({n}):{}", item_label(item)),
                None => write!(f, "li:{}", item_label(item)),
            },
            TokenKind::ContainerEnd {
                container,
                matched_naturally,
            } => write!(
                f,
                "end-{}:{}",
                container.name(),
                close_label(*matched_naturally)
            ),
            TokenKind::LeafStart(leaf) => write!(f, "start-{}", leaf_label(leaf)),
            TokenKind::LeafContent { text, lazy } => {
                let name = if *lazy { "lazy-text" } else { "text" };
                write!(f, "{name}({text:?})")
            }
            TokenKind::LeafEnd {
                leaf,
                matched_naturally,
            } => write!(
                f,
                "end-{}:{}",
                leaf_label(leaf),
                close_label(*matched_naturally)
            ),
            TokenKind::BlankLine => write!(f, "blank"),
        }
    }
}

/// One-line dump: `[line:column] kind prefix=".." "literal"`.
impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}:{}] {}", self.line_number, self.column_number, self.kind)?;
        if !self.prefix.is_empty() {
            write!(f, " prefix={:?}", self.prefix)?;
        }
        if !self.literal.is_empty() {
            write!(f, " {:?}", self.literal)?;
        }
        Ok(())
    }
}

/// Renders a stream one token per line, the format used by `--tokens`.
pub fn dump(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}
