//! Compact HTML rendering of a token stream.
//!
//! Output has no whitespace between block tags, which keeps expectations in
//! tests on one line. Paragraph text is rendered verbatim (escaped); there is
//! no inline parsing.

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::parsing::{
    blocks::types::{ContainerKind, LeafKind},
    token::{Token, TokenKind},
};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Block {
    Quote(Vec<Block>),
    List {
        kind: ContainerKind,
        items: Vec<Vec<Block>>,
    },
    Leaf {
        kind: LeafKind,
        lines: Vec<String>,
    },
    Blank,
}

/// An open container while the tree is being rebuilt.
enum Open {
    Root(Vec<Block>),
    Quote(Vec<Block>),
    List {
        kind: ContainerKind,
        items: Vec<Vec<Block>>,
    },
}

impl Open {
    fn children(&mut self) -> &mut Vec<Block> {
        match self {
            Open::Root(children) | Open::Quote(children) => children,
            Open::List { items, .. } => match items.last_mut() {
                Some(item) => item,
                None => panic!("list open without an item"),
            },
        }
    }

    fn close(self) -> Block {
        match self {
            Open::Root(_) => panic!("document root closed by a container end token"),
            Open::Quote(children) => Block::Quote(children),
            Open::List { kind, items } => Block::List { kind, items },
        }
    }
}

/// Rebuilds the block tree from tokens.
///
/// # Panics
/// Panics when the stream is not well nested, which the tokenizer never
/// produces.
fn build(tokens: &[Token]) -> Vec<Block> {
    let mut stack = vec![Open::Root(vec![])];
    let mut leaf: Option<(LeafKind, Vec<String>)> = None;

    for token in tokens {
        match &token.kind {
            TokenKind::ContainerStart { container, .. } => stack.push(match container {
                ContainerKind::BlockQuote => Open::Quote(vec![]),
                kind => Open::List {
                    kind: *kind,
                    items: vec![vec![]],
                },
            }),
            TokenKind::NewListItem { .. } => match stack.last_mut() {
                Some(Open::List { items, .. }) => items.push(vec![]),
                _ => panic!("list item token outside a list: {token}"),
            },
            TokenKind::ContainerEnd { .. } => {
                let block = match stack.pop() {
                    Some(open) if !stack.is_empty() => open.close(),
                    _ => panic!("container end without start: {token}"),
                };
                current(&mut stack).push(block);
            }
            TokenKind::LeafStart(kind) => leaf = Some((kind.clone(), vec![])),
            TokenKind::LeafContent { text, .. } => match leaf.as_mut() {
                Some((_, lines)) => lines.push(text.clone()),
                None => panic!("leaf content outside a leaf: {token}"),
            },
            TokenKind::LeafEnd { leaf: kind, .. } => {
                let Some((_, lines)) = leaf.take() else {
                    panic!("leaf end without start: {token}");
                };
                current(&mut stack).push(Block::Leaf {
                    kind: kind.clone(),
                    lines,
                });
            }
            TokenKind::BlankLine => current(&mut stack).push(Block::Blank),
        }
    }

    match stack.pop() {
        Some(Open::Root(children)) if stack.is_empty() => children,
        _ => panic!("containers still open at end of token stream"),
    }
}

fn current(stack: &mut [Open]) -> &mut Vec<Block> {
    match stack.last_mut() {
        Some(open) => open.children(),
        None => panic!("empty container stack"),
    }
}

/// Renders a token stream as HTML.
pub fn render(tokens: &[Token]) -> String {
    let mut out = String::new();
    render_blocks(&build(tokens), false, &mut out);
    out
}

fn render_blocks(blocks: &[Block], tight: bool, out: &mut String) {
    for block in blocks {
        match block {
            Block::Quote(children) => {
                out.push_str("<blockquote>");
                render_blocks(children, false, out);
                out.push_str("</blockquote>");
            }
            Block::List { kind, items } => render_list(*kind, items, out),
            Block::Leaf { kind, lines } => render_leaf(kind, lines, tight, out),
            Block::Blank => {}
        }
    }
}

fn render_list(kind: ContainerKind, items: &[Vec<Block>], out: &mut String) {
    let tag = match kind {
        ContainerKind::OrderedList { start, .. } if start != 1 => {
            out.push_str(&format!("<ol start=\"{start}\">"));
            "ol"
        }
        ContainerKind::OrderedList { .. } => {
            out.push_str("<ol>");
            "ol"
        }
        _ => {
            out.push_str("<ul>");
            "ul"
        }
    };
    let tight = is_tight(items);
    for item in items {
        out.push_str("<li>");
        render_blocks(item, tight, out);
        out.push_str("</li>");
    }
    out.push_str(&format!("</{tag}>"));
}

/// A list is loose when a blank line separates two items or two blocks
/// directly inside an item. The blank of an empty marker line and blank
/// lines after the last item do not count.
fn is_tight(items: &[Vec<Block>]) -> bool {
    for (index, item) in items.iter().enumerate() {
        let body = match item.split_first() {
            Some((Block::Blank, rest)) => rest,
            _ => &item[..],
        };
        let last_item = index + 1 == items.len();
        match body.iter().rposition(|b| *b != Block::Blank) {
            Some(last_content) => {
                if body[..last_content].contains(&Block::Blank) {
                    return false;
                }
                if last_content + 1 < body.len() && !last_item {
                    return false;
                }
            }
            None if !body.is_empty() && !last_item => return false,
            None => {}
        }
    }
    true
}

fn render_leaf(kind: &LeafKind, lines: &[String], tight: bool, out: &mut String) {
    match kind {
        LeafKind::Paragraph => {
            let text = lines.join("\n");
            let text = encode_text(text.trim_end());
            if tight {
                out.push_str(&text);
            } else {
                out.push_str(&format!("<p>{text}</p>"));
            }
        }
        LeafKind::AtxHeading { level } | LeafKind::SetextHeading { level } => {
            let text = lines.join("\n");
            out.push_str(&format!(
                "<h{level}>{}</h{level}>",
                encode_text(text.trim())
            ));
        }
        LeafKind::ThematicBreak => out.push_str("<hr />"),
        LeafKind::IndentedCode | LeafKind::FencedCode { .. } => {
            match kind.language() {
                Some(language) => out.push_str(&format!(
                    "<pre><code class=\"language-{}\">",
                    encode_double_quoted_attribute(language)
                )),
                None => out.push_str("<pre><code>"),
            }
            for line in lines {
                out.push_str(&encode_text(line));
                out.push('\n');
            }
            out.push_str("</code></pre>");
        }
    }
}
