use crate::parsing::source::SourceLine;
use crate::parsing::token::{ItemGeometry, Token, TokenKind};

use super::{
    classify::{LeafClass, MarkdownLineClassifier},
    containers::{ContainerMatch, ContainerPath},
    kinds::{
        AtxHeading, BlockQuote, CODE_INDENT, CodeFence, FenceOpen, ListItemStart, Paragraph,
        SetextUnderline, ThematicBreak, count_spaces, is_blank_from,
    },
    types::{ContainerFrame, ContainerKind, LeafKind},
};

/// The leaf block currently accepting lines, if any.
///
/// Headings and thematic breaks are single-line leaves and never stay open.
#[derive(Debug, Clone)]
enum LeafState {
    None,
    Paragraph {
        /// Index of the paragraph's start token, rewritten in place when a
        /// setext underline turns the paragraph into a heading.
        start_index: usize,
    },
    IndentedCode,
    FencedCode {
        open: FenceOpen,
    },
}

impl LeafState {
    fn is_paragraph(&self) -> bool {
        matches!(self, LeafState::Paragraph { .. })
    }
}

/// A blank line met inside an indented code block.
///
/// It belongs to the code block only if a later line continues the code, so
/// it is held back until that is known.
#[derive(Debug, Clone)]
struct HeldBlank {
    token: Token,
    /// The line remainder after the container prefix.
    rest: String,
}

/// A `(line, column)` position used for end tokens, which consume no text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Position {
    line: usize,
    column: usize,
}

impl Position {
    fn at(line: &SourceLine, offset: usize) -> Self {
        Self {
            line: line.number,
            column: line.original_column(offset),
        }
    }
}

/// Converts source lines into the document token stream.
///
/// Owns the container stack and the open leaf; one instance tokenizes one
/// file. Feed lines in order with [`Tokenizer::push_line`], then call
/// [`Tokenizer::finish`].
pub struct Tokenizer {
    containers: ContainerPath,
    leaf: LeafState,
    tokens: Vec<Token>,
    /// Prefix text matched on the current line, handed to the first token
    /// that consumes text on it.
    line_prefix: String,
    held_blanks: Vec<HeldBlank>,
    classifier: MarkdownLineClassifier,
    /// Where synthetic end-of-file closes are reported.
    eof: Position,
}

impl Tokenizer {
    pub fn new() -> Self {
        Self {
            containers: ContainerPath::default(),
            leaf: LeafState::None,
            tokens: vec![],
            line_prefix: String::new(),
            held_blanks: vec![],
            classifier: MarkdownLineClassifier,
            eof: Position { line: 1, column: 1 },
        }
    }

    /// Tokenizes one physical line.
    pub fn push_line(&mut self, line: &SourceLine) {
        let text = line.expanded.as_str();
        let matched = self.containers.match_line(text);
        let all_matched = matched.depth == self.containers.len();
        self.line_prefix = text[..matched.offset].to_string();
        self.eof = Position {
            line: line.number,
            column: line.end_column(),
        };

        if all_matched && let LeafState::FencedCode { open } = &self.leaf {
            let open = open.clone();
            self.fenced_code_line(line, matched.offset, &open);
            return;
        }

        let (offset, opened, unmatched_open) = self.open_containers(line, matched, all_matched);
        let rest = &text[offset..];

        if unmatched_open {
            let blank = is_blank_from(text, offset);
            if !blank
                && self.leaf.is_paragraph()
                && self.classifier.classify(rest, false).continues_paragraph()
            {
                log::trace!("line {}: lazy paragraph continuation", line.number);
                self.paragraph_line(line, offset, true);
                return;
            }
            self.close_unmatched(matched.depth, blank, Position::at(line, offset));
        }

        self.leaf_line(line, offset, opened);
    }

    /// Closes whatever is still open and returns the token stream.
    pub fn finish(mut self) -> Vec<Token> {
        let at = self.eof;
        self.close_unmatched(0, false, at);
        self.tokens
    }

    /// Opens the block quotes and list items whose markers follow the matched
    /// prefix. Returns the new offset, whether anything was opened, and
    /// whether containers that failed to match are still open.
    fn open_containers(
        &mut self,
        line: &SourceLine,
        matched: ContainerMatch,
        all_matched: bool,
    ) -> (usize, bool, bool) {
        let text = line.expanded.as_str();
        let mut offset = matched.offset;
        let mut opened = false;
        let mut unmatched_open = !all_matched;

        loop {
            let indent = count_spaces(text, offset);
            if indent >= CODE_INDENT {
                break;
            }
            let rest = &text[offset + indent..];
            if !opened
                && all_matched
                && self.leaf.is_paragraph()
                && SetextUnderline::level(rest).is_some()
            {
                break;
            }
            if ThematicBreak::matches(rest) {
                break;
            }

            if let Some(after) = BlockQuote::match_marker(text, offset) {
                let at = Position::at(line, offset);
                if unmatched_open {
                    self.close_unmatched(matched.depth, false, at);
                    unmatched_open = false;
                }
                self.close_leaf(true, at);
                self.open_block_quote(line, offset, after);
                offset = after;
                opened = true;
                continue;
            }

            if let Some(start) = ListItemStart::detect(text, offset) {
                let interrupting = !opened && all_matched && self.leaf.is_paragraph();
                if interrupting && !start.can_interrupt_paragraph() {
                    break;
                }
                let at = Position::at(line, offset);
                let first_unmatched = self.containers.get(matched.depth).map(ContainerFrame::kind);
                let sibling = unmatched_open
                    && first_unmatched.is_some_and(|kind| kind.same_list_type(start.kind));
                if unmatched_open {
                    self.close_unmatched(matched.depth + 1, false, at);
                    if !sibling {
                        // A list of another type ends the list at this level
                        // by rule; anything else failed its prefix.
                        let replaced = first_unmatched.is_some_and(ContainerKind::is_list);
                        self.close_container(replaced, at);
                    }
                    unmatched_open = false;
                }
                self.close_leaf(true, at);
                if sibling {
                    self.start_sibling_item(line, offset, &start);
                } else {
                    self.open_list(line, offset, &start);
                }
                offset = start.consumed_end;
                opened = true;
                continue;
            }
            break;
        }
        (offset, opened, unmatched_open)
    }

    fn open_block_quote(&mut self, line: &SourceLine, offset: usize, after: usize) {
        let text = line.expanded.as_str();
        let marker_offset = offset + count_spaces(text, offset);
        self.containers.mark_content();
        self.emit(
            TokenKind::ContainerStart {
                container: ContainerKind::BlockQuote,
                item: None,
            },
            line,
            marker_offset,
            text[offset..after].to_string(),
        );
        self.containers.push(ContainerFrame::BlockQuote);
    }

    fn open_list(&mut self, line: &SourceLine, offset: usize, start: &ListItemStart) {
        let item = start.list_item(offset);
        let frame = match start.kind {
            ContainerKind::OrderedList {
                start: first,
                delimiter,
            } => ContainerFrame::OrderedList {
                start: first,
                delimiter,
                item,
            },
            ContainerKind::UnorderedList { bullet } => ContainerFrame::UnorderedList { bullet, item },
            ContainerKind::BlockQuote => unreachable!("list marker detected as a block quote"),
        };
        log::trace!(
            "line {}: open {} with content column {}",
            line.number,
            start.kind.name(),
            item.content_offset + 1
        );
        self.containers.mark_content();
        self.emit(
            TokenKind::ContainerStart {
                container: start.kind,
                item: Some(ItemGeometry::from(&item)),
            },
            line,
            start.marker_offset,
            line.expanded[offset..start.consumed_end].to_string(),
        );
        self.containers.push(frame);
    }

    fn start_sibling_item(&mut self, line: &SourceLine, offset: usize, start: &ListItemStart) {
        let item = start.list_item(offset);
        match self.containers.last_mut() {
            Some(ContainerFrame::OrderedList { item: current, .. })
            | Some(ContainerFrame::UnorderedList { item: current, .. }) => *current = item,
            _ => panic!(
                "sibling list item at line {} without an open list on top of the stack",
                line.number
            ),
        }
        self.emit(
            TokenKind::NewListItem {
                item: ItemGeometry::from(&item),
                number: start.number,
            },
            line,
            start.marker_offset,
            line.expanded[offset..start.consumed_end].to_string(),
        );
    }

    /// Classifies the remainder of a line that was not absorbed lazily.
    fn leaf_line(&mut self, line: &SourceLine, offset: usize, opened: bool) {
        let rest = &line.expanded[offset..];
        let paragraph_open = !opened && self.leaf.is_paragraph();
        match self.classifier.classify(rest, paragraph_open) {
            LeafClass::Blank => {
                if !opened {
                    self.containers.close_empty_items();
                }
                self.blank_line(line, offset);
            }
            LeafClass::SetextUnderline(level) => self.setext_underline(line, offset, level),
            LeafClass::Indented => match self.leaf {
                LeafState::Paragraph { .. } => self.paragraph_line(line, offset, false),
                LeafState::IndentedCode => self.indented_code_line(line, offset),
                _ => {
                    self.close_leaf(true, Position::at(line, offset));
                    self.emit(
                        TokenKind::LeafStart(LeafKind::IndentedCode),
                        line,
                        offset + CODE_INDENT,
                        String::new(),
                    );
                    self.leaf = LeafState::IndentedCode;
                    self.indented_code_line(line, offset);
                }
            },
            LeafClass::AtxHeading(heading) => self.atx_heading(line, offset, heading),
            LeafClass::ThematicBreak => self.thematic_break(line, offset),
            LeafClass::FenceOpen(open) => self.open_fence(line, offset, open),
            LeafClass::Text => self.paragraph_line(line, offset, false),
        }
    }

    fn blank_line(&mut self, line: &SourceLine, offset: usize) {
        let at = Position::at(line, offset);
        match self.leaf {
            LeafState::IndentedCode => {
                let token = self.make_token(
                    TokenKind::BlankLine,
                    line,
                    offset,
                    self.line_literal(line, offset),
                );
                self.held_blanks.push(HeldBlank {
                    token,
                    rest: line.expanded[offset..].to_string(),
                });
                return;
            }
            LeafState::Paragraph { .. } => self.close_leaf(true, at),
            LeafState::FencedCode { .. } | LeafState::None => {}
        }
        let literal = self.line_literal(line, offset);
        self.emit(TokenKind::BlankLine, line, offset, literal);
    }

    fn paragraph_line(&mut self, line: &SourceLine, offset: usize, lazy: bool) {
        let rest = &line.expanded[offset..];
        let text_offset = offset + count_spaces(rest, 0);
        if !self.leaf.is_paragraph() {
            self.close_leaf(true, Position::at(line, offset));
            let start_index = self.tokens.len();
            self.emit(
                TokenKind::LeafStart(LeafKind::Paragraph),
                line,
                text_offset,
                String::new(),
            );
            self.leaf = LeafState::Paragraph { start_index };
        }
        self.containers.mark_content();
        let literal = self.line_literal(line, offset);
        self.emit(
            TokenKind::LeafContent {
                text: Paragraph::line_text(rest).to_string(),
                lazy,
            },
            line,
            text_offset,
            literal,
        );
    }

    fn setext_underline(&mut self, line: &SourceLine, offset: usize, level: u8) {
        let LeafState::Paragraph { start_index } = self.leaf else {
            unreachable!("setext underline classified without an open paragraph");
        };
        let leaf = LeafKind::SetextHeading { level };
        self.tokens[start_index].kind = TokenKind::LeafStart(leaf.clone());
        self.leaf = LeafState::None;
        let literal = self.line_literal(line, offset);
        let marker_offset = offset + count_spaces(&line.expanded, offset);
        self.emit(
            TokenKind::LeafEnd {
                leaf,
                matched_naturally: true,
            },
            line,
            marker_offset,
            literal,
        );
    }

    fn indented_code_line(&mut self, line: &SourceLine, offset: usize) {
        for held in std::mem::take(&mut self.held_blanks) {
            let text = held.rest[count_spaces(&held.rest, 0).min(CODE_INDENT)..].to_string();
            self.tokens.push(Token {
                kind: TokenKind::LeafContent { text, lazy: false },
                ..held.token
            });
        }
        self.containers.mark_content();
        let text = line.expanded[offset + CODE_INDENT..].to_string();
        let literal = self.line_literal(line, offset);
        self.emit(
            TokenKind::LeafContent { text, lazy: false },
            line,
            offset + CODE_INDENT,
            literal,
        );
    }

    fn atx_heading(&mut self, line: &SourceLine, offset: usize, heading: AtxHeading) {
        let rest = &line.expanded[offset..];
        let marker_offset = offset + count_spaces(rest, 0);
        let content_offset = offset + heading.content_start;
        let leaf = LeafKind::AtxHeading {
            level: heading.level,
        };
        self.close_leaf(true, Position::at(line, offset));
        self.containers.mark_content();
        self.emit(
            TokenKind::LeafStart(leaf.clone()),
            line,
            marker_offset,
            rest[..heading.content_start].to_string(),
        );
        let literal = self.line_literal(line, content_offset);
        self.emit(
            TokenKind::LeafContent {
                text: heading.text,
                lazy: false,
            },
            line,
            content_offset,
            literal,
        );
        self.emit_end(
            TokenKind::LeafEnd {
                leaf,
                matched_naturally: true,
            },
            Position::at(line, line.expanded.len()),
        );
    }

    fn thematic_break(&mut self, line: &SourceLine, offset: usize) {
        let marker_offset = offset + count_spaces(&line.expanded, offset);
        self.close_leaf(true, Position::at(line, offset));
        self.containers.mark_content();
        let literal = self.line_literal(line, offset);
        self.emit(
            TokenKind::LeafStart(LeafKind::ThematicBreak),
            line,
            marker_offset,
            literal,
        );
        self.emit_end(
            TokenKind::LeafEnd {
                leaf: LeafKind::ThematicBreak,
                matched_naturally: true,
            },
            Position::at(line, line.expanded.len()),
        );
    }

    fn open_fence(&mut self, line: &SourceLine, offset: usize, open: FenceOpen) {
        self.close_leaf(true, Position::at(line, offset));
        self.containers.mark_content();
        let literal = self.line_literal(line, offset);
        self.emit(
            TokenKind::LeafStart(open.leaf_kind()),
            line,
            offset + open.indent,
            literal,
        );
        self.leaf = LeafState::FencedCode { open };
    }

    fn fenced_code_line(&mut self, line: &SourceLine, offset: usize, open: &FenceOpen) {
        let rest = &line.expanded[offset..];
        let literal = self.line_literal(line, offset);
        if CodeFence::closes(open, rest) {
            self.leaf = LeafState::None;
            self.emit(
                TokenKind::LeafEnd {
                    leaf: open.leaf_kind(),
                    matched_naturally: true,
                },
                line,
                offset + count_spaces(rest, 0),
                literal,
            );
            return;
        }
        let strip = count_spaces(rest, 0).min(open.indent);
        self.emit(
            TokenKind::LeafContent {
                text: rest[strip..].to_string(),
                lazy: false,
            },
            line,
            offset + strip,
            literal,
        );
    }

    /// Closes the open leaf and every frame at `depth` or deeper.
    fn close_unmatched(&mut self, depth: usize, natural: bool, at: Position) {
        self.close_leaf(natural, at);
        while self.containers.len() > depth {
            self.close_container(natural, at);
        }
    }

    fn close_container(&mut self, natural: bool, at: Position) {
        self.close_leaf(natural, at);
        let Some(frame) = self.containers.pop() else {
            panic!(
                "container stack underflow closing at line {} column {}",
                at.line, at.column
            );
        };
        self.emit_end(
            TokenKind::ContainerEnd {
                container: frame.kind(),
                matched_naturally: natural,
            },
            at,
        );
    }

    fn close_leaf(&mut self, natural: bool, at: Position) {
        let leaf = match std::mem::replace(&mut self.leaf, LeafState::None) {
            LeafState::None => return,
            LeafState::Paragraph { .. } => LeafKind::Paragraph,
            LeafState::IndentedCode => LeafKind::IndentedCode,
            LeafState::FencedCode { open } => open.leaf_kind(),
        };
        let held = std::mem::take(&mut self.held_blanks);
        let at = held.first().map_or(at, |h| Position {
            line: h.token.line_number,
            column: h.token.column_number,
        });
        self.emit_end(
            TokenKind::LeafEnd {
                leaf,
                matched_naturally: natural,
            },
            at,
        );
        self.tokens.extend(held.into_iter().map(|h| h.token));
    }

    /// The rest of the line from `offset`, line ending included.
    fn line_literal(&self, line: &SourceLine, offset: usize) -> String {
        format!("{}{}", &line.expanded[offset..], line.ending)
    }

    fn make_token(
        &mut self,
        kind: TokenKind,
        line: &SourceLine,
        offset: usize,
        literal: String,
    ) -> Token {
        Token {
            kind,
            line_number: line.number,
            column_number: line.original_column(offset),
            prefix: std::mem::take(&mut self.line_prefix),
            literal,
        }
    }

    /// Emits a token that consumes text on `line`.
    fn emit(&mut self, kind: TokenKind, line: &SourceLine, offset: usize, literal: String) {
        let token = self.make_token(kind, line, offset, literal);
        self.tokens.push(token);
    }

    fn emit_end(&mut self, kind: TokenKind, at: Position) {
        self.tokens.push(Token {
            kind,
            line_number: at.line,
            column_number: at.column,
            prefix: String::new(),
            literal: String::new(),
        });
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}
