use crate::parsing::{
    blocks::types::ContainerKind,
    token::{Token, TokenKind},
};
use crate::plugins::{Plugin, PluginHooks, PluginMetadata, ScanContext};

/// What the last token that was not an end token looked like.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Previous {
    Nothing,
    Blank,
    ContainerStart,
    Content,
}

/// An outermost list that has ended, waiting for the token after it.
#[derive(Debug, Clone, Copy)]
struct PendingEnd {
    last_line: usize,
    column: usize,
    blank_before: bool,
    matched_naturally: bool,
}

/// Outermost lists must be surrounded by blank lines, unless they sit at
/// the start or end of the document or of their enclosing container.
#[derive(Default)]
pub struct BlanksAroundLists {
    open: Vec<ContainerKind>,
    previous: Option<Previous>,
    last_line: usize,
    list_column: usize,
    pending_end: Option<PendingEnd>,
}

impl BlanksAroundLists {
    fn inside_list(&self) -> bool {
        self.open.iter().any(|kind| kind.is_list())
    }

    fn resolve_pending_end(&mut self, context: &mut ScanContext<'_>, next: &TokenKind) {
        let Some(end) = self.pending_end.take() else {
            return;
        };
        let separated = end.blank_before
            || if end.matched_naturally {
                // Closed by a blank line, unless another list took its place.
                !matches!(next, TokenKind::ContainerStart { .. })
            } else {
                // Forced closed; only the end of its enclosing container separates it.
                matches!(next, TokenKind::BlankLine | TokenKind::ContainerEnd { .. })
            };
        if !separated {
            context.report(end.last_line, end.column, Some("after list".to_string()));
        }
    }
}

impl Plugin for BlanksAroundLists {
    fn metadata(&self) -> PluginMetadata {
        PluginMetadata {
            id: "md032",
            aliases: &["blanks-around-lists"],
            description: "Lists should be surrounded by blank lines",
        }
    }

    fn hooks(&self) -> PluginHooks {
        PluginHooks {
            next_line: false,
            next_token: true,
        }
    }

    fn starting_new_file(&mut self) {
        *self = Self::default();
    }

    fn next_token(&mut self, context: &mut ScanContext<'_>, token: &Token) -> anyhow::Result<()> {
        self.resolve_pending_end(context, &token.kind);
        let previous = self.previous.unwrap_or(Previous::Nothing);

        match &token.kind {
            TokenKind::ContainerStart { container, .. } => {
                if container.is_list() && !self.inside_list() {
                    if previous == Previous::Content {
                        context.report(
                            token.line_number,
                            token.column_number,
                            Some("before list".to_string()),
                        );
                    }
                    self.list_column = token.column_number;
                }
                self.open.push(*container);
                self.previous = Some(Previous::ContainerStart);
                self.last_line = token.line_number;
            }
            TokenKind::ContainerEnd {
                matched_naturally, ..
            } => {
                let closed = self.open.pop();
                if closed.is_some_and(|kind| kind.is_list()) && !self.inside_list() {
                    self.pending_end = Some(PendingEnd {
                        last_line: self.last_line,
                        column: self.list_column,
                        blank_before: previous == Previous::Blank,
                        matched_naturally: *matched_naturally,
                    });
                }
            }
            TokenKind::LeafEnd { .. } => {}
            TokenKind::BlankLine => self.previous = Some(Previous::Blank),
            TokenKind::LeafStart(_) | TokenKind::LeafContent { .. } | TokenKind::NewListItem { .. } => {
                self.previous = Some(Previous::Content);
                self.last_line = token.line_number;
            }
        }
        Ok(())
    }

    fn completed_file(
        &mut self,
        _context: &mut ScanContext<'_>,
        _final_line_number: usize,
    ) -> anyhow::Result<()> {
        self.pending_end = None;
        Ok(())
    }
}
