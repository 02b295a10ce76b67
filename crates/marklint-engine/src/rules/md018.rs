use std::sync::OnceLock;

use regex::Regex;

use crate::parsing::{
    blocks::types::LeafKind,
    token::{Token, TokenKind},
};
use crate::plugins::{Plugin, PluginHooks, PluginMetadata, ScanContext};

static MISSING_SPACE_REGEX: OnceLock<Regex> = OnceLock::new();

fn missing_space_regex() -> &'static Regex {
    MISSING_SPACE_REGEX
        .get_or_init(|| Regex::new(r"^#{1,6}[^#\s]").expect("Invalid ATX heading regex"))
}

/// Paragraph lines that look like an ATX heading without the space.
#[derive(Default)]
pub struct NoMissingSpaceAtx {
    in_paragraph: bool,
}

impl Plugin for NoMissingSpaceAtx {
    fn metadata(&self) -> PluginMetadata {
        PluginMetadata {
            id: "md018",
            aliases: &["no-missing-space-atx"],
            description: "No space after hash on atx style heading",
        }
    }

    fn hooks(&self) -> PluginHooks {
        PluginHooks {
            next_line: false,
            next_token: true,
        }
    }

    fn starting_new_file(&mut self) {
        self.in_paragraph = false;
    }

    fn next_token(&mut self, context: &mut ScanContext<'_>, token: &Token) -> anyhow::Result<()> {
        match &token.kind {
            TokenKind::LeafStart(LeafKind::Paragraph) => self.in_paragraph = true,
            TokenKind::LeafEnd { .. } => self.in_paragraph = false,
            TokenKind::LeafContent { text, .. } if self.in_paragraph => {
                if missing_space_regex().is_match(text) {
                    context.report(token.line_number, token.column_number, Some(text.clone()));
                }
            }
            _ => {}
        }
        Ok(())
    }
}
