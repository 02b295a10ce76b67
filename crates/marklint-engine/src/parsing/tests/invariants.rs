use crate::parsing::blocks::types::{ContainerKind, LeafKind};
use crate::parsing::token::{Token, TokenKind};

/// Validates token stream invariants.
///
/// Asserts that:
/// - Container starts and ends nest and the stack is empty at the end
/// - At most one leaf is open, and only leaf tokens appear while it is
/// - Positions never move backwards
/// - `prefix + literal` over the stream reproduces tab-free input
///
/// # Panics
/// Panics with a descriptive message if any invariant is violated.
pub fn check(input: &str, tokens: &[Token]) {
    let mut stack: Vec<ContainerKind> = vec![];
    let mut leaf: Option<LeafKind> = None;
    let mut last = (1, 1);

    for (index, token) in tokens.iter().enumerate() {
        let position = (token.line_number, token.column_number);
        assert!(
            position >= last,
            "token {index} moved backwards: {token} after {last:?}\n{}",
            crate::parsing::token::dump(tokens)
        );
        last = position;

        match &token.kind {
            TokenKind::ContainerStart { container, .. } => {
                assert!(leaf.is_none(), "container opened inside a leaf: {token}");
                stack.push(*container);
            }
            TokenKind::NewListItem { .. } => {
                assert!(leaf.is_none(), "list item inside a leaf: {token}");
                assert!(
                    stack.last().is_some_and(|c| c.is_list()),
                    "list item outside a list: {token}"
                );
            }
            TokenKind::ContainerEnd { container, .. } => {
                assert!(leaf.is_none(), "container closed over an open leaf: {token}");
                let open = stack
                    .pop()
                    .unwrap_or_else(|| panic!("container end without start: {token}"));
                assert_eq!(open, *container, "mismatched container end: {token}");
            }
            TokenKind::LeafStart(kind) => {
                assert!(leaf.is_none(), "leaf opened inside a leaf: {token}");
                leaf = Some(kind.clone());
            }
            TokenKind::LeafContent { .. } => {
                assert!(leaf.is_some(), "content outside a leaf: {token}");
            }
            TokenKind::LeafEnd { leaf: kind, .. } => {
                let open = leaf
                    .take()
                    .unwrap_or_else(|| panic!("leaf end without start: {token}"));
                assert_eq!(open, *kind, "mismatched leaf end: {token}");
            }
            TokenKind::BlankLine => {
                assert!(leaf.is_none(), "blank line token inside a leaf: {token}");
            }
        }
    }

    assert!(leaf.is_none(), "leaf still open at end of stream");
    assert!(stack.is_empty(), "containers still open: {stack:?}");

    if !input.contains('\t') {
        let rebuilt: String = tokens.iter().map(Token::source_text).collect();
        pretty_assertions::assert_eq!(rebuilt, input, "round trip failed");
    }
}
