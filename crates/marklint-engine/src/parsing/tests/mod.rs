//! Tokenizer behaviour tests.
//!
//! Token streams are compared as one-line-per-token dumps using insta inline
//! snapshots; every stream is also run through the invariant checks.

mod invariants;

use pretty_assertions::assert_eq;
use rstest::rstest;
use xi_rope::Rope;

use crate::parsing::{
    blocks::types::{ContainerKind, LeafKind},
    token::{Token, TokenKind, dump},
    tokenize, tokenize_rope,
};

fn tokens(input: &str) -> Vec<Token> {
    let tokens = tokenize(input);
    invariants::check(input, &tokens);
    tokens
}

fn leaf_starts(tokens: &[Token]) -> Vec<LeafKind> {
    tokens
        .iter()
        .filter_map(|t| match &t.kind {
            TokenKind::LeafStart(kind) => Some(kind.clone()),
            _ => None,
        })
        .collect()
}

fn container_ends(tokens: &[Token]) -> Vec<(ContainerKind, bool)> {
    tokens.iter().filter_map(Token::closed_container).collect()
}

// Nested container scenarios

#[test]
fn quote_list_quote_paragraph_spans_both_lines() {
    let tokens = tokens("> 1. > list\n>    > item");
    insta::assert_snapshot!(dump(&tokens), @r#"
    [1:1] start-block-quote "> "
    [1:3] start-olist(1.):6 "1. "
    [1:6] start-block-quote "> "
    [1:8] start-para
    [1:8] text("list") "list\n"
    [2:8] text("item") prefix=">    > " "item"
    [2:12] end-para:forced
    [2:12] end-block-quote:forced
    [2:12] end-olist:forced
    [2:12] end-block-quote:forced
    "#);
}

#[test]
fn under_indented_quote_marker_becomes_lazy_text() {
    let tokens = tokens(">\n> 1.\n>    > list\n     > item");
    insta::assert_snapshot!(dump(&tokens), @r#"
    [1:1] start-block-quote ">"
    [1:2] blank "\n"
    [2:3] start-olist(1.):6? prefix="> " "1."
    [2:5] blank "\n"
    [3:6] start-block-quote prefix=">    " "> "
    [3:8] start-para
    [3:8] text("list") "list\n"
    [4:6] lazy-text("> item") "     > item"
    [4:12] end-para:forced
    [4:12] end-block-quote:forced
    [4:12] end-olist:forced
    [4:12] end-block-quote:forced
    "#);
}

#[test]
fn uniform_extra_indentation_collapses_to_code() {
    let tokens = tokens("    >    1.    > list\n    >    1.    > item");
    insta::assert_snapshot!(dump(&tokens), @r#"
    [1:5] start-icode-block
    [1:5] text(">    1.    > list") "    >    1.    > list\n"
    [2:5] text(">    1.    > item") "    >    1.    > item"
    [2:22] end-icode-block:forced
    "#);
    assert!(tokens.iter().all(|t| t.opened_container().is_none()));
}

#[test]
fn empty_item_commits_content_column_from_next_line() {
    let tokens = tokens("1.\n   item");
    insta::assert_snapshot!(dump(&tokens), @r#"
    [1:1] start-olist(1.):4? "1."
    [1:3] blank "\n"
    [2:4] start-para prefix="   "
    [2:4] text("item") "item"
    [2:8] end-para:forced
    [2:8] end-olist:forced
    "#);
}

#[test]
fn empty_item_needs_marker_width_plus_one() {
    let tokens = tokens("1.\n  item");
    assert_eq!(
        container_ends(&tokens)[0],
        (
            ContainerKind::OrderedList {
                start: 1,
                delimiter: '.'
            },
            false
        )
    );
    let text = tokens
        .iter()
        .find(|t| matches!(t.kind, TokenKind::LeafContent { .. }))
        .unwrap();
    assert_eq!((text.line_number, text.column_number), (2, 3));
    assert!(text.prefix.is_empty());
}

#[test]
fn empty_item_then_blank_keeps_the_list_for_a_sibling() {
    let tokens = tokens("-\n\n- foo");
    insta::assert_snapshot!(dump(&tokens), @r#"
    [1:1] start-ulist(-):3? "-"
    [1:2] blank "\n"
    [2:1] blank "\n"
    [3:1] li:3 "- "
    [3:3] start-para
    [3:3] text("foo") "foo"
    [3:6] end-para:forced
    [3:6] end-ulist:forced
    "#);
}

#[test]
fn empty_ordered_item_then_blank_keeps_the_list_for_a_sibling() {
    let tokens = tokens("1.\n\n1. a");
    insta::assert_snapshot!(dump(&tokens), @r#"
    [1:1] start-olist(1.):4? "1."
    [1:3] blank "\n"
    [2:1] blank "\n"
    [3:1] li(1):4 "1. "
    [3:4] start-para
    [3:4] text("a") "a"
    [3:5] end-para:forced
    [3:5] end-olist:forced
    "#);
}

#[test]
fn empty_item_then_blank_takes_no_content() {
    let tokens = tokens("-\n\n  foo");
    assert_eq!(
        container_ends(&tokens),
        vec![(ContainerKind::UnorderedList { bullet: '-' }, false)]
    );
    assert_eq!(leaf_starts(&tokens), vec![LeafKind::Paragraph]);
    // The paragraph opens after the list has ended.
    let end = tokens.iter().position(|t| t.closed_container().is_some());
    let para = tokens
        .iter()
        .position(|t| matches!(t.kind, TokenKind::LeafStart(_)));
    assert!(end < para);
}

#[test]
fn empty_item_then_blank_then_nested_sibling() {
    let tokens = tokens("-\n\n- -");
    let starts: Vec<_> = tokens.iter().filter_map(Token::opened_container).collect();
    assert_eq!(starts.len(), 2);
    assert_eq!(
        tokens
            .iter()
            .filter(|t| matches!(t.kind, TokenKind::NewListItem { .. }))
            .count(),
        1
    );
}

// Indentation boundaries

#[rstest]
#[case("- a\n\n     b", LeafKind::Paragraph)]
#[case("- a\n\n      b", LeafKind::IndentedCode)]
#[case("> 1. a\n>\n>       b", LeafKind::Paragraph)]
#[case("> 1. a\n>\n>        b", LeafKind::IndentedCode)]
fn content_column_plus_three_nests_plus_four_is_code(
    #[case] input: &str,
    #[case] second_leaf: LeafKind,
) {
    let tokens = tokens(input);
    assert_eq!(leaf_starts(&tokens), vec![LeafKind::Paragraph, second_leaf]);
    // Nothing closes until end of file.
    let first_end = tokens
        .iter()
        .position(|t| t.closed_container().is_some())
        .unwrap();
    assert!(tokens[first_end..].iter().all(Token::is_end));
}

#[test]
fn excess_indentation_without_blank_continues_paragraph() {
    let tokens = tokens("- a\n      b");
    assert_eq!(leaf_starts(&tokens), vec![LeafKind::Paragraph]);
    let texts: Vec<_> = tokens
        .iter()
        .filter_map(|t| match &t.kind {
            TokenKind::LeafContent { text, lazy } => Some((text.as_str(), *lazy)),
            _ => None,
        })
        .collect();
    assert_eq!(texts, vec![("a", false), ("b", false)]);
}

#[test]
fn marker_after_four_spaces_is_not_a_list() {
    let tokens = tokens("    - a");
    assert_eq!(leaf_starts(&tokens), vec![LeafKind::IndentedCode]);
}

#[test]
fn five_spaces_after_marker_start_indented_code_in_item() {
    let tokens = tokens("-     code");
    insta::assert_snapshot!(dump(&tokens), @r#"
    [1:1] start-ulist(-):3 "- "
    [1:7] start-icode-block
    [1:7] text("code") "    code"
    [1:11] end-icode-block:forced
    [1:11] end-ulist:forced
    "#);
}

// Lazy continuation

#[test]
fn lazy_line_keeps_quote_open() {
    let tokens = tokens("> a\nb\n> c");
    insta::assert_snapshot!(dump(&tokens), @r#"
    [1:1] start-block-quote "> "
    [1:3] start-para
    [1:3] text("a") "a\n"
    [2:1] lazy-text("b") "b\n"
    [3:3] text("c") prefix="> " "c"
    [3:4] end-para:forced
    [3:4] end-block-quote:forced
    "#);
}

#[test]
fn no_lazy_continuation_after_blank_line() {
    let tokens = tokens("> a\n\nb");
    assert!(tokens.iter().all(|t| !matches!(
        t.kind,
        TokenKind::LeafContent { lazy: true, .. }
    )));
    assert_eq!(
        container_ends(&tokens),
        vec![(ContainerKind::BlockQuote, true)]
    );
}

#[test]
fn no_lazy_continuation_after_quoted_blank_line() {
    let tokens = tokens("> a\n>\nb");
    assert_eq!(
        container_ends(&tokens),
        vec![(ContainerKind::BlockQuote, false)]
    );
    assert_eq!(
        leaf_starts(&tokens),
        vec![LeafKind::Paragraph, LeafKind::Paragraph]
    );
}

#[test]
fn list_marker_is_never_lazy() {
    let tokens = tokens("> a\n- b");
    assert_eq!(
        container_ends(&tokens)[0],
        (ContainerKind::BlockQuote, false)
    );
    assert!(
        tokens
            .iter()
            .any(|t| t.opened_container() == Some(ContainerKind::UnorderedList { bullet: '-' }))
    );
}

#[test]
fn thematic_break_ends_lazy_paragraph() {
    let tokens = tokens("> a\n---");
    assert_eq!(
        leaf_starts(&tokens),
        vec![LeafKind::Paragraph, LeafKind::ThematicBreak]
    );
}

#[test]
fn lazy_line_cannot_be_setext_underline() {
    let tokens = tokens("> a\n===");
    assert_eq!(leaf_starts(&tokens), vec![LeafKind::Paragraph]);
    assert!(matches!(
        &tokens[3].kind,
        TokenKind::LeafContent { text, lazy: true } if text == "==="
    ));
}

// Lists

#[test]
fn siblings_and_list_type_change() {
    let tokens = tokens("- a\n- b\n+ c");
    insta::assert_snapshot!(dump(&tokens), @r#"
    [1:1] start-ulist(-):3 "- "
    [1:3] start-para
    [1:3] text("a") "a\n"
    [2:1] end-para:forced
    [2:1] li:3 "- "
    [2:3] start-para
    [2:3] text("b") "b\n"
    [3:1] end-para:forced
    [3:1] end-ulist:natural
    [3:1] start-ulist(+):3 "+ "
    [3:3] start-para
    [3:3] text("c") "c"
    [3:4] end-para:forced
    [3:4] end-ulist:forced
    "#);
}

#[test]
fn ordered_delimiter_change_starts_new_list() {
    let tokens = tokens("1. a\n2) b");
    assert_eq!(
        container_ends(&tokens)[0],
        (
            ContainerKind::OrderedList {
                start: 1,
                delimiter: '.'
            },
            true
        )
    );
}

#[test]
fn ordered_item_reports_its_number() {
    let tokens = tokens("3. a\n4. b");
    let numbers: Vec<_> = tokens
        .iter()
        .filter_map(|t| match t.kind {
            TokenKind::NewListItem { number, .. } => number,
            _ => None,
        })
        .collect();
    assert_eq!(numbers, vec![4]);
}

#[rstest]
#[case("a\n2. b", 1)]
#[case("a\n1. b", 2)]
#[case("a\n-\n", 1)]
#[case("a\n- b", 2)]
fn paragraph_interruption_by_list_items(#[case] input: &str, #[case] leaves: usize) {
    assert_eq!(leaf_starts(&tokens(input)).len(), leaves);
}

#[test]
fn unindented_paragraph_forces_nested_lists_closed() {
    let tokens = tokens("- a\n  - b\n\nc");
    assert_eq!(
        container_ends(&tokens),
        vec![
            (ContainerKind::UnorderedList { bullet: '-' }, false),
            (ContainerKind::UnorderedList { bullet: '-' }, false),
        ]
    );
}

// Leaves

#[test]
fn setext_heading_retrofits_paragraph_start() {
    let tokens = tokens("Title\n===");
    insta::assert_snapshot!(dump(&tokens), @r#"
    [1:1] start-setext(1)
    [1:1] text("Title") "Title\n"
    [2:1] end-setext(1):natural "==="
    "#);
}

#[test]
fn atx_heading_keeps_closing_sequence_in_literal() {
    let tokens = tokens("## Title ##");
    insta::assert_snapshot!(dump(&tokens), @r###"
    [1:1] start-atx(2) "## "
    [1:4] text("Title") "Title ##"
    [1:12] end-atx(2):natural
    "###);
}

#[test]
fn fenced_code_inside_quote() {
    let tokens = tokens("> ```rust\n> let x = 1;\n> ```\n");
    insta::assert_snapshot!(dump(&tokens), @r#"
    [1:1] start-block-quote "> "
    [1:3] start-fcode-block(```rust) "```rust\n"
    [2:3] text("let x = 1;") prefix="> " "let x = 1;\n"
    [3:3] end-fcode-block(```rust):natural prefix="> " "```\n"
    [3:6] end-block-quote:forced
    "#);
}

#[test]
fn fence_is_forced_closed_with_its_quote() {
    let tokens = tokens("> ```\n> code\nafter");
    let ends: Vec<_> = tokens
        .iter()
        .filter(|t| t.is_end())
        .map(ToString::to_string)
        .collect();
    assert_eq!(
        ends,
        vec![
            "[3:1] end-fcode-block(```):forced",
            "[3:1] end-block-quote:forced",
            "[3:6] end-para:forced",
        ]
    );
}

#[test]
fn fence_content_is_not_parsed_for_containers() {
    let tokens = tokens("```\n> not a quote\n- nor a list\n```");
    assert!(tokens.iter().all(|t| t.opened_container().is_none()));
}

#[test]
fn blank_lines_inside_indented_code_are_held() {
    let tokens = tokens("    a\n\n    b\n\nc");
    insta::assert_snapshot!(dump(&tokens), @r#"
    [1:5] start-icode-block
    [1:5] text("a") "    a\n"
    [2:1] text("") "\n"
    [3:5] text("b") "    b\n"
    [4:1] end-icode-block:natural
    [4:1] blank "\n"
    [5:1] start-para
    [5:1] text("c") "c"
    [5:2] end-para:forced
    "#);
}

// Source positions

#[test]
fn columns_refer_to_original_characters_after_tabs() {
    let tokens = tokens("-\tfoo");
    let text = tokens
        .iter()
        .find(|t| matches!(t.kind, TokenKind::LeafContent { .. }))
        .unwrap();
    assert_eq!(text.column_number, 3);
    assert!(matches!(&text.kind, TokenKind::LeafContent { text, .. } if text == "foo"));
}

#[test]
fn tab_width_changes_classification() {
    let rope = Rope::from("\tcode");
    assert_eq!(
        leaf_starts(&tokenize_rope(&rope, 4)),
        vec![LeafKind::IndentedCode]
    );
    assert_eq!(
        leaf_starts(&tokenize_rope(&rope, 2)),
        vec![LeafKind::Paragraph]
    );
}

#[test]
fn crlf_endings_round_trip() {
    tokens("> a\r\n> b\r\n\r\n- c\r\n");
}

#[test]
fn empty_document_has_no_tokens() {
    assert!(tokens("").is_empty());
}
