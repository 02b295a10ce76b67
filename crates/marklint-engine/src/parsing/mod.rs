pub mod blocks;
pub mod source;
pub mod token;

#[cfg(test)]
mod tests;

use xi_rope::Rope;

use blocks::Tokenizer;
use source::{DEFAULT_TAB_WIDTH, SourceBuffer, lines_with_spans};
use token::Token;

/// Tokenizes a document with the default tab stop.
pub fn tokenize(text: &str) -> Vec<Token> {
    tokenize_rope(&Rope::from(text), DEFAULT_TAB_WIDTH)
}

pub fn tokenize_rope(rope: &Rope, tab_width: usize) -> Vec<Token> {
    let mut tokenizer = Tokenizer::new();
    for line in lines_with_spans(rope, tab_width) {
        tokenizer.push_line(&line);
    }
    tokenizer.finish()
}

/// Tokenizes lines that were already materialized.
pub fn tokenize_buffer(buffer: &SourceBuffer) -> Vec<Token> {
    let mut tokenizer = Tokenizer::new();
    for line in buffer.lines() {
        tokenizer.push_line(line);
    }
    let tokens = tokenizer.finish();
    log::debug!(
        "tokenized {} lines into {} tokens",
        buffer.len(),
        tokens.len()
    );
    tokens
}
