pub mod lines;
pub mod span;

pub use lines::{DEFAULT_TAB_WIDTH, SourceBuffer, SourceLine, expand_tabs, lines_with_spans};
pub use span::Span;
