pub mod io;
pub mod lint;
pub mod parsing;
pub mod plugins;
pub mod render;
pub mod rules;


// Re-export key types for easier usage
pub use io::*;
pub use lint::{FileReport, LintError, Linter};
pub use parsing::{
    source::{DEFAULT_TAB_WIDTH, SourceBuffer, SourceLine},
    token::{Token, TokenKind, dump},
    tokenize, tokenize_buffer, tokenize_rope,
};
pub use plugins::{
    Plugin, PluginError, PluginHooks, PluginManager, PluginMetadata, RuleViolation, ScanContext,
};
pub use render::render;
