//! # Block Tokenizing
//!
//! Line-at-a-time resolution of nested block containers into a token stream.
//!
//! ## Per-line phases
//!
//! 1. **Container matching** (`containers`): walk the open stack outer to
//!    inner and find how many frames the line's prefix continues
//! 2. **Container opening** (`builder`): new block quote and list markers
//!    after the matched prefix; unmatched frames are closed (forced) or kept
//!    open for a lazy paragraph line
//! 3. **Leaf classification** (`classify`): the remainder becomes a blank
//!    line, heading, thematic break, code block or paragraph text
//!
//! ## Modules
//!
//! - **`types`**: `ContainerKind`, `ContainerFrame`, `ListItem`, `LeafKind`
//! - **`kinds`**: Block-specific recognizers with owned delimiters
//! - **`containers`**: `ContainerPath`, the open stack and its matcher
//! - **`classify`**: `MarkdownLineClassifier` produces a `LeafClass`
//! - **`builder`**: `Tokenizer`, which owns the stack and emits tokens
//!
//! ## Key Invariants
//!
//! - Nesting depth is unbounded (lists in blockquotes in lists, etc.)
//! - Start and end tokens nest; the stack is empty after `finish`
//! - Fenced code blocks are raw zones: no container markers inside
//! - Token positions never move backwards

pub mod builder;
pub mod classify;
pub mod containers;
pub mod kinds;
pub mod types;

pub use builder::Tokenizer;
pub use classify::{LeafClass, MarkdownLineClassifier};
pub use containers::{ContainerMatch, ContainerPath};
pub use types::{ContainerFrame, ContainerKind, LeafKind, ListItem};
