//! Built-in rules.

mod md010;
mod md018;
mod md032;

pub use md010::NoHardTabs;
pub use md018::NoMissingSpaceAtx;
pub use md032::BlanksAroundLists;

use crate::plugins::Plugin;

/// Fresh instances of every built-in rule, in id order.
pub fn builtin() -> Vec<Box<dyn Plugin>> {
    vec![
        Box::new(NoHardTabs),
        Box::new(NoMissingSpaceAtx::default()),
        Box::new(BlanksAroundLists::default()),
    ]
}
