//! # Plugins
//!
//! Rules are plugins fed from one tokenized file at a time:
//!
//! 1. `starting_new_file` on every enabled plugin
//! 2. `next_line` for each physical line, to plugins subscribed to lines
//! 3. `next_token` for each token in document order, to plugins subscribed
//!    to tokens
//! 4. `completed_file` on every enabled plugin
//!
//! Subscriptions come from [`Plugin::hooks`], read once when the plugin is
//! registered.

use serde::Serialize;

use crate::parsing::{source::SourceBuffer, token::Token};

#[derive(Debug, thiserror::Error)]
pub enum PluginError {
    #[error("Plugin {plugin_id} failed during {action}: {source}")]
    HookFailed {
        plugin_id: String,
        action: &'static str,
        #[source]
        source: anyhow::Error,
    },
    #[error("Plugin id already registered: {0}")]
    DuplicateId(String),
    #[error("Unknown rule: {0}")]
    UnknownRule(String),
}

/// Identity of a plugin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PluginMetadata {
    /// Rule id such as `md032`.
    pub id: &'static str,
    /// Readable names such as `blanks-around-lists`.
    pub aliases: &'static [&'static str],
    pub description: &'static str,
}

impl PluginMetadata {
    /// Whether `name` is this plugin's id or one of its aliases, ignoring case.
    #[must_use]
    pub fn answers_to(&self, name: &str) -> bool {
        self.id.eq_ignore_ascii_case(name) || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(name))
    }
}

/// Which per-line and per-token hooks a plugin wants called.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PluginHooks {
    pub next_line: bool,
    pub next_token: bool,
}

/// One reported problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleViolation {
    pub rule_id: String,
    pub rule_name: String,
    pub description: String,
    pub line_number: usize,
    pub column_number: usize,
    /// Byte offset of the position in the file, when the line exists.
    pub offset: Option<usize>,
    pub extra: Option<String>,
}

impl std::fmt::Display for RuleViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}: {}: {} ({})",
            self.line_number, self.column_number, self.rule_id, self.description, self.rule_name
        )?;
        if let Some(extra) = &self.extra {
            write!(f, " [{extra}]")?;
        }
        Ok(())
    }
}

/// Handed to hooks so they can report against the running plugin.
pub struct ScanContext<'a> {
    metadata: PluginMetadata,
    source: &'a SourceBuffer,
    violations: &'a mut Vec<RuleViolation>,
}

impl ScanContext<'_> {
    pub fn report(&mut self, line_number: usize, column_number: usize, extra: Option<String>) {
        self.violations.push(RuleViolation {
            rule_id: self.metadata.id.to_ascii_uppercase(),
            rule_name: self.metadata.aliases.first().copied().unwrap_or_default().to_string(),
            description: self.metadata.description.to_string(),
            line_number,
            column_number,
            offset: self.source.offset_of(line_number, column_number),
            extra,
        });
    }
}

/// A lint rule driven by the token stream.
///
/// Every hook has a no-op default; override the ones you need and declare
/// them in [`Plugin::hooks`].
pub trait Plugin {
    fn metadata(&self) -> PluginMetadata;

    fn hooks(&self) -> PluginHooks {
        PluginHooks::default()
    }

    /// Resets per-file state.
    fn starting_new_file(&mut self) {}

    fn next_line(
        &mut self,
        _context: &mut ScanContext<'_>,
        _line_number: usize,
        _line: &str,
    ) -> anyhow::Result<()> {
        Ok(())
    }

    fn next_token(&mut self, _context: &mut ScanContext<'_>, _token: &Token) -> anyhow::Result<()> {
        Ok(())
    }

    fn completed_file(
        &mut self,
        _context: &mut ScanContext<'_>,
        _final_line_number: usize,
    ) -> anyhow::Result<()> {
        Ok(())
    }
}

struct Registered {
    plugin: Box<dyn Plugin>,
    metadata: PluginMetadata,
    hooks: PluginHooks,
    enabled: bool,
}

/// Owns the registered plugins and dispatches one file at a time to them.
#[derive(Default)]
pub struct PluginManager {
    plugins: Vec<Registered>,
    line_subscribers: Vec<usize>,
    token_subscribers: Vec<usize>,
}

impl PluginManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// A manager with every built-in rule registered.
    pub fn with_builtin_rules() -> Self {
        let mut manager = Self::new();
        for plugin in crate::rules::builtin() {
            let registered = manager.register(plugin);
            debug_assert!(registered.is_ok(), "built-in rule ids collide: {registered:?}");
        }
        manager
    }

    pub fn register(&mut self, plugin: Box<dyn Plugin>) -> Result<(), PluginError> {
        let metadata = plugin.metadata();
        if self.plugins.iter().any(|p| p.metadata.id == metadata.id) {
            return Err(PluginError::DuplicateId(metadata.id.to_string()));
        }
        let hooks = plugin.hooks();
        log::debug!(
            "registered plugin {} (lines: {}, tokens: {})",
            metadata.id,
            hooks.next_line,
            hooks.next_token
        );
        self.plugins.push(Registered {
            plugin,
            metadata,
            hooks,
            enabled: true,
        });
        self.refresh_subscribers();
        Ok(())
    }

    /// Disables the plugin answering to `name` (id or alias).
    pub fn disable(&mut self, name: &str) -> Result<(), PluginError> {
        let registered = self
            .plugins
            .iter_mut()
            .find(|p| p.metadata.answers_to(name))
            .ok_or_else(|| PluginError::UnknownRule(name.to_string()))?;
        registered.enabled = false;
        self.refresh_subscribers();
        Ok(())
    }

    pub fn metadata(&self) -> impl Iterator<Item = PluginMetadata> + '_ {
        self.plugins.iter().map(|p| p.metadata)
    }

    pub fn enabled(&self) -> impl Iterator<Item = PluginMetadata> + '_ {
        self.plugins.iter().filter(|p| p.enabled).map(|p| p.metadata)
    }

    fn refresh_subscribers(&mut self) {
        let subscribed = |wants: fn(&PluginHooks) -> bool| -> Vec<usize> {
            self.plugins
                .iter()
                .enumerate()
                .filter(|(_, p)| p.enabled && wants(&p.hooks))
                .map(|(index, _)| index)
                .collect()
        };
        let lines = subscribed(|h| h.next_line);
        let tokens = subscribed(|h| h.next_token);
        self.line_subscribers = lines;
        self.token_subscribers = tokens;
    }

    /// Runs every enabled plugin over one file.
    ///
    /// A failing hook stops the scan of this file only; the manager is
    /// ready for the next file.
    pub fn scan(
        &mut self,
        source: &SourceBuffer,
        tokens: &[Token],
    ) -> Result<Vec<RuleViolation>, PluginError> {
        let mut violations = vec![];

        for registered in self.plugins.iter_mut().filter(|p| p.enabled) {
            registered.plugin.starting_new_file();
        }

        for line in source.lines() {
            for &index in &self.line_subscribers {
                let registered = &mut self.plugins[index];
                let mut context = ScanContext {
                    metadata: registered.metadata,
                    source,
                    violations: &mut violations,
                };
                registered
                    .plugin
                    .next_line(&mut context, line.number, &line.text)
                    .map_err(|source| hook_failed(&registered.metadata, "next_line", source))?;
            }
        }

        for token in tokens {
            for &index in &self.token_subscribers {
                let registered = &mut self.plugins[index];
                let mut context = ScanContext {
                    metadata: registered.metadata,
                    source,
                    violations: &mut violations,
                };
                registered
                    .plugin
                    .next_token(&mut context, token)
                    .map_err(|source| hook_failed(&registered.metadata, "next_token", source))?;
            }
        }

        let final_line_number = source.len();
        for registered in self.plugins.iter_mut().filter(|p| p.enabled) {
            let mut context = ScanContext {
                metadata: registered.metadata,
                source,
                violations: &mut violations,
            };
            registered
                .plugin
                .completed_file(&mut context, final_line_number)
                .map_err(|source| hook_failed(&registered.metadata, "completed_file", source))?;
        }

        violations.sort_by(|a, b| {
            (a.line_number, a.column_number, &a.rule_id).cmp(&(
                b.line_number,
                b.column_number,
                &b.rule_id,
            ))
        });
        Ok(violations)
    }
}

fn hook_failed(metadata: &PluginMetadata, action: &'static str, source: anyhow::Error) -> PluginError {
    log::warn!("plugin {} failed during {action}: {source}", metadata.id);
    PluginError::HookFailed {
        plugin_id: metadata.id.to_string(),
        action,
        source,
    }
}
