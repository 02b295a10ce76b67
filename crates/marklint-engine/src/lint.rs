//! Linting whole files: read, tokenize, dispatch to plugins.

use std::path::{Path, PathBuf};

use serde::Serialize;
use xi_rope::Rope;

use crate::io::{self, IoError};
use crate::parsing::{source::SourceBuffer, tokenize_buffer};
use crate::plugins::{PluginError, PluginManager, RuleViolation};

#[derive(Debug, thiserror::Error)]
pub enum LintError {
    #[error(transparent)]
    Io(#[from] IoError),
    #[error("{path}: {source}")]
    Plugin {
        path: PathBuf,
        #[source]
        source: PluginError,
    },
}

/// Violations found in one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub violations: Vec<RuleViolation>,
}

impl FileReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }
}

pub struct Linter {
    manager: PluginManager,
    tab_width: usize,
}

impl Linter {
    /// A linter running every built-in rule.
    pub fn new(tab_width: usize) -> Self {
        Self::with_manager(PluginManager::with_builtin_rules(), tab_width)
    }

    pub fn with_manager(manager: PluginManager, tab_width: usize) -> Self {
        Self { manager, tab_width }
    }

    pub fn disable(&mut self, rule: &str) -> Result<(), PluginError> {
        self.manager.disable(rule)
    }

    pub fn manager(&self) -> &PluginManager {
        &self.manager
    }

    pub fn lint_str(&mut self, text: &str) -> Result<Vec<RuleViolation>, PluginError> {
        self.lint_rope(&Rope::from(text))
    }

    fn lint_rope(&mut self, rope: &Rope) -> Result<Vec<RuleViolation>, PluginError> {
        let source = SourceBuffer::from_rope(rope, self.tab_width);
        let tokens = tokenize_buffer(&source);
        self.manager.scan(&source, &tokens)
    }

    pub fn lint_file(&mut self, path: &Path) -> Result<FileReport, LintError> {
        let content = io::read_file(path)?;
        let violations = self.lint_str(&content).map_err(|source| LintError::Plugin {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("{}: {} violation(s)", path.display(), violations.len());
        Ok(FileReport {
            path: path.to_path_buf(),
            violations,
        })
    }

    /// Lints every file, carrying on past files that fail.
    pub fn lint_files(&mut self, paths: &[PathBuf]) -> Vec<Result<FileReport, LintError>> {
        paths.iter().map(|path| self.lint_file(path)).collect()
    }
}
