use glob::{MatchOptions, Pattern};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_TAB_WIDTH: usize = 4;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid ignore pattern {pattern:?}: {source}")]
    InvalidIgnorePattern {
        pattern: String,
        source: glob::PatternError,
    },

    #[error("tab_width must be at least 1")]
    InvalidTabWidth,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Tab stop used for column arithmetic.
    pub tab_width: usize,
    /// Rule ids or aliases to switch off.
    pub disabled_rules: Vec<String>,
    /// Glob patterns of files to skip.
    pub ignore: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tab_width: DEFAULT_TAB_WIDTH,
            disabled_rules: vec![],
            ignore: vec![],
        }
    }
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        // Expand shell variables and tilde in ignore patterns
        config.ignore = config
            .ignore
            .into_iter()
            .map(|pattern| Self::expand_pattern(&pattern).unwrap_or(pattern))
            .collect();
        config.validate()?;

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/marklint");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tab_width == 0 {
            return Err(ConfigError::InvalidTabWidth);
        }
        self.ignore_set().map(|_| ())
    }

    /// Compiles the `ignore` patterns.
    pub fn ignore_set(&self) -> Result<IgnoreSet, ConfigError> {
        let patterns = self
            .ignore
            .iter()
            .map(|pattern| {
                Pattern::new(pattern).map_err(|source| ConfigError::InvalidIgnorePattern {
                    pattern: pattern.clone(),
                    source,
                })
            })
            .collect::<Result<_, _>>()?;
        Ok(IgnoreSet { patterns })
    }

    fn expand_pattern(pattern: &str) -> Option<String> {
        match shellexpand::full(pattern) {
            Ok(expanded) => Some(expanded.into_owned()),
            Err(_) => None,
        }
    }
}

/// Compiled ignore patterns.
#[derive(Debug, Clone, Default)]
pub struct IgnoreSet {
    patterns: Vec<Pattern>,
}

impl IgnoreSet {
    /// A pattern matches either the whole path or its file name.
    pub fn is_ignored(&self, path: &Path) -> bool {
        let options = MatchOptions {
            require_literal_separator: true,
            ..MatchOptions::new()
        };
        let file_name = path.file_name().map(Path::new);
        self.patterns.iter().any(|pattern| {
            pattern.matches_path_with(path, options)
                || file_name.is_some_and(|name| pattern.matches_path_with(name, options))
        })
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
