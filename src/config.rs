//! Configuration management for the code anonymizer.

use crate::error::{AnonymizerError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Anonymization configuration
    #[serde(default)]
    pub anonymizer: AnonymizerConfig,

    /// Mapping store configuration
    #[serde(default)]
    pub store: StoreConfig,
}

/// Anonymization configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnonymizerConfig {
    /// Reserved words that are never renamed (matched case-insensitively)
    #[serde(default = "default_keywords")]
    pub keywords: Vec<String>,

    /// Prefix of generated placeholder names
    #[serde(default = "default_placeholder_prefix")]
    pub placeholder_prefix: String,

    /// Strip line and block comments before anonymizing
    #[serde(default = "default_true")]
    pub strip_comments: bool,
}

/// Mapping store configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// State file path (platform data directory if not specified)
    pub path: Option<PathBuf>,
}

/// Canonical keyword list.
pub const DEFAULT_KEYWORDS: &[&str] = &[
    "function", "if", "else", "return", "for", "while", "let", "const", "var",
    "class", "new", "this", "true", "false", "null", "undefined", "import",
    "export", "from", "await", "async", "try", "catch", "finally", "switch",
    "case", "default", "break", "continue", "do", "instanceof", "typeof",
];

fn default_keywords() -> Vec<String> {
    DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect()
}

fn default_placeholder_prefix() -> String {
    "var".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for AnonymizerConfig {
    fn default() -> Self {
        Self {
            keywords: default_keywords(),
            placeholder_prefix: default_placeholder_prefix(),
            strip_comments: true,
        }
    }
}

impl AnonymizerConfig {
    /// Check that the configuration can produce valid placeholders.
    pub fn validate(&self) -> Result<()> {
        let mut chars = self.placeholder_prefix.chars();
        match chars.next() {
            None => {
                return Err(AnonymizerError::Config(
                    "placeholder_prefix must not be empty".to_string(),
                ))
            }
            Some(c) if !(c.is_ascii_alphabetic() || c == '_') => {
                return Err(AnonymizerError::Config(format!(
                    "placeholder_prefix must start with a letter or '_', got {:?}",
                    self.placeholder_prefix
                )))
            }
            Some(_) => {}
        }
        if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(AnonymizerError::Config(format!(
                "placeholder_prefix may only contain [A-Za-z0-9_], got {:?}",
                self.placeholder_prefix
            )));
        }
        Ok(())
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.anonymizer.validate()?;
        Ok(config)
    }

    /// Create a configuration builder.
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for creating configurations programmatically.
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn keywords(mut self, keywords: Vec<String>) -> Self {
        self.config.anonymizer.keywords = keywords;
        self
    }

    pub fn extra_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.config.anonymizer.keywords.push(keyword.into());
        self
    }

    pub fn placeholder_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.anonymizer.placeholder_prefix = prefix.into();
        self
    }

    pub fn strip_comments(mut self, enable: bool) -> Self {
        self.config.anonymizer.strip_comments = enable;
        self
    }

    pub fn store_path(mut self, path: PathBuf) -> Self {
        self.config.store.path = Some(path);
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
