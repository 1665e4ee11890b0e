//! Identifier anonymization.
//!
//! Identifiers are replaced with sequential placeholders (`var1`, `var2`, ...)
//! so code can be shared without its names. Keywords are left alone. The
//! returned [`NameMapping`] makes the renaming reversible.
//!
//! Tokenization is lexical and language-agnostic: an identifier is a maximal
//! run of `[A-Za-z_][A-Za-z0-9_]*` that does not start in the middle of a
//! word, so the `abc` in `1abc` or the `F` in `0x1F` is never touched.

use super::comments::CommentStripper;
use super::mapping::NameMapping;
use super::{is_identifier_start, word_pattern};
use crate::config::AnonymizerConfig;
use crate::error::Result;
use regex::{Captures, Regex};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Reserved words that are never renamed. Matching ignores ASCII case.
#[derive(Debug, Clone, Default)]
pub struct KeywordSet {
    words: HashSet<String>,
}

impl KeywordSet {
    /// Build a set from `words`, folding them to lowercase.
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words
                .into_iter()
                .map(|w| w.as_ref().to_ascii_lowercase())
                .collect(),
        }
    }

    /// Whether `token` is a keyword, ignoring ASCII case.
    pub fn contains(&self, token: &str) -> bool {
        self.words.contains(&token.to_ascii_lowercase())
    }

    /// Number of distinct keywords.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Whether the set holds no keywords.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Result of anonymizing code.
#[derive(Debug, Clone)]
pub struct AnonymizedCode {
    /// The anonymized source code.
    pub code: String,
    /// Mapping from placeholders to original names.
    pub mapping: NameMapping,
    /// Source identifiers that already had the shape of a placeholder.
    pub placeholder_lookalikes: Vec<String>,
}

impl AnonymizedCode {
    /// Restore an identifier to its original form.
    pub fn restore_identifier(&self, placeholder: &str) -> Option<&str> {
        self.mapping.to_original(placeholder)
    }

    /// Restore every placeholder in `text` to its original name.
    pub fn restore(&self, text: &str) -> String {
        super::revert(text, &self.mapping)
    }
}

/// Lexical code anonymizer.
#[derive(Debug, Clone)]
pub struct Anonymizer {
    keywords: KeywordSet,
    placeholder_prefix: String,
    strip_comments: bool,
    stripper: CommentStripper,
    word: Regex,
}

impl Anonymizer {
    /// Create a new anonymizer with the default configuration.
    pub fn new() -> Self {
        Self::build(&AnonymizerConfig::default())
    }

    /// Create a new anonymizer with custom configuration.
    pub fn with_config(config: &AnonymizerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: &AnonymizerConfig) -> Self {
        Self {
            keywords: KeywordSet::new(&config.keywords),
            placeholder_prefix: config.placeholder_prefix.clone(),
            strip_comments: config.strip_comments,
            stripper: CommentStripper::new(),
            word: word_pattern(),
        }
    }

    /// The keyword set in use.
    pub fn keywords(&self) -> &KeywordSet {
        &self.keywords
    }

    /// Strip comments (when enabled) and anonymize the remaining code.
    pub fn anonymize_source(&self, code: &str) -> AnonymizedCode {
        if self.strip_comments {
            self.anonymize(&self.stripper.strip(code))
        } else {
            self.anonymize(code)
        }
    }

    /// Anonymize identifiers in `code` as-is.
    pub fn anonymize(&self, code: &str) -> AnonymizedCode {
        let mut mapping = NameMapping::new();
        let mut lookalikes: Vec<String> = Vec::new();
        let mut occurrences = 0usize;

        let anonymized = self
            .word
            .replace_all(code, |caps: &Captures| {
                let word = &caps[0];
                if !is_identifier_start(word) || self.keywords.contains(word) {
                    return word.to_string();
                }

                occurrences += 1;
                if let Some(placeholder) = mapping.to_placeholder(word) {
                    return placeholder.to_string();
                }

                if self.looks_like_placeholder(word) && !lookalikes.iter().any(|l| l == word) {
                    lookalikes.push(word.to_string());
                }

                let placeholder = self.next_placeholder(&mapping);
                mapping.insert(placeholder.clone(), word);
                placeholder
            })
            .into_owned();

        debug!(
            "Anonymized {} occurrences of {} identifiers",
            occurrences,
            mapping.len()
        );
        if !lookalikes.is_empty() {
            warn!(
                "Source already contains placeholder-like identifiers: {}",
                lookalikes.join(", ")
            );
        }

        AnonymizedCode {
            code: anonymized,
            mapping,
            placeholder_lookalikes: lookalikes,
        }
    }

    /// Smallest unused `<prefix><N>`. Only assigned placeholders count as used.
    fn next_placeholder(&self, mapping: &NameMapping) -> String {
        let mut counter = mapping.len() + 1;
        loop {
            let candidate = format!("{}{}", self.placeholder_prefix, counter);
            if !mapping.is_placeholder(&candidate) {
                return candidate;
            }
            counter += 1;
        }
    }

    fn looks_like_placeholder(&self, word: &str) -> bool {
        word.strip_prefix(self.placeholder_prefix.as_str())
            .map(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()))
            .unwrap_or(false)
    }
}

impl Default for Anonymizer {
    fn default() -> Self {
        Self::new()
    }
}
