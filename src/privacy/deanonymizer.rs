//! Restoration of original identifiers.

use super::mapping::NameMapping;
use super::word_pattern;
use regex::{Captures, Regex};
use tracing::debug;

/// Replaces whole-word placeholders with the names they stand for.
///
/// The text is scanned once and every maximal word is looked up in the
/// mapping, so `var1` never matches inside `var10` and a restored name is
/// never substituted a second time. The result does not depend on the order
/// of mapping entries.
#[derive(Debug, Clone)]
pub struct Deanonymizer {
    word: Regex,
}

impl Deanonymizer {
    pub fn new() -> Self {
        Self {
            word: word_pattern(),
        }
    }

    /// Revert every placeholder in `text` using `mapping`.
    pub fn revert(&self, text: &str, mapping: &NameMapping) -> String {
        let mut restored = 0usize;
        let result = self
            .word
            .replace_all(text, |caps: &Captures| {
                let word = &caps[0];
                match mapping.to_original(word) {
                    Some(original) => {
                        restored += 1;
                        original.to_string()
                    }
                    None => word.to_string(),
                }
            })
            .into_owned();

        debug!("Restored {} placeholder occurrences", restored);
        result
    }
}

impl Default for Deanonymizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Revert `text` with a default [`Deanonymizer`].
pub fn revert(text: &str, mapping: &NameMapping) -> String {
    Deanonymizer::new().revert(text, mapping)
}
