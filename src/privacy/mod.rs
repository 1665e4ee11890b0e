//! Reversible code anonymization.
//!
//! The pipeline has three stages:
//!
//! 1. **Comment stripping**: comments are dropped before tokenization.
//! 2. **Anonymization**: every non-keyword identifier is replaced with a
//!    sequential placeholder, recording a [`NameMapping`].
//! 3. **Restoration**: placeholders in (possibly edited) code are mapped back
//!    to the original names with whole-word matching.

mod anonymizer;
mod comments;
mod deanonymizer;
mod mapping;

pub use anonymizer::*;
pub use comments::*;
pub use deanonymizer::*;
pub use mapping::*;

use regex::Regex;

/// A maximal run of ASCII word characters. Anything else, including
/// non-ASCII text, separates words.
const WORD_PATTERN: &str = r"[A-Za-z0-9_]+";

fn word_pattern() -> Regex {
    Regex::new(WORD_PATTERN).expect("word pattern is valid")
}

/// Whether a word run starts an identifier rather than a number.
fn is_identifier_start(word: &str) -> bool {
    word.bytes()
        .next()
        .map(|b| b.is_ascii_alphabetic() || b == b'_')
        .unwrap_or(false)
}
