//! Comment removal ahead of anonymization.
//!
//! Comments routinely carry the very names and context the anonymizer is
//! meant to hide, so they are dropped rather than renamed. Stripping is purely
//! textual: a `//` or `/*` inside a string literal still starts a comment
//! (`"http://host"` loses `//host"`).

use regex::Regex;

/// Removes `//` line comments and `/* */` block comments.
#[derive(Debug, Clone)]
pub struct CommentStripper {
    line_comment: Regex,
    block_comment: Regex,
}

impl CommentStripper {
    /// Create a new comment stripper.
    pub fn new() -> Self {
        Self {
            // Stops before any line terminator so the line itself survives.
            line_comment: Regex::new(r"//[^\n\r\x{2028}\x{2029}]*")
                .expect("line comment pattern is valid"),
            // Non-greedy: the first `*/` closes the comment.
            block_comment: Regex::new(r"(?s)/\*.*?\*/").expect("block comment pattern is valid"),
        }
    }

    /// Strip all comments from `code`.
    ///
    /// Line comments are removed first, then block comments.
    pub fn strip(&self, code: &str) -> String {
        let without_lines = self.line_comment.replace_all(code, "");
        self.block_comment.replace_all(&without_lines, "").into_owned()
    }
}

impl Default for CommentStripper {
    fn default() -> Self {
        Self::new()
    }
}

/// Strip comments with a default [`CommentStripper`].
pub fn strip_comments(code: &str) -> String {
    CommentStripper::new().strip(code)
}
