//! code_anonymizer - reversible identifier anonymization for code snippets
//!
//! Strips comments and replaces every identifier in a snippet with a
//! sequential placeholder (`var1`, `var2`, ...) so the code can be shared
//! with an external tool without revealing its names. The mapping is saved,
//! and code that comes back (edited or not) can be restored to the original
//! identifiers.
//!
//! # Example Usage
//!
//! ```
//! use code_anonymizer::privacy::{Anonymizer, Deanonymizer};
//!
//! let anonymizer = Anonymizer::new();
//! let result = anonymizer.anonymize_source("let total = price * qty; // per order");
//! assert_eq!(result.code, "let var1 = var2 * var3; ");
//!
//! let restored = Deanonymizer::new().revert("let var1 = var2 * var3 * 2;", &result.mapping);
//! assert_eq!(restored, "let total = price * qty * 2;");
//! ```

pub mod commands;
pub mod config;
pub mod error;
pub mod host;
pub mod privacy;
pub mod store;
pub mod terminal;

// Re-export commonly used types
pub use commands::{anonymize_selection, revert_selection, CommandOutcome};
pub use config::Config;
pub use error::{AnonymizerError, Result};
pub use host::{Host, NoticeKind};
pub use privacy::{AnonymizedCode, Anonymizer, Deanonymizer, NameMapping};
pub use store::{FileMappingStore, MappingStore, MemoryMappingStore, StoredMapping};
