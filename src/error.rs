//! Error types for the code anonymizer.

use thiserror::Error;

/// Main error type for anonymize and revert operations.
#[derive(Error, Debug)]
pub enum AnonymizerError {
    #[error("No active selection")]
    NoActiveContext,

    #[error("Selection is empty")]
    EmptySelection,

    #[error("No mapping available")]
    NoMappingAvailable,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Could not determine a location for the mapping store")]
    StorePath,
}

/// Result type alias for anonymizer operations.
pub type Result<T> = std::result::Result<T, AnonymizerError>;
