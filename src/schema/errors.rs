//! Construction-time errors
//!
//! A malformed schema is reported when the guard is built, never deferred
//! to the first call.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for schema construction
pub type ConfigResult<T> = Result<T, ConfigError>;

/// A schema or contract that cannot be turned into a guard.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown kind '{0}'")]
    UnknownKind(String),

    #[error("invalid pattern /{pattern}/: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("field '{field}': nested object schemas are not supported")]
    NestedObject { field: String },

    #[error("unions cannot contain unions")]
    NestedUnion,

    #[error("a union needs at least one member")]
    EmptyUnion,

    #[error("field '{0}' is declared more than once")]
    DuplicateField(String),

    #[error("{0} is not allowed in a descriptor position")]
    Misplaced(&'static str),

    #[error("unsupported schema shape: {0}")]
    Unsupported(String),

    #[error("contract '{0}' is already registered")]
    DuplicateContract(String),

    #[error("cannot read contract '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed contract '{}': {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl ConfigError {
    /// Returns a stable error code
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::UnknownKind(_) => "FNGUARD_UNKNOWN_KIND",
            ConfigError::InvalidPattern { .. } => "FNGUARD_INVALID_PATTERN",
            ConfigError::NestedObject { .. } => "FNGUARD_NESTED_OBJECT",
            ConfigError::NestedUnion => "FNGUARD_NESTED_UNION",
            ConfigError::EmptyUnion => "FNGUARD_EMPTY_UNION",
            ConfigError::DuplicateField(_) => "FNGUARD_DUPLICATE_FIELD",
            ConfigError::Misplaced(_) => "FNGUARD_MISPLACED_MARKER",
            ConfigError::Unsupported(_) => "FNGUARD_UNSUPPORTED_SHAPE",
            ConfigError::DuplicateContract(_) => "FNGUARD_DUPLICATE_CONTRACT",
            ConfigError::Io { .. } => "FNGUARD_CONTRACT_IO",
            ConfigError::Json { .. } => "FNGUARD_CONTRACT_MALFORMED",
        }
    }
}
