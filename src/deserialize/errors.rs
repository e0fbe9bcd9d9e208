//! Reconstruction error types
//!
//! Every failure is fatal to the call: the driver propagates the first
//! error and never exposes a half-built schema.

use thiserror::Error;

use crate::pattern::PatternError;

/// Result type for reconstruction operations
pub type DeserializeResult<T> = Result<T, DeserializeError>;

/// Reconstruction failures
#[derive(Debug, Error)]
pub enum DeserializeError {
    /// The description names a kind the registry does not know
    #[error("unknown schema type '{0}'")]
    UnknownType(String),

    /// No handler found along the full inheritance chain
    #[error("no {category} handler found for '{name}' on type '{kind}'")]
    NoHandler {
        category: &'static str,
        kind: &'static str,
        name: String,
    },

    /// A regex literal failed to parse
    #[error(transparent)]
    Pattern(#[from] PatternError),

    /// A presence flag value outside required/optional/forbidden
    #[error("unknown presence mode {0}")]
    UnknownPresence(String),

    /// A dependency relation name outside the known set
    #[error("unknown dependency relation '{0}'")]
    UnknownRelation(String),

    /// A handler argument with the wrong shape
    #[error("invalid argument for '{name}': expected {expected}")]
    InvalidArgument {
        name: String,
        expected: &'static str,
    },

    /// A nested value that does not parse as a description
    #[error("nested value is not a valid description: {0}")]
    InvalidDescription(#[from] serde_json::Error),

    /// A date bound that is not RFC 3339
    #[error("invalid date bound '{value}': {source}")]
    InvalidDate {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    /// Input nested past the recursion ceiling
    #[error("description nesting exceeds {0} levels")]
    DepthExceeded(usize),
}
