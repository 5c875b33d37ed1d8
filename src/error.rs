//! Error types for the record store.

use crate::schema::ValidationError;
use thiserror::Error;

/// Main error type for store operations.
///
/// Messages are part of the contract: callers and tests match on the exact
/// text, so variants print without any prefix.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file is not valid JSON. Carries the parser's message.
    #[error("{0}")]
    Parse(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    // --- Usage errors ---
    #[error("no file path was provided")]
    MissingPath,

    #[error("cannot call with no arguments")]
    NoArguments,

    #[error("options object or a callback function is required")]
    MissingSelector,

    #[error("index must be a number")]
    InvalidIndex,

    #[error("prop must be an array with exactly 2 items")]
    InvalidProp,

    #[error("invalid options: {0}")]
    InvalidOptions(String),

    #[error("must provide a valid schema if using one")]
    InvalidSchema,

    #[error(".json file must be an array")]
    NotAnArray,

    #[error("element at index {0} is not an object")]
    NotAnObject(usize),

    // --- Not-found errors ---
    #[error("did not find element at index {0}")]
    IndexNotFound(i64),

    /// A numeric index that is not a whole number within `i64`.
    #[error("did not find element at index {0}")]
    FractionalIndex(f64),

    #[error("did not find element with key {key} and value {value}")]
    PropNotFound { key: String, value: String },

    #[error("did not find element with callback function")]
    PredicateNotFound,

    #[error("limit option must not be below 1")]
    LimitBelowOne,
}

impl StoreError {
    /// Wrong argument shapes, missing arguments or a malformed payload.
    pub fn is_usage(&self) -> bool {
        matches!(
            self,
            StoreError::MissingPath
                | StoreError::NoArguments
                | StoreError::MissingSelector
                | StoreError::InvalidIndex
                | StoreError::InvalidProp
                | StoreError::InvalidOptions(_)
                | StoreError::InvalidSchema
                | StoreError::NotAnArray
                | StoreError::NotAnObject(_)
        )
    }

    /// A selector or pagination option that addresses nothing.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StoreError::IndexNotFound(_)
                | StoreError::FractionalIndex(_)
                | StoreError::PropNotFound { .. }
                | StoreError::PredicateNotFound
                | StoreError::LimitBelowOne
        )
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
