//! Error types for spanlink-core.
//!
//! Only caller-contract violations surface here. Stale or inapplicable
//! intents (an empty highlight, a pair on the same unit, any mutation in
//! overview mode) are no-ops and never produce an `Error`.

use thiserror::Error;

/// Result type for spanlink-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for spanlink-core operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// An index does not address a unit or relationship that exists.
    #[error("index {index} out of bounds (len {len})")]
    IndexOutOfBounds { index: usize, len: usize },

    /// A label id is not part of the active catalog.
    #[error("unknown label: {0}")]
    UnknownLabel(String),

    /// The separator pattern failed to compile.
    #[error("invalid separator pattern: {0}")]
    InvalidSeparator(#[from] regex::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create an out-of-bounds error.
    #[must_use]
    pub fn out_of_bounds(index: usize, len: usize) -> Self {
        Self::IndexOutOfBounds { index, len }
    }

    /// Create an unknown label error.
    #[must_use]
    pub fn unknown_label(label: impl Into<String>) -> Self {
        Self::UnknownLabel(label.into())
    }
}
