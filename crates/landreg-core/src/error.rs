//! # Error Types
//!
//! Errors raised by the foundational types. Workflow and ledger errors
//! live next to the code that raises them and wrap
//! [`CanonicalizationError`] via `#[from]`.

use thiserror::Error;

/// Invalid foundational value.
#[derive(Error, Debug)]
pub enum LandregError {
    /// A value failed validation at construction.
    #[error("validation error: {0}")]
    Validation(String),
}

/// Error while encoding a record or a hash input.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// Ledger records carry integers and strings only.
    #[error("float values are not permitted in ledger records: {0}")]
    FloatRejected(f64),

    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}
