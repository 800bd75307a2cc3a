//! Core error types for netflix2.

use thiserror::Error;

/// Core error type for model-level operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A required field is empty.
    #[error("{0} must not be empty")]
    EmptyField(&'static str),
}
