//! Diagnostic sink for caught failures.

use netflix_fetch::ApiError;
use tracing::error;

use crate::error::Operation;

/// Receives every caught failure in full before it is collapsed into a
/// [`NetflixError`](crate::NetflixError).
pub trait DiagnosticSink: Send + Sync {
    /// Reports a failure caught at `operation`.
    fn report(&self, operation: Operation, error: &ApiError);
}

/// Default sink: logs through `tracing` at error level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, operation: Operation, error: &ApiError) {
        error!(
            operation = operation.as_str(),
            kind = ?error.kind(),
            error = %error,
            detail = ?error,
            "Operation failed"
        );
    }
}
