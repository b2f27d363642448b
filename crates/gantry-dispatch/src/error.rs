//! Dispatcher error types.

use thiserror::Error;

use crate::clients::ClientError;

/// Result type alias for dispatcher operations.
pub type DispatchResult<T> = Result<T, DispatchError>;

/// Errors surfaced to dispatcher callers.
///
/// Backend failures pass through unchanged; the wrapper adds only the
/// operation name and addressing key so the caller can tell which
/// submission failed.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("{operation} failed for {key}: {source}")]
    Backend {
        operation: &'static str,
        key: String,
        #[source]
        source: ClientError,
    },

    /// A caller-side invariant did not hold; no backend call was made.
    #[error("{operation} precondition failed for {key}: {reason}")]
    Precondition {
        operation: &'static str,
        key: String,
        reason: &'static str,
    },
}
