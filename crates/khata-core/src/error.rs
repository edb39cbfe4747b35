use std::io;

use thiserror::Error;

/// Transport-level failure reported by a remote store backend while
/// connected. Distinct from the offline condition, which is raised by the
/// coordinator before any remote call is attempted.
#[derive(Debug, Clone, Error)]
#[error("remote store failure: {message}")]
pub struct RemoteError {
    pub message: String,
}

impl RemoteError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Outcome taxonomy for remote writes issued through the coordinator.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The connectivity gate tripped before the remote call was attempted.
    /// Recoverable: the store answers by queueing the mutation.
    #[error("offline: remote write skipped")]
    Offline,
    /// The remote call itself failed while connected. Not recovered;
    /// propagates to the caller.
    #[error(transparent)]
    Remote(#[from] RemoteError),
}

impl SyncError {
    pub fn is_offline(&self) -> bool {
        matches!(self, SyncError::Offline)
    }
}

/// Local cache failure. Logged only, never surfaced to callers; the cache
/// is a best-effort mirror, not the source of truth.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serde(String),
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Sync(#[from] SyncError),
}

impl CoreError {
    /// Convenience for matching the recoverable offline condition through
    /// the store-level error type.
    pub fn is_offline(&self) -> bool {
        matches!(self, CoreError::Sync(SyncError::Offline))
    }
}
