//! Route store error types.

/// Errors from reading or writing the persisted route list.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The file is absent, empty or not a route list
    #[error("persisted routes unusable: {reason}")]
    MalformedState { reason: String },

    /// Writing the file failed
    #[error("failed to write routes: {message}")]
    Write { message: String },
}
