use editorial_common::{AuthorId, PublicationId, PublicationStatus, Version};
use thiserror::Error;

/// Why a status change was refused.
/// Every variant carries the data a client needs to explain the refusal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    #[error("publication {0} not found")]
    NotFound(PublicationId),

    #[error("unrecognized publication status `{value}`")]
    InvalidStatusValue { value: String },

    #[error("cannot change publication status from {current} to {requested}")]
    InvalidTransition {
        current: PublicationStatus,
        requested: PublicationStatus,
    },

    #[error("publication is at version {actual}, request was based on version {expected}")]
    VersionConflict { expected: Version, actual: Version },

    #[error("publication store is unavailable: {0}")]
    StorageUnavailable(String),
}

impl LifecycleError {
    /// Only a conflict can succeed when retried, and only after re-reading.
    pub fn is_retryable(&self) -> bool {
        matches!(self, LifecycleError::VersionConflict { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PublicationError {
    #[error("publication {0} not found")]
    NotFound(PublicationId),

    #[error("invalid publication: {0}")]
    InvalidPublication(String),

    #[error("unrecognized publication status `{0}`")]
    InvalidStatus(String),

    #[error("author {0} does not exist")]
    AuthorNotFound(AuthorId),

    #[error("authors service is unavailable: {0}")]
    AuthorServiceUnavailable(String),

    #[error("publication store is unavailable: {0}")]
    StorageUnavailable(String),
}
