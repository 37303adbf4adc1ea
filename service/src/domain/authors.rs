use std::future::Future;

use editorial_common::AuthorId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Read access to the authors service.
pub trait AuthorDirectory: Clone + Send + Sync + 'static {
    /// Whether an author with this id is registered
    fn author_exists(
        &self,
        id: AuthorId,
    ) -> impl Future<Output = Result<bool, AuthorDirectoryError>> + Send;

    /// Public profile of an author, `None` when unknown
    fn author(
        &self,
        id: AuthorId,
    ) -> impl Future<Output = Result<Option<AuthorSummary>, AuthorDirectoryError>> + Send;
}

/// What the authors service tells about an author
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorSummary {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthorDirectoryError {
    #[error("authors service is unreachable: {0}")]
    Unavailable(String),

    #[error("authors service returned an unexpected response: {0}")]
    InvalidResponse(String),
}
