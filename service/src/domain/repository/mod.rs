use std::future::Future;

use editorial_common::{PublicationId, Version};

use crate::domain::publication::{NewPublication, Publication};
use crate::domain::repository::query::{Page, PublicationQuery};

pub mod query;

/// Storage of publications.
///
/// Implementations own the `(status, version)` pair of every publication.
/// Nothing but [`Lifecycle`](crate::domain::publication::lifecycle::Lifecycle)
/// may call [`compare_and_set`](PublicationRepository::compare_and_set);
/// writing status any other way breaks the transition graph guarantees.
pub trait PublicationRepository: Clone + Send + Sync + 'static {
    /// Store a new publication as a draft at version zero, assigning its id
    fn insert(
        &self,
        publication: NewPublication,
    ) -> impl Future<Output = Result<Publication, RepositoryError>> + Send;

    /// Find single publication by ID
    fn find_by_id(
        &self,
        id: PublicationId,
    ) -> impl Future<Output = Result<Option<Publication>, RepositoryError>> + Send;

    /// Find one page of publications matching query, ordered by id
    fn find(
        &self,
        query: PublicationQuery,
    ) -> impl Future<Output = Result<Page<Publication>, RepositoryError>> + Send;

    /// Atomically replace the lifecycle fields (status, review count, version,
    /// updated at) of `next.id` with those of `next`, only if the stored
    /// version still equals `expected_version`.
    fn compare_and_set(
        &self,
        next: &Publication,
        expected_version: Version,
    ) -> impl Future<Output = Result<Publication, RepositoryError>> + Send;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    NotFound,
    VersionMismatch { actual: Version },
    DatabaseError(String),
}
