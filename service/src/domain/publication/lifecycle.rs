//! Publication lifecycle.
//!
//! A publication is created as a draft and walks the graph in
//! [`TRANSITION_TABLE`](editorial_common::TRANSITION_TABLE) until it reaches a
//! terminal status. [`Lifecycle::request_transition`] is the only path that
//! changes status. It checks the request against the table and the caller's
//! version, then writes through the store's compare-and-set so that two
//! concurrent requests against the same version can never both succeed.

use chrono::Utc;
use editorial_common::{PublicationId, PublicationStatus, Version};

use crate::domain::{
    publication::{Publication, error::LifecycleError},
    repository::{PublicationRepository, RepositoryError},
};

#[derive(Debug, Clone)]
pub struct Lifecycle<R> {
    repository: R,
}

/// An applied status change
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub previous_status: PublicationStatus,
    /// The publication as stored after the change
    pub publication: Publication,
}

impl Transition {
    pub fn status(&self) -> PublicationStatus {
        self.publication.status
    }

    pub fn version(&self) -> Version {
        self.publication.version
    }
}

/// Statuses a client may offer as the next step.
/// Advisory only, [`Lifecycle::request_transition`] checks again.
pub fn allowed_transitions(current: PublicationStatus) -> &'static [PublicationStatus] {
    current.allowed_transitions()
}

/// Decides whether `requested` may follow `current`.
///
/// A stale `expected_version` is reported before the table is consulted:
/// the caller judged the request against a status it no longer sees.
pub fn check_transition(
    current: PublicationStatus,
    stored_version: Version,
    requested: PublicationStatus,
    expected_version: Option<Version>,
) -> Result<(), LifecycleError> {
    if let Some(expected) = expected_version {
        if expected != stored_version {
            return Err(LifecycleError::VersionConflict {
                expected,
                actual: stored_version,
            });
        }
    }

    if !current.can_transition_to(requested) {
        return Err(LifecycleError::InvalidTransition { current, requested });
    }

    Ok(())
}

impl<R: PublicationRepository> Lifecycle<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Moves a publication to `requested_status`.
    ///
    /// Nothing is written unless the change is applied. Applying it bumps
    /// the version by one.
    pub async fn request_transition(
        &self,
        publication_id: PublicationId,
        requested_status: &str,
        expected_version: Option<Version>,
    ) -> Result<Transition, LifecycleError> {
        let result = self
            .apply(publication_id, requested_status, expected_version)
            .await;

        match &result {
            Ok(transition) => tracing::info!(
                publication_id = %publication_id,
                from = %transition.previous_status,
                to = %transition.status(),
                version = %transition.version(),
                "publication status changed"
            ),
            Err(LifecycleError::StorageUnavailable(cause)) => tracing::error!(
                publication_id = %publication_id,
                cause = %cause,
                "publication store failed during status change"
            ),
            Err(rejection) => tracing::warn!(
                publication_id = %publication_id,
                requested = requested_status,
                %rejection,
                "publication status change rejected"
            ),
        }

        result
    }

    async fn apply(
        &self,
        publication_id: PublicationId,
        requested_status: &str,
        expected_version: Option<Version>,
    ) -> Result<Transition, LifecycleError> {
        let requested = requested_status.parse::<PublicationStatus>().map_err(|_| {
            LifecycleError::InvalidStatusValue {
                value: requested_status.to_string(),
            }
        })?;

        let current = self
            .repository
            .find_by_id(publication_id)
            .await
            .map_err(|e| store_error(publication_id, e))?
            .ok_or(LifecycleError::NotFound(publication_id))?;

        check_transition(current.status, current.version, requested, expected_version)?;

        let next = current.transitioned(requested, Utc::now());
        let stored = self
            .repository
            .compare_and_set(&next, current.version)
            .await
            .map_err(|e| match e {
                RepositoryError::VersionMismatch { actual } => LifecycleError::VersionConflict {
                    expected: expected_version.unwrap_or(current.version),
                    actual,
                },
                other => store_error(publication_id, other),
            })?;

        Ok(Transition {
            previous_status: current.status,
            publication: stored,
        })
    }
}

fn store_error(publication_id: PublicationId, error: RepositoryError) -> LifecycleError {
    match error {
        RepositoryError::NotFound => LifecycleError::NotFound(publication_id),
        RepositoryError::VersionMismatch { actual } => LifecycleError::VersionConflict {
            expected: actual,
            actual,
        },
        RepositoryError::DatabaseError(cause) => LifecycleError::StorageUnavailable(cause),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use editorial_common::PublicationStatus::*;
    use tokio::sync::Barrier;

    use super::*;
    use crate::domain::publication::{NewPublication, fixtures::new_publication};
    use crate::domain::repository::query::{Page, PublicationQuery};
    use crate::infrastructure::persistence::memory::InMemoryPublicationRepository;

    fn engine() -> (Lifecycle<InMemoryPublicationRepository>, InMemoryPublicationRepository) {
        let repository = InMemoryPublicationRepository::new();
        (Lifecycle::new(repository.clone()), repository)
    }

    /// Shortest walk from draft to `status`
    fn path_to(status: PublicationStatus) -> &'static [PublicationStatus] {
        match status {
            Draft => &[],
            InReview => &[InReview],
            Approved => &[InReview, Approved],
            Published => &[InReview, Approved, Published],
            Rejected => &[InReview, Rejected],
        }
    }

    async fn publication_in(
        lifecycle: &Lifecycle<InMemoryPublicationRepository>,
        repository: &InMemoryPublicationRepository,
        status: PublicationStatus,
    ) -> Publication {
        let mut publication = repository.insert(new_publication("Dune", 1)).await.unwrap();
        for step in path_to(status) {
            publication = lifecycle
                .request_transition(publication.id, step.as_str(), None)
                .await
                .unwrap()
                .publication;
        }
        assert_eq!(publication.status, status);
        publication
    }

    #[tokio::test]
    async fn editorial_scenario() {
        let (lifecycle, repository) = engine();
        let created = repository.insert(new_publication("Dune", 1)).await.unwrap();
        assert_eq!(created.status, Draft);
        assert_eq!(created.version, Version(0));
        let id = created.id;

        let review = lifecycle
            .request_transition(id, "IN_REVIEW", Some(Version(0)))
            .await
            .unwrap();
        assert_eq!(review.previous_status, Draft);
        assert_eq!(review.status(), InReview);
        assert_eq!(review.version(), Version(1));

        let skipped = lifecycle.request_transition(id, "PUBLISHED", None).await;
        assert_eq!(
            skipped,
            Err(LifecycleError::InvalidTransition {
                current: InReview,
                requested: Published,
            })
        );

        let approved = lifecycle
            .request_transition(id, "APPROVED", Some(Version(1)))
            .await
            .unwrap();
        assert_eq!(approved.version(), Version(2));

        let published = lifecycle
            .request_transition(id, "PUBLISHED", Some(Version(2)))
            .await
            .unwrap();
        assert_eq!(published.status(), Published);
        assert_eq!(published.version(), Version(3));
        assert!(allowed_transitions(published.status()).is_empty());

        let reopened = lifecycle.request_transition(id, "DRAFT", None).await;
        assert_eq!(
            reopened,
            Err(LifecycleError::InvalidTransition {
                current: Published,
                requested: Draft,
            })
        );
    }

    #[tokio::test]
    async fn every_listed_edge_is_applied() {
        let (lifecycle, repository) = engine();
        for from in PublicationStatus::ALL {
            for &to in allowed_transitions(from) {
                let before = publication_in(&lifecycle, &repository, from).await;

                let transition = lifecycle
                    .request_transition(before.id, to.as_str(), Some(before.version))
                    .await
                    .unwrap_or_else(|e| panic!("{from} -> {to} failed: {e}"));

                assert_eq!(transition.previous_status, from);
                assert_eq!(transition.status(), to);
                assert_eq!(transition.version(), before.version.next());

                let stored = repository.find_by_id(before.id).await.unwrap().unwrap();
                assert_eq!(stored.status, to);
                assert_eq!(stored.version, before.version.next());
            }
        }
    }

    #[tokio::test]
    async fn every_unlisted_pair_is_rejected_without_writing() {
        let (lifecycle, repository) = engine();
        for from in PublicationStatus::ALL {
            for to in PublicationStatus::ALL {
                if from.can_transition_to(to) {
                    continue;
                }
                let before = publication_in(&lifecycle, &repository, from).await;

                let rejected = lifecycle
                    .request_transition(before.id, to.as_str(), Some(before.version))
                    .await;
                assert_eq!(
                    rejected,
                    Err(LifecycleError::InvalidTransition {
                        current: from,
                        requested: to,
                    })
                );

                let stored = repository.find_by_id(before.id).await.unwrap().unwrap();
                assert_eq!(stored, before);
            }
        }
    }

    #[tokio::test]
    async fn terminal_publications_refuse_everything() {
        let (lifecycle, repository) = engine();
        for terminal in [Published, Rejected] {
            let publication = publication_in(&lifecycle, &repository, terminal).await;
            for requested in PublicationStatus::ALL {
                let result = lifecycle
                    .request_transition(publication.id, requested.as_str(), None)
                    .await;
                assert!(matches!(
                    result,
                    Err(LifecycleError::InvalidTransition { current, .. }) if current == terminal
                ));
            }
        }
    }

    #[tokio::test]
    async fn rejected_request_fails_identically_when_repeated() {
        let (lifecycle, repository) = engine();
        let draft = publication_in(&lifecycle, &repository, Draft).await;

        let first = lifecycle
            .request_transition(draft.id, "APPROVED", Some(Version(0)))
            .await;
        let second = lifecycle
            .request_transition(draft.id, "APPROVED", Some(Version(0)))
            .await;

        assert!(matches!(first, Err(LifecycleError::InvalidTransition { .. })));
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn unknown_status_is_rejected_before_lookup() {
        let (lifecycle, _) = engine();

        let result = lifecycle
            .request_transition(PublicationId(404), "ARCHIVED", None)
            .await;

        assert_eq!(
            result,
            Err(LifecycleError::InvalidStatusValue {
                value: "ARCHIVED".to_string()
            })
        );
    }

    #[tokio::test]
    async fn status_is_case_insensitive() {
        let (lifecycle, repository) = engine();
        let draft = publication_in(&lifecycle, &repository, Draft).await;

        let transition = lifecycle
            .request_transition(draft.id, "in_review", None)
            .await
            .unwrap();

        assert_eq!(transition.status(), InReview);
    }

    #[tokio::test]
    async fn unknown_publication_is_not_found() {
        let (lifecycle, _) = engine();

        let result = lifecycle
            .request_transition(PublicationId(404), "IN_REVIEW", None)
            .await;

        assert_eq!(result, Err(LifecycleError::NotFound(PublicationId(404))));
    }

    #[tokio::test]
    async fn stale_version_is_a_conflict_and_writes_nothing() {
        let (lifecycle, repository) = engine();
        let review = publication_in(&lifecycle, &repository, InReview).await;

        let result = lifecycle
            .request_transition(review.id, "APPROVED", Some(Version(0)))
            .await;

        assert_eq!(
            result,
            Err(LifecycleError::VersionConflict {
                expected: Version(0),
                actual: Version(1),
            })
        );
        let stored = repository.find_by_id(review.id).await.unwrap().unwrap();
        assert_eq!(stored, review);
    }

    #[tokio::test]
    async fn entering_review_again_increments_review_count() {
        let (lifecycle, repository) = engine();
        let review = publication_in(&lifecycle, &repository, InReview).await;
        assert_eq!(review.review_count, 1);

        lifecycle
            .request_transition(review.id, "DRAFT", None)
            .await
            .unwrap();
        let again = lifecycle
            .request_transition(review.id, "IN_REVIEW", None)
            .await
            .unwrap();

        assert_eq!(again.publication.review_count, 2);
        assert_eq!(again.version(), Version(3));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_requests_on_same_version_have_one_winner() {
        let (lifecycle, repository) = engine();
        let review = publication_in(&lifecycle, &repository, InReview).await;
        let (id, version) = (review.id, review.version);
        let lifecycle = Arc::new(lifecycle);
        let barrier = Arc::new(Barrier::new(2));

        let handles = ["APPROVED", "REJECTED"].map(|requested| {
            let lifecycle = lifecycle.clone();
            let barrier = barrier.clone();
            tokio::spawn(async move {
                barrier.wait().await;
                lifecycle
                    .request_transition(id, requested, Some(version))
                    .await
            })
        });

        let mut results = Vec::new();
        for handle in handles {
            results.push(handle.await.unwrap());
        }

        let winners = results.iter().filter(|r| r.is_ok()).count();
        let conflicts = results
            .iter()
            .filter(|r| matches!(r, Err(LifecycleError::VersionConflict { .. })))
            .count();
        assert_eq!(winners, 1);
        assert_eq!(conflicts, 1);

        let stored = repository.find_by_id(review.id).await.unwrap().unwrap();
        assert_eq!(stored.version, Version(2));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn many_unversioned_contenders_never_double_apply() {
        let (lifecycle, repository) = engine();
        let id = publication_in(&lifecycle, &repository, Draft).await.id;
        let lifecycle = Arc::new(lifecycle);
        let barrier = Arc::new(Barrier::new(8));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let lifecycle = lifecycle.clone();
            let barrier = barrier.clone();
            handles.push(tokio::spawn(async move {
                barrier.wait().await;
                lifecycle.request_transition(id, "IN_REVIEW", None).await
            }));
        }

        let mut winners = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => winners += 1,
                Err(LifecycleError::VersionConflict { .. })
                | Err(LifecycleError::InvalidTransition { .. }) => {}
                Err(other) => panic!("unexpected rejection: {other}"),
            }
        }

        assert_eq!(winners, 1);
        let stored = repository.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.version, Version(1));
        assert_eq!(stored.review_count, 1);
    }

    #[test]
    fn check_is_a_pure_function_of_its_inputs() {
        assert_eq!(check_transition(Draft, Version(0), InReview, None), Ok(()));
        assert_eq!(
            check_transition(Draft, Version(0), InReview, Some(Version(0))),
            Ok(())
        );
        assert_eq!(
            check_transition(Draft, Version(3), InReview, Some(Version(2))),
            Err(LifecycleError::VersionConflict {
                expected: Version(2),
                actual: Version(3),
            })
        );
        assert_eq!(
            check_transition(Approved, Version(2), Draft, None),
            Err(LifecycleError::InvalidTransition {
                current: Approved,
                requested: Draft,
            })
        );
    }

    #[derive(Clone)]
    struct UnreachableStore;

    impl PublicationRepository for UnreachableStore {
        async fn insert(&self, _: NewPublication) -> Result<Publication, RepositoryError> {
            Err(RepositoryError::DatabaseError("connection refused".into()))
        }

        async fn find_by_id(&self, _: PublicationId) -> Result<Option<Publication>, RepositoryError> {
            Err(RepositoryError::DatabaseError("connection refused".into()))
        }

        async fn find(&self, _: PublicationQuery) -> Result<Page<Publication>, RepositoryError> {
            Err(RepositoryError::DatabaseError("connection refused".into()))
        }

        async fn compare_and_set(
            &self,
            _: &Publication,
            _: Version,
        ) -> Result<Publication, RepositoryError> {
            Err(RepositoryError::DatabaseError("connection refused".into()))
        }
    }

    #[tokio::test]
    async fn storage_failure_is_not_a_rejection() {
        let lifecycle = Lifecycle::new(UnreachableStore);

        let result = lifecycle
            .request_transition(PublicationId(1), "IN_REVIEW", None)
            .await;

        assert_eq!(
            result,
            Err(LifecycleError::StorageUnavailable("connection refused".into()))
        );
    }
}
