use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use editorial_common::{PublicationId, Version};
use parking_lot::Mutex;

use crate::domain::{
    publication::{NewPublication, Publication},
    repository::{
        PublicationRepository, RepositoryError,
        query::{Page, PublicationQuery},
    },
};

/// Process local publication store.
/// Every operation runs under one short lock, which makes compare-and-set atomic.
#[derive(Clone, Debug, Default)]
pub struct InMemoryPublicationRepository {
    inner: Arc<Mutex<Rows>>,
}

#[derive(Debug, Default)]
struct Rows {
    last_id: i64,
    publications: BTreeMap<PublicationId, Publication>,
}

impl InMemoryPublicationRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PublicationRepository for InMemoryPublicationRepository {
    async fn insert(&self, publication: NewPublication) -> Result<Publication, RepositoryError> {
        let mut rows = self.inner.lock();
        rows.last_id += 1;
        let id = PublicationId(rows.last_id);

        let created = Publication::create(id, publication, Utc::now());
        rows.publications.insert(id, created.clone());

        Ok(created)
    }

    async fn find_by_id(&self, id: PublicationId) -> Result<Option<Publication>, RepositoryError> {
        Ok(self.inner.lock().publications.get(&id).cloned())
    }

    async fn find(&self, query: PublicationQuery) -> Result<Page<Publication>, RepositoryError> {
        let rows = self.inner.lock();
        let matching = rows
            .publications
            .values()
            .filter(|p| query.matches(p.status, p.author_id));

        let total_elements = matching.clone().count() as u64;
        let content = matching
            .skip(query.offset() as usize)
            .take(query.size as usize)
            .cloned()
            .collect();

        Ok(Page {
            content,
            page: query.page,
            size: query.size,
            total_elements,
        })
    }

    async fn compare_and_set(
        &self,
        next: &Publication,
        expected_version: Version,
    ) -> Result<Publication, RepositoryError> {
        let mut rows = self.inner.lock();
        let stored = rows
            .publications
            .get_mut(&next.id)
            .ok_or(RepositoryError::NotFound)?;

        if stored.version != expected_version {
            return Err(RepositoryError::VersionMismatch {
                actual: stored.version,
            });
        }

        stored.status = next.status;
        stored.review_count = next.review_count;
        stored.version = next.version;
        stored.updated_at = next.updated_at;

        Ok(stored.clone())
    }
}
