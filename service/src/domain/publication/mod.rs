pub mod error;
pub mod lifecycle;
pub mod service;

use chrono::{DateTime, Utc};
use editorial_common::{
    AuthorId, Category, LITERARY_WORK, PublicationId, PublicationStatus, PublicationTitle, Version,
};

/// A publication as it is stored.
#[derive(Debug, Clone, PartialEq)]
pub struct Publication {
    /// Assigned by the store, never changes afterwards
    pub id: PublicationId,

    pub title: PublicationTitle,
    pub description: Option<String>,
    pub content: Option<String>,

    /// Owner, lives in the authors service
    pub author_id: AuthorId,
    pub category: Option<Category>,

    /// Mutated only through the lifecycle
    pub status: PublicationStatus,

    /// How many times the publication was submitted to review
    pub review_count: i32,

    pub version: Version,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated input for a publication that does not exist yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewPublication {
    pub title: PublicationTitle,
    pub description: Option<String>,
    pub content: Option<String>,
    pub author_id: AuthorId,
    pub category: Option<Category>,
}

impl Publication {
    /// Materializes a freshly created publication: draft, version zero.
    pub fn create(id: PublicationId, new: NewPublication, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: new.title,
            description: new.description,
            content: new.content,
            author_id: new.author_id,
            category: new.category,
            status: PublicationStatus::INITIAL,
            review_count: 0,
            version: Version::INITIAL,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn publication_type(&self) -> &'static str {
        LITERARY_WORK
    }

    /// Approved with a title and some content to show.
    pub fn is_ready_to_publish(&self) -> bool {
        self.status == PublicationStatus::Approved
            && !self.title.as_ref().trim().is_empty()
            && self
                .content
                .as_deref()
                .is_some_and(|content| !content.trim().is_empty())
    }

    /// The record as it looks after moving to `next`.
    /// Does not consult the transition table, callers must.
    pub(crate) fn transitioned(&self, next: PublicationStatus, now: DateTime<Utc>) -> Self {
        let review_count = if next == PublicationStatus::InReview {
            self.review_count + 1
        } else {
            self.review_count
        };

        Self {
            status: next,
            review_count,
            version: self.version.next(),
            updated_at: now,
            ..self.clone()
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn new_publication(title: &str, author_id: i64) -> NewPublication {
        NewPublication {
            title: PublicationTitle::try_new(title).unwrap(),
            description: Some("A short description".to_string()),
            content: Some("Once upon a time".to_string()),
            author_id: AuthorId(author_id),
            category: Some(Category::try_new("novel").unwrap()),
        }
    }
}
