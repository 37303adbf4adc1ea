use editorial_common::{AuthorId, Category, PublicationId, PublicationStatus, PublicationTitle};

use crate::domain::{
    authors::{AuthorDirectory, AuthorSummary},
    publication::{NewPublication, Publication, error::PublicationError},
    repository::{
        PublicationRepository, RepositoryError,
        query::{Page, PublicationFilter, PublicationQuery},
    },
};

/// Raw input for creating a publication, as received from a client
#[derive(Debug, Clone, Default)]
pub struct CreatePublication {
    pub title: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub author_id: Option<i64>,
    pub category: Option<String>,
}

/// Raw listing parameters
#[derive(Debug, Clone, Default)]
pub struct ListPublications {
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub status: Option<String>,
    pub author_id: Option<i64>,
}

/// Everything about publications except status changes
#[derive(Debug, Clone)]
pub struct PublicationService<R, A> {
    repository: R,
    authors: A,
}

impl<R: PublicationRepository, A: AuthorDirectory> PublicationService<R, A> {
    pub fn new(repository: R, authors: A) -> Self {
        Self {
            repository,
            authors,
        }
    }

    /// Creates a draft after making sure its author is registered.
    pub async fn create(&self, request: CreatePublication) -> Result<Publication, PublicationError> {
        let new = validate(request)?;
        let author_id = new.author_id;

        match self.authors.author_exists(author_id).await {
            Ok(true) => {}
            Ok(false) => {
                tracing::warn!(author_id = %author_id, "publication refers to unknown author");
                return Err(PublicationError::AuthorNotFound(author_id));
            }
            Err(e) => {
                tracing::error!(author_id = %author_id, "failed to verify author: {}", e);
                return Err(PublicationError::AuthorServiceUnavailable(e.to_string()));
            }
        }

        let created = self.repository.insert(new).await.map_err(store_error)?;
        tracing::info!(publication_id = %created.id, author_id = %author_id, "publication created");

        Ok(created)
    }

    pub async fn get(&self, id: PublicationId) -> Result<Publication, PublicationError> {
        self.repository
            .find_by_id(id)
            .await
            .map_err(store_error)?
            .ok_or(PublicationError::NotFound(id))
    }

    /// The publication together with its author's profile.
    /// The profile is left out when the authors service cannot provide it.
    pub async fn get_enriched(
        &self,
        id: PublicationId,
    ) -> Result<(Publication, Option<AuthorSummary>), PublicationError> {
        let publication = self.get(id).await?;

        let author = match self.authors.author(publication.author_id).await {
            Ok(author) => author,
            Err(e) => {
                tracing::warn!(
                    publication_id = %id,
                    author_id = %publication.author_id,
                    "author profile unavailable: {}",
                    e
                );
                None
            }
        };

        Ok((publication, author))
    }

    /// A status filter wins over an author filter when both are given.
    pub async fn list(&self, request: ListPublications) -> Result<Page<Publication>, PublicationError> {
        let filter = match (blank_to_none(request.status), request.author_id) {
            (Some(status), _) => {
                let status = status
                    .parse::<PublicationStatus>()
                    .map_err(|e| PublicationError::InvalidStatus(e.0))?;
                PublicationFilter::Status(status)
            }
            (None, Some(author_id)) if author_id > 0 => PublicationFilter::Author(AuthorId(author_id)),
            _ => PublicationFilter::All,
        };

        let query = PublicationQuery::new(
            request.page.unwrap_or(0),
            request.size.unwrap_or(PublicationQuery::DEFAULT_SIZE),
            filter,
        );

        tracing::debug!(?query, "listing publications");
        self.repository.find(query).await.map_err(store_error)
    }
}

fn validate(request: CreatePublication) -> Result<NewPublication, PublicationError> {
    let title = request
        .title
        .ok_or_else(|| PublicationError::InvalidPublication("title is required".into()))
        .and_then(|title| {
            PublicationTitle::try_new(title).map_err(|e| {
                PublicationError::InvalidPublication(format!("title is invalid: {e}"))
            })
        })?;

    let author_id = request
        .author_id
        .map(AuthorId)
        .filter(AuthorId::is_valid)
        .ok_or_else(|| PublicationError::InvalidPublication("author id is required".into()))?;

    let category = blank_to_none(request.category)
        .map(|category| Category::try_new(category))
        .transpose()
        .map_err(|e| PublicationError::InvalidPublication(format!("category is invalid: {e}")))?;

    Ok(NewPublication {
        title,
        description: request.description,
        content: request.content,
        author_id,
        category,
    })
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn store_error(error: RepositoryError) -> PublicationError {
    match error {
        RepositoryError::DatabaseError(cause) => {
            tracing::error!("publication store failed: {}", cause);
            PublicationError::StorageUnavailable(cause)
        }
        other => PublicationError::StorageUnavailable(format!("{:?}", other)),
    }
}
