use chrono::{DateTime, Utc};
use editorial_common::{PublicationStatus, Version};
use serde::{Deserialize, Serialize};

use crate::domain::{
    authors::AuthorSummary,
    publication::{
        Publication,
        lifecycle::Transition,
        service::{CreatePublication, ListPublications},
    },
    repository::query::Page,
};

/// Body of the create publication route
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePublicationRequest {
    title: Option<String>,
    description: Option<String>,
    content: Option<String>,
    author_id: Option<i64>,
    category: Option<String>,
}

impl From<CreatePublicationRequest> for CreatePublication {
    fn from(value: CreatePublicationRequest) -> Self {
        Self {
            title: value.title,
            description: value.description,
            content: value.content,
            author_id: value.author_id,
            category: value.category,
        }
    }
}

/// Body of the status change route
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdateRequest {
    /// Kept raw, an unknown value is reported by the lifecycle
    pub status: Option<String>,
    pub expected_version: Option<i64>,
}

/// Query string of the list route
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPublicationsParams {
    page: Option<u32>,
    size: Option<u32>,
    status: Option<String>,
    author_id: Option<i64>,
}

impl From<ListPublicationsParams> for ListPublications {
    fn from(value: ListPublicationsParams) -> Self {
        Self {
            page: value.page,
            size: value.size,
            status: value.status,
            author_id: value.author_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicationResponse {
    id: i64,
    title: String,
    description: Option<String>,
    content: Option<String>,
    author_id: i64,
    category: Option<String>,
    status: PublicationStatus,
    publication_type: &'static str,
    review_count: i32,
    ready_to_publish: bool,
    version: Version,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<Publication> for PublicationResponse {
    fn from(value: Publication) -> Self {
        Self {
            id: value.id.0,
            publication_type: value.publication_type(),
            ready_to_publish: value.is_ready_to_publish(),
            title: value.title.into_inner(),
            description: value.description,
            content: value.content,
            author_id: value.author_id.0,
            category: value.category.map(|c| c.into_inner()),
            status: value.status,
            review_count: value.review_count,
            version: value.version,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

/// A publication with its author's profile, `null` when the profile could not be read
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedPublicationResponse {
    #[serde(flatten)]
    publication: PublicationResponse,
    author: Option<AuthorSummary>,
}

impl From<(Publication, Option<AuthorSummary>)> for EnrichedPublicationResponse {
    fn from((publication, author): (Publication, Option<AuthorSummary>)) -> Self {
        Self {
            publication: publication.into(),
            author,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse<T> {
    content: Vec<T>,
    page: u32,
    size: u32,
    total_elements: u64,
    total_pages: u64,
}

impl From<Page<Publication>> for PageResponse<PublicationResponse> {
    fn from(value: Page<Publication>) -> Self {
        let total_pages = value.total_pages();
        let page = value.map(PublicationResponse::from);
        Self {
            content: page.content,
            page: page.page,
            size: page.size,
            total_elements: page.total_elements,
            total_pages,
        }
    }
}

/// Outcome of an applied status change
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionResponse {
    id: i64,
    previous_status: PublicationStatus,
    status: PublicationStatus,
    version: Version,
    allowed_transitions: &'static [PublicationStatus],
    publication: PublicationResponse,
}

impl From<Transition> for TransitionResponse {
    fn from(value: Transition) -> Self {
        let status = value.status();
        Self {
            id: value.publication.id.0,
            previous_status: value.previous_status,
            status,
            version: value.version(),
            allowed_transitions: status.allowed_transitions(),
            publication: value.publication.into(),
        }
    }
}

/// Where a publication may go next
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionsResponse {
    id: i64,
    status: PublicationStatus,
    version: Version,
    allowed_transitions: &'static [PublicationStatus],
}

impl From<&Publication> for TransitionsResponse {
    fn from(value: &Publication) -> Self {
        Self {
            id: value.id.0,
            status: value.status,
            version: value.version,
            allowed_transitions: value.status.allowed_transitions(),
        }
    }
}

/// One row of the lifecycle graph
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LifecycleStateResponse {
    status: PublicationStatus,
    label: &'static str,
    initial: bool,
    terminal: bool,
    allowed_transitions: &'static [PublicationStatus],
}

impl From<PublicationStatus> for LifecycleStateResponse {
    fn from(value: PublicationStatus) -> Self {
        Self {
            status: value,
            label: value.label(),
            initial: value == PublicationStatus::INITIAL,
            terminal: value.is_terminal(),
            allowed_transitions: value.allowed_transitions(),
        }
    }
}

#[cfg(test)]
mod tests {
    use editorial_common::PublicationId;
    use serde_json::json;

    use super::*;
    use crate::domain::publication::fixtures::new_publication;

    #[test]
    fn publication_is_rendered_in_camel_case() {
        let publication = Publication::create(
            PublicationId(3),
            new_publication("La vorágine", 9),
            Utc::now(),
        );

        let value = serde_json::to_value(PublicationResponse::from(publication)).unwrap();

        assert_eq!(value["authorId"], json!(9));
        assert_eq!(value["status"], json!("DRAFT"));
        assert_eq!(value["publicationType"], json!("LITERARY_WORK"));
        assert_eq!(value["reviewCount"], json!(0));
        assert_eq!(value["readyToPublish"], json!(false));
        assert_eq!(value["version"], json!(0));
    }

    #[test]
    fn missing_author_is_null() {
        let publication = Publication::create(
            PublicationId(1),
            new_publication("María", 2),
            Utc::now(),
        );

        let value =
            serde_json::to_value(EnrichedPublicationResponse::from((publication, None))).unwrap();

        assert_eq!(value["author"], json!(null));
        assert_eq!(value["title"], json!("María"));
    }

    #[test]
    fn terminal_state_offers_nothing() {
        let value =
            serde_json::to_value(LifecycleStateResponse::from(PublicationStatus::Published))
                .unwrap();

        assert_eq!(value["terminal"], json!(true));
        assert_eq!(value["allowedTransitions"], json!([]));
    }

    #[test]
    fn status_update_without_version() {
        let request: StatusUpdateRequest =
            serde_json::from_value(json!({ "status": "in_review" })).unwrap();

        assert_eq!(request.status.as_deref(), Some("in_review"));
        assert_eq!(request.expected_version, None);
    }
}
