use axum::extract::State;
use axum::http::StatusCode;
use editorial_common::{PublicationId, PublicationStatus, Version};

use crate::domain::AppState;
use crate::infrastructure::http::api::{ApiError, ApiJson, ApiPath, ApiQuery, ApiSuccess};
use dto::{
    CreatePublicationRequest, EnrichedPublicationResponse, LifecycleStateResponse,
    ListPublicationsParams, PageResponse, PublicationResponse, StatusUpdateRequest,
    TransitionResponse, TransitionsResponse,
};

mod dto;

/// The whole lifecycle graph, one entry per status
pub async fn lifecycle_states() -> ApiSuccess<Vec<LifecycleStateResponse>> {
    let states = PublicationStatus::ALL
        .into_iter()
        .map(LifecycleStateResponse::from)
        .collect();

    ApiSuccess::new(StatusCode::OK, states)
}

pub async fn create_publication<S: AppState>(
    State(state): State<S>,
    ApiJson(request): ApiJson<CreatePublicationRequest>,
) -> Result<ApiSuccess<PublicationResponse>, ApiError> {
    state
        .publications()
        .create(request.into())
        .await
        .map_err(ApiError::from)
        .map(|created| ApiSuccess::new(StatusCode::CREATED, created.into()))
}

pub async fn list_publications<S: AppState>(
    State(state): State<S>,
    ApiQuery(params): ApiQuery<ListPublicationsParams>,
) -> Result<ApiSuccess<PageResponse<PublicationResponse>>, ApiError> {
    state
        .publications()
        .list(params.into())
        .await
        .map_err(ApiError::from)
        .map(|page| ApiSuccess::new(StatusCode::OK, page.into()))
}

pub async fn find_publication<S: AppState>(
    State(state): State<S>,
    ApiPath(id): ApiPath<i64>,
) -> Result<ApiSuccess<EnrichedPublicationResponse>, ApiError> {
    state
        .publications()
        .get_enriched(PublicationId(id))
        .await
        .map_err(ApiError::from)
        .map(|found| ApiSuccess::new(StatusCode::OK, found.into()))
}

pub async fn publication_transitions<S: AppState>(
    State(state): State<S>,
    ApiPath(id): ApiPath<i64>,
) -> Result<ApiSuccess<TransitionsResponse>, ApiError> {
    state
        .publications()
        .get(PublicationId(id))
        .await
        .map_err(ApiError::from)
        .map(|publication| ApiSuccess::new(StatusCode::OK, (&publication).into()))
}

pub async fn update_publication_status<S: AppState>(
    State(state): State<S>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(request): ApiJson<StatusUpdateRequest>,
) -> Result<ApiSuccess<TransitionResponse>, ApiError> {
    let requested = request.status.unwrap_or_default();

    state
        .lifecycle()
        .request_transition(
            PublicationId(id),
            &requested,
            request.expected_version.map(Version),
        )
        .await
        .map_err(ApiError::from)
        .map(|transition| ApiSuccess::new(StatusCode::OK, transition.into()))
}
