use axum::Json;
use axum::extract::FromRequest;
use axum::extract::FromRequestParts;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use editorial_common::PublicationStatus;
use serde::Serialize;
use serde_json::json;

use crate::domain::publication::error::{LifecycleError, PublicationError};

// ApiSucess is a wrapper around a response that includes a status code.

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize>(StatusCode, Json<T>);

impl<T: Serialize> ApiSuccess<T> {
    pub(crate) fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(data))
    }
}

impl<T: Serialize> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

// Extractors rejecting malformed requests with an ApiError body.

#[derive(Debug, Clone, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

#[derive(Debug, Clone, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

#[derive(Debug, Clone, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

// ApiError is a wrapper around a response that includes a status code.

#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    BadRequest(ApiErrorData),
    UnprocessableEntity(ApiErrorData),
    ConflictWithServerState(ApiErrorData),
    ServiceUnavailable(ApiErrorData),
    NotFound(ApiErrorData),
}

impl From<JsonRejection> for ApiError {
    fn from(value: JsonRejection) -> Self {
        malformed_request(value.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(value: QueryRejection) -> Self {
        malformed_request(value.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(value: PathRejection) -> Self {
        malformed_request(value.body_text())
    }
}

fn malformed_request(message: String) -> ApiError {
    tracing::debug!("malformed request: {}", message);
    ApiError::BadRequest(ApiErrorData::new("MALFORMED_REQUEST", message))
}

impl From<LifecycleError> for ApiError {
    fn from(value: LifecycleError) -> Self {
        let message = value.to_string();
        match value {
            LifecycleError::NotFound(id) => Self::NotFound(
                ApiErrorData::new("PUBLICATION_NOT_FOUND", message)
                    .with_details(json!({ "id": id })),
            ),
            LifecycleError::InvalidStatusValue { value } => Self::BadRequest(
                ApiErrorData::new("INVALID_STATUS", message)
                    .with_details(json!({ "value": value, "accepted": PublicationStatus::ALL })),
            ),
            LifecycleError::InvalidTransition { current, requested } => Self::UnprocessableEntity(
                ApiErrorData::new("INVALID_STATE_TRANSITION", message).with_details(json!({
                    "currentStatus": current,
                    "requestedStatus": requested,
                    "allowedTransitions": current.allowed_transitions(),
                })),
            ),
            LifecycleError::VersionConflict { expected, actual } => Self::ConflictWithServerState(
                ApiErrorData::new("VERSION_CONFLICT", message).with_details(json!({
                    "expectedVersion": expected,
                    "actualVersion": actual,
                })),
            ),
            LifecycleError::StorageUnavailable(cause) => {
                tracing::error!("{}", cause);
                Self::ServiceUnavailable(ApiErrorData::new(
                    "STORAGE_UNAVAILABLE",
                    "Publication store is unavailable".to_string(),
                ))
            }
        }
    }
}

impl From<PublicationError> for ApiError {
    fn from(value: PublicationError) -> Self {
        let message = value.to_string();
        match value {
            PublicationError::NotFound(id) => Self::NotFound(
                ApiErrorData::new("PUBLICATION_NOT_FOUND", message)
                    .with_details(json!({ "id": id })),
            ),
            PublicationError::InvalidPublication(_) => {
                Self::BadRequest(ApiErrorData::new("INVALID_PUBLICATION", message))
            }
            PublicationError::InvalidStatus(value) => Self::BadRequest(
                ApiErrorData::new("INVALID_STATUS", message)
                    .with_details(json!({ "value": value, "accepted": PublicationStatus::ALL })),
            ),
            PublicationError::AuthorNotFound(author_id) => Self::BadRequest(
                ApiErrorData::new("AUTHOR_NOT_FOUND", message)
                    .with_details(json!({ "authorId": author_id })),
            ),
            PublicationError::AuthorServiceUnavailable(cause) => {
                tracing::error!("{}", cause);
                Self::ServiceUnavailable(ApiErrorData::new(
                    "AUTHOR_SERVICE_ERROR",
                    "Authors service is unavailable".to_string(),
                ))
            }
            PublicationError::StorageUnavailable(cause) => {
                tracing::error!("{}", cause);
                Self::ServiceUnavailable(ApiErrorData::new(
                    "STORAGE_UNAVAILABLE",
                    "Publication store is unavailable".to_string(),
                ))
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        use ApiError::*;

        let (status_code, data) = match self {
            BadRequest(data) => (StatusCode::BAD_REQUEST, data),
            UnprocessableEntity(data) => (StatusCode::UNPROCESSABLE_ENTITY, data),
            ConflictWithServerState(data) => (StatusCode::CONFLICT, data),
            ServiceUnavailable(data) => (StatusCode::SERVICE_UNAVAILABLE, data),
            NotFound(data) => (StatusCode::NOT_FOUND, data),
        };

        (
            status_code,
            Json(ApiResponseBody::new_error(status_code, data)),
        )
            .into_response()
    }
}

// Generic response structure shared by all API responses.

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    pub status_code: u16,
    pub data: T,
}

impl ApiResponseBody<ApiErrorData> {
    pub fn new_error(status_code: StatusCode, data: ApiErrorData) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data,
        }
    }
}

/// The response data format for all error responses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiErrorData {
    /// Machine readable, stable across releases
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiErrorData {
    pub fn new(code: &'static str, message: String) -> Self {
        Self {
            code,
            message,
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

#[cfg(test)]
mod tests {
    use editorial_common::{PublicationId, Version};

    use super::*;

    #[test]
    fn invalid_transition_lists_what_is_allowed() {
        let error = ApiError::from(LifecycleError::InvalidTransition {
            current: PublicationStatus::Approved,
            requested: PublicationStatus::Draft,
        });

        let ApiError::UnprocessableEntity(data) = error else {
            panic!("expected 422, got {error:?}");
        };
        assert_eq!(data.code, "INVALID_STATE_TRANSITION");
        assert_eq!(
            data.details,
            Some(json!({
                "currentStatus": "APPROVED",
                "requestedStatus": "DRAFT",
                "allowedTransitions": ["PUBLISHED", "REJECTED"],
            }))
        );
    }

    #[test]
    fn conflict_carries_both_versions() {
        let error = ApiError::from(LifecycleError::VersionConflict {
            expected: Version(1),
            actual: Version(2),
        });

        let ApiError::ConflictWithServerState(data) = error else {
            panic!("expected 409, got {error:?}");
        };
        assert_eq!(
            data.details,
            Some(json!({ "expectedVersion": 1, "actualVersion": 2 }))
        );
    }

    #[test]
    fn storage_cause_is_not_leaked() {
        let error = ApiError::from(LifecycleError::StorageUnavailable(
            "password authentication failed for user editor".to_string(),
        ));

        let ApiError::ServiceUnavailable(data) = error else {
            panic!("expected 503, got {error:?}");
        };
        assert!(!data.message.contains("password"));
    }

    #[test]
    fn not_found_status_code() {
        let response = ApiError::from(LifecycleError::NotFound(PublicationId(5))).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = ApiError::from(LifecycleError::InvalidStatusValue {
            value: "x".to_string(),
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
