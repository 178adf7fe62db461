use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::service::ServiceError;

/// JSON body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
}

/// An error rendered as `{message}` with the matching status code.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Map a service error, using `failure` as the message for internal
    /// errors.
    pub fn from_service(err: ServiceError, failure: &str) -> Self {
        match err {
            ServiceError::NotFound => Self::new(StatusCode::NOT_FOUND, "Song not found"),
            ServiceError::BadRequest(message) => Self::bad_request(message),
            ServiceError::Internal => Self::new(StatusCode::INTERNAL_SERVER_ERROR, failure),
            ServiceError::ExternalApi => Self::new(
                StatusCode::BAD_GATEWAY,
                "Failed to fetch data from external API",
            ),
        }
    }

    pub const fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        Self::from_service(err, "Internal server error")
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        log::warn!("Rejected request body: {}", rejection.body_text());
        Self::bad_request("Invalid request body")
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        log::warn!("Rejected query string: {}", rejection.body_text());
        Self::bad_request("Invalid query string")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                message: self.message,
            }),
        )
            .into_response()
    }
}
