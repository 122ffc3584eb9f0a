use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::models::{FieldError, MessageResponse, ValidationErrorResponse};

/// ApiError
///
/// Every failure surfaced to a client, mapped to a status code and a JSON body.
/// The console and the public forms display `message` verbatim, or join the
/// `msg` values when a `Validation` body is returned.
#[derive(Error, Debug)]
pub enum ApiError {
    /// One entry per failed field, accumulated across the whole payload.
    #[error("Validation failed.")]
    Validation(Vec<FieldError>),

    /// Deliberately identical for unknown email and wrong password.
    #[error("Invalid email or password.")]
    InvalidCredentials,

    /// Authenticated, but the token's role is not an admin role.
    #[error("Admin access required.")]
    Forbidden,

    #[error("{0} not found.")]
    NotFound(&'static str),

    #[error("{0}")]
    Conflict(String),

    /// The detail is logged server-side and never leaked to the client.
    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        match self {
            ApiError::Validation(errors) => {
                (status, Json(ValidationErrorResponse { errors })).into_response()
            }
            ApiError::Internal(detail) => {
                tracing::error!(%detail, "request failed");
                let body = MessageResponse {
                    message: "Something went wrong. Please try again.".to_string(),
                };
                (status, Json(body)).into_response()
            }
            other => {
                let body = MessageResponse {
                    message: other.to_string(),
                };
                (status, Json(body)).into_response()
            }
        }
    }
}
