//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server errors to Sentry
//! before responding to the client. All route handlers return
//! `Result<T, AppError>`, and every error body is JSON of the shape
//! `{"message": "..."}`.

use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use kasilink_core::{Deny, TransitionError};

use crate::db::StorageError;
use crate::services::identity::AuthError;

/// Application-level error type for the API server.
#[derive(Debug, Error)]
pub enum AppError {
    /// Storage operation failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Identity verification failed. A token rejection responds 401; a
    /// provider outage or malformed claims response is an internal failure
    /// and responds 500.
    #[error("auth error: {0}")]
    Auth(#[from] AuthError),

    /// Request body or parameters failed validation.
    #[error("{0}")]
    Validation(String),

    /// No or invalid credential on a protected route.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated but disallowed action.
    #[error("forbidden")]
    Forbidden,

    /// Referenced resource does not exist.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// A lifecycle transition was rejected or lost a race.
    #[error("{0}")]
    Conflict(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<Deny> for AppError {
    fn from(deny: Deny) -> Self {
        match deny {
            Deny::Unauthenticated => Self::Unauthorized("authentication required".to_owned()),
            Deny::Forbidden => Self::Forbidden,
        }
    }
}

impl From<TransitionError> for AppError {
    fn from(err: TransitionError) -> Self {
        Self::Conflict(err.to_string())
    }
}

/// JSON error body returned to clients.
#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
}

impl AppError {
    const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Auth(AuthError::InvalidToken) | Self::Unauthorized(_) => {
                StatusCode::UNAUTHORIZED
            }
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Storage(StorageError::Conflict(_)) => StatusCode::CONFLICT,
            Self::Auth(_) | Self::Storage(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn public_message(&self) -> String {
        match self {
            // Never leak database, provider, or internal detail to clients.
            Self::Storage(StorageError::Database(_) | StorageError::DataCorruption(_))
            | Self::Auth(AuthError::Provider(_) | AuthError::InvalidClaims(_))
            | Self::Internal(_) => "Internal server error".to_owned(),
            Self::Storage(StorageError::Conflict(message)) => message.clone(),
            Self::Auth(AuthError::InvalidToken) => "Unauthorized: invalid token".to_owned(),
            Self::Unauthorized(message) => format!("Unauthorized: {message}"),
            Self::Forbidden => "Forbidden".to_owned(),
            Self::NotFound(resource) => format!("{resource} not found"),
            Self::Validation(message) | Self::Conflict(message) => message.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.status().is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let body = ErrorBody {
            message: self.public_message(),
        };
        (self.status(), Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// JSON body extractor that reports the first deserialization failure as a
/// 400 validation error, instead of axum's default plain-text rejection.
pub struct AppJson<T>(pub T);

impl<S, T> FromRequest<S> for AppJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> std::result::Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(AppError::Validation(rejection.body_text())),
        }
    }
}
