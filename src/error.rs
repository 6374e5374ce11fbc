//! Error taxonomy shared by the query layer and the HTTP handlers.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use sea_orm::{DbErr, SqlErr};
use serde::Serialize;
use thiserror::Error;

use crate::api::envelope::Envelope;

/// One failing input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Errors surfaced by the portal.
///
/// Each variant maps onto exactly one HTTP status; the response body is always
/// the standard envelope with `success: false`.
#[derive(Debug, Error)]
pub enum PortalError {
    /// One or more request fields are missing or malformed.
    #[error("validation failed on {} field(s)", .0.len())]
    Validation(Vec<FieldError>),

    /// The request is well-formed JSON but cannot be acted on.
    #[error("{0}")]
    BadRequest(String),

    /// Credentials do not match.
    #[error("{0}")]
    Unauthorized(String),

    /// A referenced student, assignment or record does not exist.
    #[error("{0}")]
    NotFound(String),

    /// A uniqueness constraint would be violated.
    #[error("{0}")]
    Conflict(String),

    /// The client exceeded its request budget.
    #[error("too many requests from this IP, please try again later")]
    RateLimited,

    /// Unexpected store or runtime failure. The message is echoed to the client.
    #[error("{0}")]
    Internal(String),
}

pub type Result<T, E = PortalError> = std::result::Result<T, E>;

impl PortalError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    /// Maps a store error, turning unique-constraint violations into
    /// [`PortalError::Conflict`] with the given message.
    pub fn from_db(err: DbErr, conflict_message: &str) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => Self::conflict(conflict_message),
            _ => Self::Internal(err.to_string()),
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DbErr> for PortalError {
    fn from(err: DbErr) -> Self {
        Self::from_db(err, "record already exists")
    }
}

impl From<tower_sessions::session::Error> for PortalError {
    fn from(err: tower_sessions::session::Error) -> Self {
        Self::Internal(format!("session error: {err}"))
    }
}

impl IntoResponse for PortalError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self {
            Self::Validation(errors) => Envelope::<()>::invalid(errors),
            Self::RateLimited => {
                tracing::warn!("request rejected by rate limiter");
                Envelope::failure("Too many requests from this IP, please try again later")
            }
            Self::Internal(message) => {
                tracing::error!(error = %message, "request failed");
                Envelope::failure(message)
            }
            other => Envelope::failure(other.to_string()),
        };

        (status, Json(body)).into_response()
    }
}
