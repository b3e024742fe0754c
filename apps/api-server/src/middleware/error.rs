//! Error handling - maps failures onto the JSON error envelope.

use actix_web::{HttpRequest, HttpResponse, ResponseError, error::JsonPayloadError, http::StatusCode};
use blog_core::error::DomainError;
use blog_shared::ErrorResponse;
use thiserror::Error;

/// Application-level error type rendered as `{status:false, message, code, field?}`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{message}")]
    Validation {
        field: Option<String>,
        message: String,
    },

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Unauthenticated(String),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Server configuration error")]
    Configuration(String),

    #[error("Internal server error")]
    Internal(String),
}

impl AppError {
    fn code(&self) -> &'static str {
        match self {
            AppError::Validation { .. } => "validation_error",
            AppError::BadRequest(_) => "bad_request",
            AppError::Conflict(_) => "conflict",
            AppError::Unauthenticated(_) => "unauthenticated",
            AppError::InvalidCredentials => "invalid_credentials",
            AppError::Forbidden(_) => "forbidden",
            AppError::NotFound(_) => "not_found",
            AppError::Configuration(_) => "configuration_error",
            AppError::Internal(_) => "internal_error",
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Unauthenticated(_) | AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Configuration(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        // Detail of server-side failures is logged, never returned.
        match self {
            AppError::Internal(detail) => tracing::error!("Internal error: {}", detail),
            AppError::Configuration(detail) => tracing::error!("Configuration error: {}", detail),
            _ => {}
        }

        let mut body = ErrorResponse::new(self.code(), self.to_string());
        if let AppError::Validation {
            field: Some(field), ..
        } = self
        {
            body = body.with_field(field.clone());
        }

        HttpResponse::build(self.status_code()).json(body)
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation { field, message } => AppError::Validation {
                field: Some(field.to_string()),
                message,
            },
            err @ DomainError::InvalidTags { .. } => AppError::Validation {
                field: Some("tags".to_string()),
                message: err.to_string(),
            },
            DomainError::Conflict(msg) => AppError::Conflict(msg),
            DomainError::InvalidCredentials => AppError::InvalidCredentials,
            DomainError::Unauthenticated(msg) => AppError::Unauthenticated(msg),
            DomainError::Forbidden(msg) => AppError::Forbidden(msg),
            err @ DomainError::NotFound { .. } => AppError::NotFound(err.to_string()),
            DomainError::Configuration(msg) => AppError::Configuration(msg),
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

/// Undecodable JSON bodies become 400s in the error envelope.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(format!("Invalid request body: {}", err)).into()
}

/// Unparseable path segments (e.g. a malformed id) become 400s.
pub fn path_error_handler(
    err: actix_web::error::PathError,
    _req: &HttpRequest,
) -> actix_web::Error {
    AppError::BadRequest(format!("Invalid path parameter: {}", err)).into()
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
