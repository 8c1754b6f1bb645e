//! Application error types with HTTP status code mapping.
//!
//! [`AppError`] is the central error type. Each variant maps to a specific
//! HTTP status code and structured JSON error response. Errors are terminal
//! for the current request; nothing is retried.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::ai::AiError;
use crate::domain::FieldError;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 1001,
///     "message": "Validation failed",
///     "details": [{ "field": "name", "message": "Event name is required" }]
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable message, safe to show to end users.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category        | HTTP Status                  |
/// |-----------|-----------------|------------------------------|
/// | 1000–1999 | Validation      | 400 Bad Request              |
/// | 2000–2999 | Authorization   | 401 Unauthorized / 404       |
/// | 3000–3999 | Store / Server  | 500 Internal Server Error    |
/// | 4000–4999 | Assistant (LLM) | 502 / 503                    |
/// | 5000–5999 | Auth provider   | 400 / 502                    |
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// No authenticated identity on the request.
    #[error("Unauthorized")]
    Unauthorized,

    /// The event does not exist or belongs to someone else. The two cases
    /// are deliberately indistinguishable.
    #[error("Event not found or unauthorized")]
    EventNotFound,

    /// One or more submitted fields failed validation.
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    /// Malformed request outside field validation.
    #[error("{0}")]
    InvalidRequest(String),

    /// Data store failure, prefixed with what was being attempted.
    #[error("{context}: {message}")]
    Persistence {
        /// What the request was doing, e.g. `Failed to fetch events`.
        context: &'static str,
        /// Message reported by the store.
        message: String,
    },

    /// The assistant endpoint failed.
    #[error(transparent)]
    Assistant(#[from] AiError),

    /// The auth provider rejected the request with a user-facing reason.
    #[error("{0}")]
    AuthRejected(String),

    /// The auth provider could not be reached or answered unexpectedly.
    #[error("auth provider error: {0}")]
    AuthUnavailable(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Wraps a store error with a contextual prefix.
    pub fn persistence(context: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Persistence {
            context,
            message: err.to_string(),
        }
    }

    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::Validation(_) => 1001,
            Self::InvalidRequest(_) => 1002,
            Self::Unauthorized => 2001,
            Self::EventNotFound => 2002,
            Self::Persistence { .. } => 3001,
            Self::Internal(_) => 3000,
            Self::Assistant(AiError::NotConfigured) => 4001,
            Self::Assistant(AiError::ModelNotFound(_)) => 4002,
            Self::Assistant(_) => 4000,
            Self::AuthRejected(_) => 5001,
            Self::AuthUnavailable(_) => 5002,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::InvalidRequest(_) | Self::AuthRejected(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::EventNotFound => StatusCode::NOT_FOUND,
            Self::Persistence { .. } | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Assistant(AiError::NotConfigured) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Assistant(_) | Self::AuthUnavailable(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Message shown to the end user. Assistant failures are translated into
    /// an explanation; everything else uses the error's display text.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Assistant(err) => err.user_message(),
            other => other.to_string(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            Self::Validation(fields) => serde_json::to_value(fields).ok(),
            Self::Assistant(err) => Some(serde_json::Value::String(err.to_string())),
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::warn!(code = self.error_code(), error = %self, "request failed");
        }
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.user_message(),
                details: self.details(),
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
