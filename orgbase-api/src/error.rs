/// Error handling for the API server
///
/// A unified error type that maps to HTTP responses. Handlers return
/// `Result<T, ApiError>`; nothing is thrown further up — this boundary is the
/// single place where a failure becomes a status code and JSON body.
///
/// Two wire shapes are produced:
/// - field-level failures (validation, duplicate email) serialize as
///   `{"errors": [{"field": ..., "message": ...}]}` with status 422
/// - everything else serializes as
///   `{"statusCode": ..., "status": ..., "message": ...}`

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use orgbase_shared::auth::{password::PasswordError, token::TokenError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400) — generic operation failure, not-found included
    BadRequest(String),

    /// Unauthorized (401)
    Unauthorized(String),

    /// Unprocessable entity (422) — per-field validation failures
    ValidationError(Vec<FieldError>),

    /// Unprocessable entity (422) — uniqueness violation on one field
    Conflict(FieldError),

    /// Internal server error (500)
    InternalError(String),
}

/// A single field-level error
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldError {
    /// Field that failed
    pub field: String,

    /// Error message
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

/// Error response envelope for non-field errors
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    /// HTTP status code, repeated in the body
    pub status_code: u16,

    /// Short status label (e.g. "Bad request")
    pub status: String,

    /// Human-readable error message
    pub message: String,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::ValidationError(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::Conflict(e) => write!(f, "Conflict on {}: {}", e.field, e.message),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::ValidationError(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(serde_json::json!({ "errors": errors })),
            )
                .into_response(),
            ApiError::Conflict(error) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(serde_json::json!({ "errors": [error] })),
            )
                .into_response(),
            ApiError::BadRequest(message) => envelope(StatusCode::BAD_REQUEST, "Bad request", message),
            ApiError::Unauthorized(message) => {
                envelope(StatusCode::UNAUTHORIZED, "Unauthorized", message)
            }
            ApiError::InternalError(detail) => {
                // Log the detail but do not expose it to clients
                tracing::error!("Internal error: {}", detail);
                envelope(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error",
                    "An internal error occurred".to_string(),
                )
            }
        }
    }
}

fn envelope(status: StatusCode, label: &str, message: String) -> Response {
    let body = Json(ErrorBody {
        status_code: status.as_u16(),
        status: label.to_string(),
        message,
    });

    (status, body).into_response()
}

impl ApiError {
    /// Flattens validator output into field errors
    ///
    /// Struct field names are converted to their camelCase wire spelling so
    /// the error list matches the request body the client sent.
    pub fn from_validation(errors: validator::ValidationErrors) -> Self {
        let details: Vec<FieldError> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| FieldError {
                    field: camel_case(field),
                    message: error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{} is invalid", camel_case(field))),
                })
            })
            .collect();

        ApiError::ValidationError(details)
    }
}

fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper_next = false;
    for c in field.chars() {
        if c == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Convert sqlx errors to API errors
///
/// Unique-constraint violations become client errors: a duplicate email maps
/// to the conflict payload, any other named constraint (organisation name,
/// membership primary key, foreign keys) to a generic 400.
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::BadRequest("Client error".to_string()),
            sqlx::Error::Database(db_err) => {
                if let Some(constraint) = db_err.constraint() {
                    if constraint.contains("email") {
                        return ApiError::Conflict(FieldError::new(
                            "email",
                            "Email already exists",
                        ));
                    }
                    return ApiError::BadRequest("Client error".to_string());
                }

                ApiError::InternalError(format!("Database error: {}", db_err))
            }
            _ => ApiError::InternalError(format!("Database error: {}", err)),
        }
    }
}

/// Convert token errors to API errors
impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::CreateError(msg) => {
                ApiError::InternalError(format!("Token creation failed: {}", msg))
            }
            other => ApiError::Unauthorized(other.to_string()),
        }
    }
}

/// Convert password errors to API errors
impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::InternalError(format!("Password operation failed: {}", err))
    }
}
