/// Request guard types for protected routes
///
/// Protected routes are gated by a bearer token in the `Authorization`
/// header. The API server's middleware layer extracts the credential with
/// [`bearer_token`], verifies it through the token module, and inserts an
/// [`AuthContext`] into request extensions for handlers to consume. A missing
/// credential short-circuits with HTTP 400; a present-but-invalid one with
/// HTTP 401. Protection is binary — any valid token reaches the handler, and
/// row-level scoping happens in the handler's SQL.
///
/// # Example
///
/// ```
/// use axum::Extension;
/// use orgbase_shared::auth::guard::AuthContext;
///
/// async fn handler(Extension(auth): Extension<AuthContext>) -> String {
///     format!("Hello, user {}!", auth.user_id)
/// }
/// ```

use axum::{
    http::{header::HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use super::token::Claims;

/// Authenticated request context
///
/// Built from verified token claims; available to handlers via Axum's
/// `Extension` extractor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user ID (token subject)
    pub user_id: Uuid,

    /// When the token was issued
    pub issued_at: DateTime<Utc>,

    /// When the token expires
    pub expires_at: DateTime<Utc>,
}

impl AuthContext {
    /// Builds a context from verified claims
    pub fn from_claims(claims: &Claims) -> Self {
        Self {
            user_id: claims.sub,
            issued_at: claims.issued_at(),
            expires_at: claims.expires_at(),
        }
    }

    /// Issued-at formatted for display (`YYYY-MM-DD HH:MM:SS`)
    pub fn issued_at_display(&self) -> String {
        self.issued_at.format("%Y-%m-%d %H:%M:%S").to_string()
    }

    /// Expiry formatted for display (`YYYY-MM-DD HH:MM:SS`)
    pub fn expires_at_display(&self) -> String {
        self.expires_at.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

/// Error type for the request guard
#[derive(Debug)]
pub enum GuardError {
    /// No bearer credential in the Authorization header
    MissingToken,

    /// Credential present but failed verification
    InvalidToken(String),
}

impl IntoResponse for GuardError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            GuardError::MissingToken => (
                StatusCode::BAD_REQUEST,
                "Authentication token not found".to_string(),
            ),
            GuardError::InvalidToken(msg) => (StatusCode::UNAUTHORIZED, msg),
        };

        let body = Json(json!({
            "statusCode": status.as_u16(),
            "message": message,
        }));

        (status, body).into_response()
    }
}

/// Extracts the bearer credential from an `Authorization` header
///
/// Returns `None` when the header is absent, unreadable, or does not carry
/// the `Bearer ` scheme.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}
