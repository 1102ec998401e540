/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /auth/register` - Register new user
/// - `POST /auth/login` - Login and get a token
///
/// Registration creates the user, their default organisation, and the owner
/// and membership rows in a single transaction, then issues an access token.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, FieldError},
    response::Success,
};
use axum::{extract::State, http::StatusCode, Json};
use orgbase_shared::{
    auth::{password, token},
    models::{
        membership::{Membership, Ownership},
        organisation::{CreateOrganisation, Organisation},
        user::{CreateUser, PublicUser, User},
    },
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Register request
///
/// Fields are optional at the serde layer so that a missing field surfaces as
/// a per-field validation error, not a body-level deserialization failure.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterRequest {
    #[validate(
        required(message = "firstName is invalid"),
        length(min = 1, message = "firstName is invalid")
    )]
    pub first_name: Option<String>,

    #[validate(
        required(message = "lastName is invalid"),
        length(min = 1, message = "lastName is invalid")
    )]
    pub last_name: Option<String>,

    #[validate(
        required(message = "email is invalid"),
        email(message = "email is invalid")
    )]
    pub email: Option<String>,

    #[validate(
        required(message = "password is invalid"),
        length(min = 1, message = "password is invalid")
    )]
    pub password: Option<String>,

    #[validate(
        required(message = "phone number is invalid"),
        length(min = 1, message = "phone number is invalid")
    )]
    pub phone: Option<String>,
}

/// Login request
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Token + user payload returned by register and login
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthData {
    pub access_token: String,
    pub user: PublicUser,
}

/// Register a new user
///
/// # Endpoint
///
/// ```text
/// POST /auth/register
/// Content-Type: application/json
///
/// {
///   "firstName": "Ann",
///   "lastName": "Lee",
///   "email": "ann@x.com",
///   "password": "secret1",
///   "phone": "555-1"
/// }
/// ```
///
/// # Errors
///
/// - `422 Unprocessable Entity`: a field is missing/invalid, or the email is
///   already registered (`{"errors": [{field, message}]}`)
/// - `500 Internal Server Error`: server error
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<Success<AuthData>>)> {
    req.validate().map_err(ApiError::from_validation)?;

    let (Some(first_name), Some(last_name), Some(email), Some(password), Some(phone)) =
        (req.first_name, req.last_name, req.email, req.password, req.phone)
    else {
        // Unreachable after validation; kept as a typed guard
        return Err(ApiError::ValidationError(vec![]));
    };

    if User::email_exists(&state.db, &email).await? {
        return Err(ApiError::Conflict(FieldError::new(
            "email",
            "Email already exists",
        )));
    }

    let password_hash = password::hash_password(&password)?;

    // User, default organisation, owner and membership rows commit together
    let mut tx = state.db.begin().await?;

    let user = User::create(
        &mut *tx,
        CreateUser {
            first_name,
            last_name,
            email,
            password_hash,
            phone,
        },
    )
    .await?;

    let org = Organisation::create(
        &mut *tx,
        CreateOrganisation {
            name: format!("{}'s Organisation", user.first_name),
            description: Some("description about this organisation".to_string()),
        },
    )
    .await?;

    Ownership::create(&mut *tx, org.id, user.id).await?;
    Membership::create(&mut *tx, org.id, user.id).await?;

    tx.commit().await?;

    let claims = token::Claims::new(user.id, state.token_ttl());
    let access_token = token::issue_token(&claims, state.jwt_secret())?;

    tracing::info!(user_id = %user.id, org_id = %org.id, "Registered new user");

    Ok((
        StatusCode::CREATED,
        Json(Success::new(
            "Registration successful",
            AuthData {
                access_token,
                user: user.into(),
            },
        )),
    ))
}

/// Login endpoint
///
/// # Endpoint
///
/// ```text
/// POST /auth/login
/// Content-Type: application/json
///
/// {
///   "email": "ann@x.com",
///   "password": "secret1"
/// }
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: email or password missing
/// - `400 Bad Request`: no account matches the credentials
///   (`{"status": "Bad request", "message": "Login unsuccessful"}`)
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<Success<AuthData>>> {
    let (email, password) = match (req.email, req.password) {
        (Some(e), Some(p)) if !e.is_empty() && !p.is_empty() => (e, p),
        _ => return Err(ApiError::Unauthorized("Authentication failed".to_string())),
    };

    let user = User::find_by_email(&state.db, &email)
        .await?
        .ok_or_else(|| ApiError::BadRequest("Login unsuccessful".to_string()))?;

    if !password::verify_password(&password, &user.password_hash)? {
        return Err(ApiError::BadRequest("Login unsuccessful".to_string()));
    }

    let claims = token::Claims::new(user.id, state.token_ttl());
    let access_token = token::issue_token(&claims, state.jwt_secret())?;

    Ok(Json(Success::new(
        "Login successful",
        AuthData {
            access_token,
            user: user.into(),
        },
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_missing_fields() {
        let req = RegisterRequest::default();
        let errors = req.validate().unwrap_err();

        // Every field reports a required error
        assert_eq!(errors.field_errors().len(), 5);
    }

    #[test]
    fn test_register_request_rejects_bad_email() {
        let req = RegisterRequest {
            first_name: Some("Ann".to_string()),
            last_name: Some("Lee".to_string()),
            email: Some("not-an-email".to_string()),
            password: Some("secret1".to_string()),
            phone: Some("555-1".to_string()),
        };

        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
        assert_eq!(errors.field_errors().len(), 1);
    }

    #[test]
    fn test_register_request_rejects_empty_strings() {
        let req = RegisterRequest {
            first_name: Some(String::new()),
            last_name: Some("Lee".to_string()),
            email: Some("ann@x.com".to_string()),
            password: Some("secret1".to_string()),
            phone: Some("555-1".to_string()),
        };

        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("first_name"));
    }

    #[test]
    fn test_register_request_accepts_valid_input() {
        let req = RegisterRequest {
            first_name: Some("Ann".to_string()),
            last_name: Some("Lee".to_string()),
            email: Some("ann@x.com".to_string()),
            password: Some("secret1".to_string()),
            phone: Some("555-1".to_string()),
        };

        assert!(req.validate().is_ok());
    }
}
