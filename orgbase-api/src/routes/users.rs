/// User endpoints
///
/// # Endpoints
///
/// - `GET /api/users/:id` - Fetch a user record, scoped to the caller's
///   organisations
///
/// A caller may only see users they share at least one organisation with;
/// the scoping is a SQL membership filter, not a role check.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    response::Success,
};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use orgbase_shared::{auth::guard::AuthContext, models::user::{PublicUser, User}};
use uuid::Uuid;

/// Fetch a single user record
///
/// # Errors
///
/// - `400 Bad Request`: the user does not exist or shares no organisation
///   with the caller
pub async fn get_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Success<PublicUser>>> {
    let user = User::find_in_shared_org(&state.db, auth.user_id, id)
        .await?
        .ok_or_else(|| ApiError::BadRequest("Client error".to_string()))?;

    Ok(Json(Success::new(
        "User fetched successfully",
        user.into(),
    )))
}
