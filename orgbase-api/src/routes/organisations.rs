/// Organisation endpoints
///
/// # Endpoints
///
/// - `GET  /api/organisations` - List the caller's organisations
/// - `GET  /api/organisations/:org_id` - Fetch one organisation
/// - `POST /api/organisations` - Create an organisation
/// - `POST /api/organisations/:org_id/users` - Add a user to an organisation
///
/// All routes sit behind the bearer-token layer. Listing returns an empty
/// array for a caller with no memberships; that is a success, not an error.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    response::Success,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use orgbase_shared::{
    auth::guard::AuthContext,
    models::{
        membership::{Membership, Ownership},
        organisation::{CreateOrganisation, Organisation, PublicOrganisation},
    },
};
use serde::Deserialize;
use uuid::Uuid;

/// Create organisation request
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateOrganisationRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Add user to organisation request
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AddUserRequest {
    pub user_id: Option<Uuid>,
}

/// List all organisations the caller belongs to
pub async fn list_organisations(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Success<Vec<PublicOrganisation>>>> {
    let orgs = Organisation::list_for_user(&state.db, auth.user_id).await?;

    let data: Vec<PublicOrganisation> = orgs.into_iter().map(Into::into).collect();

    Ok(Json(Success::new(
        "Organisations fetched successfully",
        data,
    )))
}

/// Fetch a single organisation by ID
///
/// # Errors
///
/// - `400 Bad Request`: no organisation with this ID
pub async fn get_organisation(
    State(state): State<AppState>,
    Path(org_id): Path<Uuid>,
) -> ApiResult<Json<Success<PublicOrganisation>>> {
    let org = Organisation::find_by_id(&state.db, org_id)
        .await?
        .ok_or_else(|| ApiError::BadRequest("Client error".to_string()))?;

    Ok(Json(Success::new(
        "Organisation fetched successfully",
        org.into(),
    )))
}

/// Create an organisation
///
/// The caller becomes owner and first member; the three inserts commit
/// together.
///
/// # Errors
///
/// - `400 Bad Request`: name missing, empty, or already taken
pub async fn create_organisation(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateOrganisationRequest>,
) -> ApiResult<(StatusCode, Json<Success<PublicOrganisation>>)> {
    let name = match req.name {
        Some(name) if !name.is_empty() => name,
        _ => return Err(ApiError::BadRequest("Client error".to_string())),
    };

    if Organisation::name_exists(&state.db, &name).await? {
        return Err(ApiError::BadRequest("Client error".to_string()));
    }

    let mut tx = state.db.begin().await?;

    let org = Organisation::create(
        &mut *tx,
        CreateOrganisation {
            name,
            description: req.description,
        },
    )
    .await?;

    Ownership::create(&mut *tx, org.id, auth.user_id).await?;
    Membership::create(&mut *tx, org.id, auth.user_id).await?;

    tx.commit().await?;

    tracing::info!(org_id = %org.id, owner_id = %auth.user_id, "Created organisation");

    Ok((
        StatusCode::CREATED,
        Json(Success::new(
            "Organisation created successfully",
            org.into(),
        )),
    ))
}

/// Add a user to an organisation
///
/// Not idempotent: adding the same pair twice succeeds once and then fails.
///
/// # Errors
///
/// - `400 Bad Request`: `userId` missing, or the user is already a member
pub async fn add_user(
    State(state): State<AppState>,
    Path(org_id): Path<Uuid>,
    Json(req): Json<AddUserRequest>,
) -> ApiResult<Json<Success<()>>> {
    let user_id = req
        .user_id
        .ok_or_else(|| ApiError::BadRequest("Client error".to_string()))?;

    if Membership::exists(&state.db, org_id, user_id).await? {
        return Err(ApiError::BadRequest("Client error".to_string()));
    }

    Membership::create(&state.db, org_id, user_id).await?;

    Ok(Json(Success::empty("User added to organization")))
}
