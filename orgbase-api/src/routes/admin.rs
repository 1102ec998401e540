/// Administrative table bootstrap endpoints
///
/// Operational tooling for development and first-time setup, outside the
/// request-serving core:
///
/// - `POST /admin/migrate` - drop and recreate the fixed table set
/// - `POST /admin/migrate/drop/:table` - drop one fixed table
///
/// Both destroy data; the droppable names are restricted to the fixed set.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    response::Success,
};
use axum::{
    extract::{Path, State},
    Json,
};
use orgbase_shared::db::bootstrap::{self, BootstrapError};

/// Rebuild all tables from the hardcoded schema
pub async fn migrate(State(state): State<AppState>) -> ApiResult<Json<Success<()>>> {
    bootstrap::create_tables(&state.db)
        .await
        .map_err(|e| ApiError::InternalError(format!("Migration failed: {}", e)))?;

    Ok(Json(Success::empty("Migrated successfully")))
}

/// Drop a single table by name
pub async fn drop_table(
    State(state): State<AppState>,
    Path(table): Path<String>,
) -> ApiResult<Json<Success<()>>> {
    match bootstrap::drop_table(&state.db, &table).await {
        Ok(()) => Ok(Json(Success::empty(format!(
            "Migration dropped successfully for {}",
            table
        )))),
        Err(BootstrapError::UnknownTable(name)) => {
            Err(ApiError::BadRequest(format!("Unknown table: {}", name)))
        }
        Err(BootstrapError::Database(e)) => Err(ApiError::InternalError(format!(
            "Failed to drop table: {}",
            e
        ))),
    }
}
