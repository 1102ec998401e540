/// Administrative table bootstrap
///
/// Operational tooling, not a migration engine: [`create_tables`] drops and
/// recreates the four fixed tables from hardcoded DDL, and [`drop_table`]
/// drops a single table by name. Both are restricted to the fixed table set;
/// no caller-supplied SQL identifiers ever reach the database.
///
/// ⚠️  **WARNING**: both operations permanently delete data. They exist for
/// development and first-time setup, not for the request-serving path.

use sqlx::PgPool;
use tracing::{info, warn};

/// The fixed set of tables this service owns, in creation order.
pub const TABLES: [&str; 4] = [
    "users",
    "organisation",
    "organisation_owner",
    "organisation_user",
];

/// Error type for bootstrap operations
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    /// Table name is not one of the fixed set
    #[error("Unknown table: {0}")]
    UnknownTable(String),

    /// DDL execution failed
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// DDL for one table of the fixed set.
///
/// Uniqueness of `users.email` and `organisation.name`, and the composite
/// primary keys on the join tables, back the handler-level pre-checks under
/// concurrent load.
fn table_ddl(table: &str) -> Option<&'static str> {
    match table {
        "users" => Some(
            r#"
            CREATE TABLE users (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                first_name VARCHAR(255) NOT NULL,
                last_name VARCHAR(255) NOT NULL,
                email VARCHAR(255) NOT NULL UNIQUE,
                password_hash VARCHAR(255) NOT NULL,
                phone VARCHAR(255) NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        ),
        "organisation" => Some(
            r#"
            CREATE TABLE organisation (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                name VARCHAR(255) NOT NULL UNIQUE,
                description TEXT,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        ),
        "organisation_owner" => Some(
            r#"
            CREATE TABLE organisation_owner (
                org_id UUID NOT NULL REFERENCES organisation(id) ON DELETE CASCADE,
                user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                PRIMARY KEY (org_id, user_id)
            )
            "#,
        ),
        "organisation_user" => Some(
            r#"
            CREATE TABLE organisation_user (
                org_id UUID NOT NULL REFERENCES organisation(id) ON DELETE CASCADE,
                user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                PRIMARY KEY (org_id, user_id)
            )
            "#,
        ),
        _ => None,
    }
}

/// Drops and recreates all fixed tables
///
/// Tables are dropped in reverse creation order and recreated from the
/// hardcoded DDL, so the schema always matches what the models expect.
pub async fn create_tables(pool: &PgPool) -> Result<(), BootstrapError> {
    warn!("Rebuilding all tables; existing data will be lost");

    for table in TABLES.iter().rev() {
        sqlx::query(&format!("DROP TABLE IF EXISTS {} CASCADE", table))
            .execute(pool)
            .await?;
    }

    for table in TABLES {
        // table_ddl covers the whole fixed set; see the unit test
        let Some(ddl) = table_ddl(table) else {
            continue;
        };
        sqlx::query(ddl).execute(pool).await?;
        info!(table, "Created table");
    }

    Ok(())
}

/// Drops a single table by name
///
/// # Errors
///
/// Returns [`BootstrapError::UnknownTable`] before touching the database if
/// `table` is not one of the fixed set.
pub async fn drop_table(pool: &PgPool, table: &str) -> Result<(), BootstrapError> {
    if !TABLES.contains(&table) {
        return Err(BootstrapError::UnknownTable(table.to_string()));
    }

    warn!(table, "Dropping table");
    sqlx::query(&format!("DROP TABLE IF EXISTS {} CASCADE", table))
        .execute(pool)
        .await?;

    Ok(())
}
