/// Organisation model and database operations
///
/// An organisation is created explicitly through the API or implicitly at
/// registration ("<FirstName>'s Organisation"). Users are linked to
/// organisations through the `organisation_user` join table and creators are
/// recorded in `organisation_owner`; both live in the `membership` module.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE organisation (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL UNIQUE,
///     description TEXT,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use uuid::Uuid;

/// Organisation row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Organisation {
    /// Unique organisation ID (UUID v4, database-generated)
    pub id: Uuid,

    /// Organisation name, unique across all organisations
    pub name: String,

    /// Free-form description
    pub description: Option<String>,

    /// When the organisation was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new organisation
#[derive(Debug, Clone)]
pub struct CreateOrganisation {
    pub name: String,
    pub description: Option<String>,
}

/// Wire representation of an organisation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicOrganisation {
    pub org_id: Uuid,
    pub name: String,
    pub description: Option<String>,
}

impl From<Organisation> for PublicOrganisation {
    fn from(org: Organisation) -> Self {
        Self {
            org_id: org.id,
            name: org.name,
            description: org.description,
        }
    }
}

impl Organisation {
    /// Inserts a new organisation and returns the stored row
    ///
    /// # Errors
    ///
    /// Surfaces the `organisation_name_key` unique violation when the name is
    /// already taken.
    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        data: CreateOrganisation,
    ) -> Result<Self, sqlx::Error> {
        let org = sqlx::query_as::<_, Organisation>(
            r#"
            INSERT INTO organisation (name, description)
            VALUES ($1, $2)
            RETURNING id, name, description, created_at
            "#,
        )
        .bind(data.name)
        .bind(data.description)
        .fetch_one(executor)
        .await?;

        Ok(org)
    }

    /// Finds an organisation by ID
    pub async fn find_by_id<'e>(
        executor: impl PgExecutor<'e>,
        id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let org = sqlx::query_as::<_, Organisation>(
            r#"
            SELECT id, name, description, created_at
            FROM organisation
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(org)
    }

    /// Checks whether an organisation name is already taken
    pub async fn name_exists<'e>(
        executor: impl PgExecutor<'e>,
        name: &str,
    ) -> Result<bool, sqlx::Error> {
        let exists: (bool,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM organisation WHERE name = $1)")
                .bind(name)
                .fetch_one(executor)
                .await?;

        Ok(exists.0)
    }

    /// Lists all organisations a user is a member of
    ///
    /// An empty result is a valid answer, not an error: a user with no
    /// memberships gets an empty list.
    pub async fn list_for_user<'e>(
        executor: impl PgExecutor<'e>,
        user_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let orgs = sqlx::query_as::<_, Organisation>(
            r#"
            SELECT o.id, o.name, o.description, o.created_at
            FROM organisation o
            JOIN organisation_user ou ON ou.org_id = o.id
            WHERE ou.user_id = $1
            ORDER BY o.created_at
            "#,
        )
        .bind(user_id)
        .fetch_all(executor)
        .await?;

        Ok(orgs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_organisation_wire_field_names() {
        let org = Organisation {
            id: Uuid::new_v4(),
            name: "Ann's Organisation".to_string(),
            description: Some("description about this organisation".to_string()),
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(PublicOrganisation::from(org.clone())).unwrap();

        assert_eq!(json["orgId"], serde_json::json!(org.id));
        assert_eq!(json["name"], "Ann's Organisation");
        assert_eq!(json["description"], "description about this organisation");
    }
}
