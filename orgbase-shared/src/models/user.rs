/// User model and database operations
///
/// A user account created at registration. Users belong to organisations via
/// the `organisation_user` join table; see the `membership` module.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     first_name VARCHAR(255) NOT NULL,
///     last_name VARCHAR(255) NOT NULL,
///     email VARCHAR(255) NOT NULL UNIQUE,
///     password_hash VARCHAR(255) NOT NULL,
///     phone VARCHAR(255) NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// All operations take `impl PgExecutor`, so they run against the pool or
/// inside a transaction interchangeably.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use uuid::Uuid;

/// User row
///
/// `password_hash` is an Argon2id PHC string; plaintext passwords are never
/// stored. This type never crosses the wire — see [`PublicUser`].
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID v4, database-generated)
    pub id: Uuid,

    /// First name
    pub first_name: String,

    /// Last name
    pub last_name: String,

    /// Email address, unique across all users
    pub email: String,

    /// Argon2id password hash
    pub password_hash: String,

    /// Phone number
    pub phone: String,

    /// When the account was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Argon2id hash, not the plaintext password
    pub password_hash: String,
    pub phone: String,
}

/// Wire representation of a user, without the password hash
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            user_id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            phone: user.phone,
        }
    }
}

impl User {
    /// Inserts a new user and returns the stored row
    ///
    /// # Errors
    ///
    /// Surfaces the `users_email_key` unique violation when the email is
    /// already registered.
    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        data: CreateUser,
    ) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (first_name, last_name, email, password_hash, phone)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, first_name, last_name, email, password_hash, phone, created_at
            "#,
        )
        .bind(data.first_name)
        .bind(data.last_name)
        .bind(data.email)
        .bind(data.password_hash)
        .bind(data.phone)
        .fetch_one(executor)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID
    pub async fn find_by_id<'e>(
        executor: impl PgExecutor<'e>,
        id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, first_name, last_name, email, password_hash, phone, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(user)
    }

    /// Finds a user by email address
    pub async fn find_by_email<'e>(
        executor: impl PgExecutor<'e>,
        email: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, first_name, last_name, email, password_hash, phone, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(executor)
        .await?;

        Ok(user)
    }

    /// Checks whether an email is already registered
    ///
    /// Pre-insert probe only; the unique constraint on `users.email` is the
    /// backstop under concurrent registration.
    pub async fn email_exists<'e>(
        executor: impl PgExecutor<'e>,
        email: &str,
    ) -> Result<bool, sqlx::Error> {
        let exists: (bool,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM users WHERE email = $1)")
                .bind(email)
                .fetch_one(executor)
                .await?;

        Ok(exists.0)
    }

    /// Fetches a user, scoped to the caller's organisations
    ///
    /// Returns the target user only when caller and target share at least one
    /// organisation membership. A caller always shares their default
    /// organisation with themselves.
    pub async fn find_in_shared_org<'e>(
        executor: impl PgExecutor<'e>,
        caller_id: Uuid,
        target_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT DISTINCT u.id, u.first_name, u.last_name, u.email,
                   u.password_hash, u.phone, u.created_at
            FROM users u
            JOIN organisation_user ou ON ou.user_id = u.id
            WHERE u.id = $1
              AND ou.org_id IN (
                  SELECT org_id FROM organisation_user WHERE user_id = $2
              )
            "#,
        )
        .bind(target_id)
        .bind(caller_id)
        .fetch_optional(executor)
        .await?;

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: Uuid::new_v4(),
            first_name: "Ann".to_string(),
            last_name: "Lee".to_string(),
            email: "ann@x.com".to_string(),
            password_hash: "$argon2id$...".to_string(),
            phone: "555-1".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_public_user_strips_password_hash() {
        let user = sample_user();
        let public: PublicUser = user.clone().into();

        assert_eq!(public.user_id, user.id);
        assert_eq!(public.email, "ann@x.com");

        let json = serde_json::to_value(&public).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("password_hash").is_none());
    }

    #[test]
    fn test_public_user_wire_field_names() {
        let json = serde_json::to_value(PublicUser::from(sample_user())).unwrap();

        assert!(json.get("userId").is_some());
        assert!(json.get("firstName").is_some());
        assert!(json.get("lastName").is_some());
        assert!(json.get("email").is_some());
        assert!(json.get("phone").is_some());
    }

    // Database operations are covered by integration tests against a live
    // schema.
}
