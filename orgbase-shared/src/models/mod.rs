/// Database models
///
/// Each model owns its table's CRUD operations as parameterized sqlx queries.
/// Operations take `impl PgExecutor`, so the same code runs against the pool
/// or inside a transaction.
///
/// # Models
///
/// - `user`: user accounts (registration, credential lookup, scoped fetch)
/// - `organisation`: organisations and per-user listings
/// - `membership`: `organisation_user` membership and `organisation_owner`
///   creator rows

pub mod membership;
pub mod organisation;
pub mod user;
