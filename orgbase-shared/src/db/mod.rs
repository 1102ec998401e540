/// Database layer
///
/// # Modules
///
/// - `pool`: PostgreSQL connection pool with startup health check
/// - `bootstrap`: administrative drop/create of the fixed table set
///
/// Models live in the `models` module at crate root level.

pub mod bootstrap;
pub mod pool;
