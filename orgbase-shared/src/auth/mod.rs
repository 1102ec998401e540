/// Authentication primitives
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`token`]: signed, time-limited identity tokens (HS256)
/// - [`guard`]: bearer extraction and authenticated request context
///
/// Tokens are stateless: verification is signature + expiry only, with no
/// revocation list or server-side session state.

pub mod guard;
pub mod password;
pub mod token;
