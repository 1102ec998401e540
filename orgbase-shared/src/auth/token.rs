/// Identity token issuance and verification
///
/// Tokens are stateless JWTs signed with HS256 (HMAC-SHA256). Each token
/// carries the subject user id, an issuer tag, and issued-at/expiry
/// timestamps. There is no revocation list: a leaked token stays valid until
/// its natural expiry.
///
/// # Example
///
/// ```
/// use orgbase_shared::auth::token::{issue_token, verify_token, Claims};
/// use chrono::Duration;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let user_id = Uuid::new_v4();
/// let secret = "a-secret-key-that-is-at-least-32-bytes";
///
/// let claims = Claims::new(user_id, Duration::hours(24));
/// let token = issue_token(&claims, secret)?;
///
/// let verified = verify_token(&token, secret)?;
/// assert_eq!(verified.sub, user_id);
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Issuer tag embedded in and required of every token.
const ISSUER: &str = "orgbase";

/// Error type for token operations
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// Failed to encode and sign a token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Signature does not match (wrong secret or tampered payload)
    #[error("Token signature is invalid")]
    InvalidSignature,

    /// Token is not a structurally valid credential
    #[error("Malformed token: {0}")]
    Malformed(String),
}

/// Token claims
///
/// `sub` is the authenticated user id; `iat`/`exp` are Unix timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - user ID
    pub sub: Uuid,

    /// Issuer - always "orgbase"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Creates claims for a user with the given time-to-live
    pub fn new(user_id: Uuid, ttl: Duration) -> Self {
        let now = Utc::now();

        Self {
            sub: user_id,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        }
    }

    /// Issued-at as a UTC timestamp
    pub fn issued_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.iat, 0).single().unwrap_or_default()
    }

    /// Expiry as a UTC timestamp
    pub fn expires_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.exp, 0).single().unwrap_or_default()
    }

    /// Checks whether the token is past its expiry
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Signs claims into an encoded token string
///
/// The secret should be at least 32 bytes and come from configuration, never
/// from source.
pub fn issue_token(claims: &Claims, secret: &str) -> Result<String, TokenError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| TokenError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Verifies a token's signature, issuer, and expiry, returning its claims
///
/// Expiry is checked with zero leeway: a token whose `exp` equals the current
/// second is already rejected.
///
/// # Errors
///
/// - [`TokenError::Expired`] once `exp` is reached
/// - [`TokenError::InvalidSignature`] for a wrong secret or tampered payload
/// - [`TokenError::Malformed`] for anything that does not parse as a token
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, TokenError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;
    validation.leeway = 0;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidSignature => TokenError::InvalidSignature,
        _ => TokenError::Malformed(format!("Token validation failed: {}", e)),
    })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    #[test]
    fn test_claims_creation() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id, Duration::hours(1));

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.iss, "orgbase");
        assert_eq!(claims.exp - claims.iat, 3600);
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_issue_and_verify_roundtrip() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id, Duration::hours(24));
        let token = issue_token(&claims, SECRET).expect("Should create token");

        let verified = verify_token(&token, SECRET).expect("Should verify token");
        assert_eq!(verified.sub, user_id);
        assert_eq!(verified.iat, claims.iat);
        assert_eq!(verified.exp, claims.exp);
    }

    #[test]
    fn test_verify_with_wrong_secret() {
        let claims = Claims::new(Uuid::new_v4(), Duration::hours(1));
        let token = issue_token(&claims, SECRET).expect("Should create token");

        let result = verify_token(&token, "a-completely-different-secret-key-00");
        assert!(matches!(result, Err(TokenError::InvalidSignature)));
    }

    #[test]
    fn test_verify_tampered_payload() {
        let claims = Claims::new(Uuid::new_v4(), Duration::hours(1));
        let token = issue_token(&claims, SECRET).expect("Should create token");

        // Flip one character inside the payload segment; the signature no
        // longer covers the altered bytes.
        let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
        assert_eq!(parts.len(), 3);
        let mut payload: Vec<u8> = parts[1].clone().into_bytes();
        payload[0] = if payload[0] == b'A' { b'B' } else { b'A' };
        parts[1] = String::from_utf8(payload).unwrap();
        let tampered = parts.join(".");

        let result = verify_token(&tampered, SECRET);
        assert!(matches!(result, Err(TokenError::InvalidSignature)));
    }

    #[test]
    fn test_verify_expired_token() {
        let claims = Claims::new(Uuid::new_v4(), Duration::seconds(-3600));
        assert!(claims.is_expired());

        let token = issue_token(&claims, SECRET).expect("Should create token");
        let result = verify_token(&token, SECRET);

        assert!(matches!(result, Err(TokenError::Expired)));
    }

    #[test]
    fn test_verify_expired_at_boundary() {
        // exp == now: the validity window is [iat, exp), so this is rejected.
        let claims = Claims::new(Uuid::new_v4(), Duration::zero());
        let token = issue_token(&claims, SECRET).expect("Should create token");

        let result = verify_token(&token, SECRET);
        assert!(matches!(result, Err(TokenError::Expired)));
    }

    #[test]
    fn test_verify_garbage_token() {
        let result = verify_token("not-a-token-at-all", SECRET);
        assert!(matches!(result, Err(TokenError::Malformed(_))));
    }

    #[test]
    fn test_claims_timestamp_accessors() {
        let claims = Claims::new(Uuid::new_v4(), Duration::hours(2));

        assert_eq!(claims.issued_at().timestamp(), claims.iat);
        assert_eq!(claims.expires_at().timestamp(), claims.exp);
        assert!(claims.expires_at() > claims.issued_at());
    }
}
