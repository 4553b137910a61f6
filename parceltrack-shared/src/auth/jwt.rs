/// Access-token generation and validation
///
/// Authentication results carry a short-lived signed token embedding the
/// user id. Tokens are signed with HS256, expire after 15 minutes and are
/// never persisted — a fresh one is issued on every successful login.
///
/// # Example
///
/// ```
/// use parceltrack_shared::auth::jwt::{issue_token, validate_token};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let user_id = Uuid::new_v4();
/// let secret = "test-secret-key-at-least-32-bytes-long";
///
/// let token = issue_token(user_id, secret)?;
/// let claims = validate_token(&token, secret)?;
/// assert_eq!(claims.sub, user_id);
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Session token lifetime
pub const ACCESS_TOKEN_TTL_MINUTES: i64 = 15;

const ISSUER: &str = "parceltrack";

/// Error type for token operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to sign a token
    #[error("failed to create token: {0}")]
    CreateError(String),

    /// Signature/claims validation failed
    #[error("failed to validate token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("token has expired")]
    Expired,

    /// Token was issued by someone else
    #[error("invalid issuer")]
    InvalidIssuer,
}

/// Claims embedded in an access token
///
/// `sub` carries the user id; the remaining fields are the standard
/// issued-at / not-before / expiry timestamps plus the fixed issuer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject — user ID
    pub sub: Uuid,

    /// Issuer — always "parceltrack"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,
}

impl Claims {
    /// Creates claims for `user_id` expiring [`ACCESS_TOKEN_TTL_MINUTES`]
    /// from now.
    pub fn new(user_id: Uuid) -> Self {
        Self::with_ttl(user_id, Duration::minutes(ACCESS_TOKEN_TTL_MINUTES))
    }

    /// Creates claims with an explicit lifetime (used by expiry tests).
    pub fn with_ttl(user_id: Uuid, ttl: Duration) -> Self {
        let now = Utc::now();
        let expiration = now + ttl;

        Self {
            sub: user_id,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
            nbf: now.timestamp(),
        }
    }

    /// Checks if the token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Signs an access token for `user_id`.
///
/// # Errors
///
/// Returns `JwtError::CreateError` if encoding fails.
pub fn issue_token(user_id: Uuid, secret: &str) -> Result<String, JwtError> {
    sign_claims(&Claims::new(user_id), secret)
}

/// Signs explicit claims; exists so tests can issue expired tokens.
pub fn sign_claims(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("token encoding failed: {}", e)))
}

/// Validates a token's signature, expiry, not-before and issuer, returning
/// its claims.
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;
    validation.validate_nbf = true;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidIssuer => JwtError::InvalidIssuer,
        _ => JwtError::ValidationError(format!("token validation failed: {}", e)),
    })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    #[test]
    fn test_claims_ttl_is_fifteen_minutes() {
        let claims = Claims::new(Uuid::new_v4());
        let lifetime = claims.exp - claims.iat;

        assert_eq!(lifetime, ACCESS_TOKEN_TTL_MINUTES * 60);
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_issue_and_validate() {
        let user_id = Uuid::new_v4();

        let token = issue_token(user_id, SECRET).expect("should issue token");
        let claims = validate_token(&token, SECRET).expect("should validate token");

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.iss, "parceltrack");
    }

    #[test]
    fn test_validate_with_wrong_secret() {
        let token = issue_token(Uuid::new_v4(), SECRET).expect("should issue token");

        assert!(validate_token(&token, "completely-different-secret-value").is_err());
    }

    #[test]
    fn test_validate_expired_token() {
        let claims = Claims::with_ttl(Uuid::new_v4(), Duration::seconds(-60));
        assert!(claims.is_expired());

        let token = sign_claims(&claims, SECRET).expect("should sign claims");
        let result = validate_token(&token, SECRET);

        assert!(matches!(result.unwrap_err(), JwtError::Expired));
    }

    #[test]
    fn test_validate_rejects_garbage() {
        assert!(validate_token("not.a.token", SECRET).is_err());
        assert!(validate_token("", SECRET).is_err());
    }
}
