/// Session token validation
///
/// This module validates the session JWTs the frontend sends with every API
/// request. Tokens are signed with HS256 (HMAC-SHA256) and carry the caller's
/// identity plus the permissions granted inside the active organization.
///
/// # Security
///
/// - **Algorithm**: HS256 (HMAC with SHA-256)
/// - **Validation**: Signature, expiration, and not-before checks
/// - **Secret Management**: Secrets should be at least 32 bytes (256 bits)
///
/// # Claims
///
/// Besides the standard `iss`/`iat`/`exp`/`nbf` claims, session tokens carry:
///
/// - `sub`: the user id
/// - `org_id`: the active organization (absent when the user has not selected
///   one — such tokens cannot access organization-scoped resources)
/// - `org_permissions`: permission strings such as `org:tasks:view`
///
/// # Example
///
/// ```
/// use taskboard_shared::auth::jwt::{create_session_token, validate_session_token, Claims};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let claims = Claims::new(
///     "user_2x".to_string(),
///     Some("org_1".to_string()),
///     vec!["org:tasks:view".to_string()],
/// );
/// let token = create_session_token(&claims, "a-secret-key-at-least-32-bytes-long!")?;
///
/// let validated = validate_session_token(&token, "a-secret-key-at-least-32-bytes-long!")?;
/// assert_eq!(validated.sub, "user_2x");
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Error type for session token operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Failed to validate token
    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,
}

/// Session token claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - user id
    pub sub: String,

    /// Issuer
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,

    /// Active organization id (custom claim)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org_id: Option<String>,

    /// Permission strings granted in the active organization (custom claim)
    #[serde(default)]
    pub org_permissions: Vec<String>,
}

impl Claims {
    /// Creates new claims with the default one hour expiration
    pub fn new(user_id: String, org_id: Option<String>, org_permissions: Vec<String>) -> Self {
        Self::with_expiration(user_id, org_id, org_permissions, Duration::hours(1))
    }

    /// Creates claims with a custom expiration
    pub fn with_expiration(
        user_id: String,
        org_id: Option<String>,
        org_permissions: Vec<String>,
        expires_in: Duration,
    ) -> Self {
        let now = Utc::now();

        Self {
            sub: user_id,
            iss: "taskboard".to_string(),
            iat: now.timestamp(),
            exp: (now + expires_in).timestamp(),
            nbf: now.timestamp(),
            org_id,
            org_permissions,
        }
    }
}

/// Creates a signed session token
///
/// Used by tests and local tooling; in deployment the identity provider
/// issues session tokens.
///
/// # Errors
///
/// Returns [`JwtError::CreateError`] if signing fails.
pub fn create_session_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| JwtError::CreateError(e.to_string()))
}

/// Validates a session token and returns its claims
///
/// Checks the HS256 signature, expiration, and not-before timestamps.
///
/// # Errors
///
/// - [`JwtError::Expired`] when the token is past its `exp` claim
/// - [`JwtError::ValidationError`] for any other validation failure
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::auth::jwt::validate_session_token;
///
/// # fn example(token: &str) -> Result<(), Box<dyn std::error::Error>> {
/// let claims = validate_session_token(token, "session-signing-secret")?;
/// println!("caller: {}", claims.sub);
/// # Ok(())
/// # }
/// ```
pub fn validate_session_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_nbf = true;

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        _ => JwtError::ValidationError(e.to_string()),
    })?;

    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    #[test]
    fn test_create_and_validate_token() {
        let claims = Claims::new(
            "user_1".to_string(),
            Some("org_1".to_string()),
            vec!["org:tasks:view".to_string(), "org:tasks:create".to_string()],
        );

        let token = create_session_token(&claims, SECRET).unwrap();
        let validated = validate_session_token(&token, SECRET).unwrap();

        assert_eq!(validated.sub, "user_1");
        assert_eq!(validated.org_id.as_deref(), Some("org_1"));
        assert_eq!(validated.org_permissions.len(), 2);
    }

    #[test]
    fn test_validate_with_wrong_secret_fails() {
        let claims = Claims::new("user_1".to_string(), Some("org_1".to_string()), vec![]);
        let token = create_session_token(&claims, SECRET).unwrap();

        let result = validate_session_token(&token, "a-completely-different-secret-value");
        assert!(matches!(result, Err(JwtError::ValidationError(_))));
    }

    #[test]
    fn test_expired_token_fails() {
        let claims = Claims::with_expiration(
            "user_1".to_string(),
            Some("org_1".to_string()),
            vec![],
            Duration::hours(-2),
        );
        let token = create_session_token(&claims, SECRET).unwrap();

        let result = validate_session_token(&token, SECRET);
        assert!(matches!(result, Err(JwtError::Expired)));
    }

    #[test]
    fn test_token_without_org_validates() {
        let claims = Claims::new("user_1".to_string(), None, vec![]);
        let token = create_session_token(&claims, SECRET).unwrap();

        let validated = validate_session_token(&token, SECRET).unwrap();
        assert!(validated.org_id.is_none());
        assert!(validated.org_permissions.is_empty());
    }

    #[test]
    fn test_garbage_token_fails() {
        let result = validate_session_token("not.a.token", SECRET);
        assert!(result.is_err());
    }
}
