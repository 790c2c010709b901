//! Token issuance and verification.
//!
//! Tokens are HS256-signed JWTs carrying a [`Claims`] payload. The payload is
//! signed, not encrypted, so it holds only the subject id, the subject email,
//! and the validity window.

use std::fmt;

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::types::EntityId;

/// Default token lifetime.
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 72;

/// The only accepted signing algorithm.
const ALGORITHM: Algorithm = Algorithm::HS256;

/// Claims embedded in every token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject -- the user's id.
    pub sub: EntityId,
    /// The user's email at issuance time.
    pub email: String,
    /// Expiration time (UTC Unix seconds).
    pub exp: i64,
    /// Issued-at time (UTC Unix seconds).
    pub iat: i64,
}

/// Failures of token issuance or verification.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// Bad signature, unexpected algorithm, or a structurally broken token.
    #[error("invalid token: {0}")]
    Invalid(String),

    /// Signature is fine but `exp` is in the past.
    #[error("token has expired")]
    Expired,

    /// The signing library failed to produce a token.
    #[error("token signing failed: {0}")]
    Signing(String),
}

/// Symmetric signing secret, loaded once at startup.
///
/// `Debug` output is redacted.
#[derive(Clone)]
pub struct SigningSecret(String);

impl SigningSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningSecret(<redacted>)")
    }
}

/// Issues and verifies identity tokens with a process-wide secret.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer {
    /// Build an issuer with the default 72-hour lifetime.
    pub fn new(secret: &SigningSecret) -> Self {
        Self::with_ttl(secret, Duration::hours(DEFAULT_TOKEN_TTL_HOURS))
    }

    pub fn with_ttl(secret: &SigningSecret, ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Sign a token for the given subject, expiring `ttl` from now.
    pub fn issue(&self, subject_id: &str, subject_email: &str) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject_id.to_string(),
            email: subject_email.to_string(),
            exp: (now + self.ttl).timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::new(ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Validate a token and return its claims.
    ///
    /// Only HS256 is accepted. There is no leeway: a token is valid iff
    /// `now <= exp`.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(ALGORITHM);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(e.to_string()),
            })
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn test_secret() -> SigningSecret {
        SigningSecret::new("test-secret-that-is-long-enough-for-hmac")
    }

    #[test]
    fn test_issue_and_verify() {
        let issuer = TokenIssuer::new(&test_secret());
        let token = issuer.issue("user-1", "a@example.com").unwrap();

        let claims = issuer.verify(&token).expect("token validation should succeed");
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.email, "a@example.com");
        assert_eq!(claims.exp - claims.iat, DEFAULT_TOKEN_TTL_HOURS * 3600);
    }

    #[test]
    fn test_expired_token_fails() {
        let issuer = TokenIssuer::with_ttl(&test_secret(), Duration::seconds(-10));
        let token = issuer.issue("user-1", "a@example.com").unwrap();

        assert_matches!(issuer.verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_token_one_second_ahead_is_valid() {
        let issuer = TokenIssuer::with_ttl(&test_secret(), Duration::seconds(1));
        let token = issuer.issue("user-1", "a@example.com").unwrap();

        assert!(issuer.verify(&token).is_ok());
    }

    #[test]
    fn test_different_secrets_fail() {
        let issuer_a = TokenIssuer::new(&SigningSecret::new("secret-alpha"));
        let issuer_b = TokenIssuer::new(&SigningSecret::new("secret-bravo"));

        let token = issuer_a.issue("user-1", "a@example.com").unwrap();
        assert_matches!(issuer_b.verify(&token), Err(TokenError::Invalid(_)));
    }

    #[test]
    fn test_unexpected_algorithm_rejected() {
        let secret = test_secret();
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: "user-1".into(),
            email: "a@example.com".into(),
            exp: now + 600,
            iat: now,
        };
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap();

        let issuer = TokenIssuer::new(&secret);
        assert_matches!(issuer.verify(&token), Err(TokenError::Invalid(_)));
    }

    #[test]
    fn test_garbage_token_rejected() {
        let issuer = TokenIssuer::new(&test_secret());
        assert_matches!(issuer.verify("not.a.jwt"), Err(TokenError::Invalid(_)));
        assert_matches!(issuer.verify(""), Err(TokenError::Invalid(_)));
    }

    #[test]
    fn test_secret_debug_is_redacted() {
        let rendered = format!("{:?}", test_secret());
        assert!(!rendered.contains("test-secret"));
    }
}
