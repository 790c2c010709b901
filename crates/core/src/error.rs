use crate::credentials::CredentialError;
use crate::token::TokenError;

/// Domain-level failures surfaced by the access service.
///
/// The gateway maps each variant to a transport status; the `Display` text of
/// [`CoreError::Storage`] and [`CoreError::Hashing`] is for logs only and must
/// not be echoed to callers.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("A user with email {0} already exists")]
    DuplicateEmail(String),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    /// Bad credentials. Deliberately carries no detail so unknown emails and
    /// wrong passwords look the same.
    #[error("Authentication failed")]
    AuthenticationFailed,

    #[error("Token is invalid")]
    TokenInvalid,

    #[error("Token has expired")]
    TokenExpired,

    /// Authenticated, but not allowed to act on the target.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Hashing error: {0}")]
    Hashing(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<CredentialError> for CoreError {
    fn from(err: CredentialError) -> Self {
        CoreError::Hashing(err.to_string())
    }
}

impl From<TokenError> for CoreError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => CoreError::TokenExpired,
            TokenError::Invalid(_) => CoreError::TokenInvalid,
            TokenError::Signing(msg) => CoreError::Internal(format!("token signing failed: {msg}")),
        }
    }
}
