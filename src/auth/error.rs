use thiserror::Error;

/// Failures raised by the token service and the authorization guard.
///
/// Token failures are deliberately collapsed into a single variant so the
/// HTTP boundary cannot tell a bad signature from an expired token.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid token")]
    InvalidToken,

    #[error("Could not validate credentials")]
    Unauthenticated,

    #[error("Inactive user")]
    InactiveUser,

    #[error("Recurso restrito para admins!!")]
    Forbidden,

    #[error("JWT secret is empty")]
    InvalidSecret,

    #[error("Token generation failed: {0}")]
    TokenGeneration(String),

    #[error("Password hashing failed: {0}")]
    Hashing(String),
}
