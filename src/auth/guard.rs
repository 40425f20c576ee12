use serde::Serialize;

use super::credentials::{Credential, CredentialStore, Role};
use super::error::AuthError;
use super::password::PasswordHasher;
use super::token::TokenService;

/// Identity of the caller for the duration of one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthenticatedUser {
    pub username: String,
    pub role: Role,
    pub disabled: bool,
}

impl AuthenticatedUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl From<Credential> for AuthenticatedUser {
    fn from(credential: Credential) -> Self {
        Self {
            username: credential.username,
            role: credential.role,
            disabled: credential.disabled,
        }
    }
}

/// Check a username/password pair against the credential table.
///
/// Returns `None` for an unknown user or a wrong password, without saying which.
pub fn authenticate(
    credentials: &dyn CredentialStore,
    hasher: &PasswordHasher,
    username: &str,
    password: &str,
) -> Option<Credential> {
    let credential = credentials.lookup(username)?;
    if hasher.verify(password, &credential.password_hash) {
        Some(credential)
    } else {
        None
    }
}

/// Decode the bearer token and load its subject from the credential table.
pub fn resolve_current_user(
    tokens: &TokenService,
    credentials: &dyn CredentialStore,
    token: &str,
) -> Result<AuthenticatedUser, AuthError> {
    let subject = tokens.validate(token).map_err(|_| AuthError::Unauthenticated)?;
    credentials
        .lookup(&subject)
        .map(AuthenticatedUser::from)
        .ok_or_else(|| {
            tracing::warn!("Token subject '{}' no longer exists", subject);
            AuthError::Unauthenticated
        })
}

pub fn require_active(user: AuthenticatedUser) -> Result<AuthenticatedUser, AuthError> {
    if user.disabled {
        return Err(AuthError::InactiveUser);
    }
    Ok(user)
}

pub fn require_admin(user: &AuthenticatedUser) -> Result<(), AuthError> {
    if !user.is_admin() {
        return Err(AuthError::Forbidden);
    }
    Ok(())
}
