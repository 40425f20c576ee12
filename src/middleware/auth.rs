use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::auth::{require_active, require_admin, resolve_current_user, AuthenticatedUser};
use crate::error::ApiError;
use crate::state::AppState;

/// Requires a valid bearer token whose subject is an enabled user.
///
/// Injects the `AuthenticatedUser` into request extensions.
pub async fn active_user_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = current_active_user(&state, request.headers())?;
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Same as `active_user_middleware`, then rejects anyone who is not an admin.
pub async fn admin_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = current_active_user(&state, request.headers())?;
    if let Err(e) = require_admin(&user) {
        tracing::warn!("User '{}' ({}) denied {} {}", user.username, user.role, request.method(), request.uri().path());
        return Err(e.into());
    }
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

fn current_active_user(state: &AppState, headers: &HeaderMap) -> Result<AuthenticatedUser, ApiError> {
    let token = extract_bearer_token(headers).map_err(ApiError::unauthorized)?;
    let user = resolve_current_user(&state.tokens, state.credentials.as_ref(), token)?;
    Ok(require_active(user)?)
}

/// Extract the bearer token from the Authorization header
fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, &'static str> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .ok_or("Not authenticated")?;

    let auth_str = auth_header.to_str().map_err(|_| "Not authenticated")?;

    // Scheme is case-insensitive
    let (scheme, token) = auth_str.split_once(' ').ok_or("Not authenticated")?;
    if !scheme.eq_ignore_ascii_case("bearer") || token.trim().is_empty() {
        return Err("Not authenticated");
    }
    Ok(token.trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        h
    }

    #[test]
    fn extracts_bearer_token() {
        assert_eq!(extract_bearer_token(&headers("Bearer abc.def.ghi")), Ok("abc.def.ghi"));
        assert_eq!(extract_bearer_token(&headers("bearer abc")), Ok("abc"));
    }

    #[test]
    fn rejects_missing_or_foreign_scheme() {
        assert!(extract_bearer_token(&HeaderMap::new()).is_err());
        assert!(extract_bearer_token(&headers("Basic YWRtaW46c2VjcmV0")).is_err());
        assert!(extract_bearer_token(&headers("Bearer ")).is_err());
        assert!(extract_bearer_token(&headers("Bearer")).is_err());
    }
}
