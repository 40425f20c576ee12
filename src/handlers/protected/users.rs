use axum::Extension;

use crate::auth::AuthenticatedUser;
use crate::middleware::{ApiResponse, ApiResult};

/// GET /users/me - the caller as resolved from the bearer token
pub async fn users_me(Extension(user): Extension<AuthenticatedUser>) -> ApiResult<AuthenticatedUser> {
    Ok(ApiResponse::success(user))
}
