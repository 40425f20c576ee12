// handlers/public/token.rs - POST /token
//
// Form-encoded `username` and `password` in, bearer token out.

use axum::extract::{rejection::FormRejection, State};
use axum::Form;
use serde::{Deserialize, Serialize};

use crate::auth::authenticate;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TokenForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
}

pub async fn token_post(
    State(state): State<AppState>,
    form: Result<Form<TokenForm>, FormRejection>,
) -> ApiResult<TokenResponse> {
    let Form(form) = form.map_err(|e| ApiError::invalid_json(e.body_text()))?;

    // bcrypt is CPU bound; keep it off the async workers
    let credentials = state.credentials.clone();
    let hasher = state.hasher;
    let username = form.username.clone();
    let credential = tokio::task::spawn_blocking(move || {
        authenticate(credentials.as_ref(), &hasher, &username, &form.password)
    })
    .await
    .map_err(|e| {
        tracing::error!("Password verification task failed: {}", e);
        ApiError::internal_server_error("Could not verify credentials")
    })?;

    let credential = match credential {
        Some(c) => c,
        None => {
            tracing::warn!("Failed login for '{}'", form.username);
            return Err(ApiError::unauthorized("Incorrect username or password"));
        }
    };

    let access_token = state.tokens.issue(&credential.username, None)?;
    tracing::info!("Issued token for '{}'", credential.username);

    Ok(ApiResponse::success(TokenResponse {
        access_token,
        token_type: "bearer",
    }))
}
