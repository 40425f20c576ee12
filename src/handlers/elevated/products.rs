// handlers/elevated/products.rs - product writes, admin only
//
// The admin check has already run in middleware; the acting user is only
// needed here for the audit log.

use axum::extract::{
    rejection::{JsonRejection, PathRejection},
    Path, State,
};
use axum::{Extension, Json};
use serde::Serialize;

use crate::auth::AuthenticatedUser;
use crate::database::models::{Product, ProductBase};
use crate::database::DatabaseError;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;
use crate::types::Operation;

#[derive(Debug, Serialize)]
pub struct Detail {
    pub detail: &'static str,
}

/// POST /products
pub async fn product_create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    body: Result<Json<ProductBase>, JsonRejection>,
) -> ApiResult<Product> {
    let Json(body) = body.map_err(|e| ApiError::invalid_json(e.body_text()))?;

    let product = state
        .products
        .insert(&body)
        .await
        .map_err(|e| storage_error(Operation::Create, &user, e))?;

    tracing::info!("User '{}' created product {}", user.username, product.product_key);
    Ok(ApiResponse::created(product))
}

/// PUT /products/:id - replaces every writable attribute
pub async fn product_update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<ProductBase>, JsonRejection>,
) -> ApiResult<Product> {
    let Path(id) = id.map_err(|e| ApiError::invalid_json(e.body_text()))?;
    let Json(body) = body.map_err(|e| ApiError::invalid_json(e.body_text()))?;

    let product = state
        .products
        .update(id, &body)
        .await
        .map_err(|e| storage_error(Operation::Update, &user, e))?;

    tracing::info!("User '{}' updated product {}", user.username, id);
    Ok(ApiResponse::success(product))
}

/// DELETE /products/:id
pub async fn product_delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Detail> {
    let Path(id) = id.map_err(|e| ApiError::invalid_json(e.body_text()))?;

    state
        .products
        .delete(id)
        .await
        .map_err(|e| storage_error(Operation::Delete, &user, e))?;

    tracing::info!("User '{}' deleted product {}", user.username, id);
    Ok(ApiResponse::success(Detail { detail: "Product deleted" }))
}

/// Missing rows become 404; anything else is logged with the operation and
/// the acting user, and the client sees a generic 500.
fn storage_error(operation: Operation, user: &AuthenticatedUser, err: DatabaseError) -> ApiError {
    match err {
        DatabaseError::NotFound(_) => ApiError::not_found("Product not found"),
        other => {
            tracing::error!("{} on products by '{}' failed: {}", operation, user.username, other);
            ApiError::internal_server_error("Database error occurred")
        }
    }
}
