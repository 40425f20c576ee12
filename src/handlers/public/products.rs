use axum::extract::{
    rejection::{PathRejection, QueryRejection},
    Path, Query, State,
};

use crate::database::models::Product;
use crate::database::DatabaseError;
use crate::error::ApiError;
use crate::filter::{build_listing_query, ListingParams};
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;
use crate::types::Operation;

/// GET /products - list with optional filter, sort and pagination
///
/// `typeFilter` names the column, `searchFilter` the substring to look for,
/// `orderBy` the ascending sort column. Paging applies when both `page` and
/// `page_size` are positive.
pub async fn products_list(
    State(state): State<AppState>,
    params: Result<Query<ListingParams>, QueryRejection>,
) -> ApiResult<Vec<Product>> {
    let Query(params) = params.map_err(|e| ApiError::invalid_json(e.body_text()))?;
    let query = build_listing_query(&Product::SCHEMA, &params)?;

    let rows = state.products.list(&query).await.map_err(|e| {
        tracing::error!("{} on {} failed: {}", Operation::Select, query.table(), e);
        ApiError::internal_server_error("Database error occurred")
    })?;
    Ok(ApiResponse::success(rows))
}

/// GET /products/:id
pub async fn product_get(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Product> {
    let Path(id) = id.map_err(|e| ApiError::invalid_json(e.body_text()))?;

    match state.products.get(id).await {
        Ok(product) => Ok(ApiResponse::success(product)),
        Err(DatabaseError::NotFound(_)) => Err(ApiError::not_found("Product not found")),
        Err(e) => Err(e.into()),
    }
}
