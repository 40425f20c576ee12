use axum::extract::{rejection::PathRejection, Path, State};

use crate::database::models::{BestCustomer, BusiestMonth, TerritoryRevenue, TopProduct};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /sales/top-products/category/:category
pub async fn top_products(
    State(state): State<AppState>,
    category: Result<Path<i32>, PathRejection>,
) -> ApiResult<Vec<TopProduct>> {
    let Path(category) = category.map_err(|e| ApiError::invalid_json(e.body_text()))?;

    let rows = state.reports.top_products(category).await?;
    if rows.is_empty() {
        return Err(ApiError::not_found("Category not found"));
    }
    Ok(ApiResponse::success(rows))
}

/// GET /sales/best-customer
pub async fn best_customer(State(state): State<AppState>) -> ApiResult<Vec<BestCustomer>> {
    Ok(ApiResponse::success(state.reports.best_customer().await?))
}

/// GET /sales/busiest-month
pub async fn busiest_month(State(state): State<AppState>) -> ApiResult<Vec<BusiestMonth>> {
    Ok(ApiResponse::success(state.reports.busiest_month().await?))
}

/// GET /sales/top-territories
pub async fn top_territories(State(state): State<AppState>) -> ApiResult<Vec<TerritoryRevenue>> {
    Ok(ApiResponse::success(state.reports.top_territories().await?))
}
