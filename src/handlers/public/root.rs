use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET / - service banner and route index
pub async fn root(State(state): State<AppState>) -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "message": "Products API",
        "name": env!("CARGO_PKG_NAME"),
        "version": version,
        "environment": format!("{:?}", state.config.environment).to_lowercase(),
        "endpoints": {
            "token": "POST /token (public)",
            "products": "GET /products[/:id] (public), POST/PUT/DELETE (admin)",
            "users": "GET /users/me (protected)",
            "sales": "GET /sales/* (public)",
        }
    }))
}

/// GET /health - 200 while storage answers, 503 otherwise
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.products.health_check().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "timestamp": now,
                    "database": "unavailable"
                })),
            )
        }
    }
}
