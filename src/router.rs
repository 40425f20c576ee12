use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::SecurityConfig;
use crate::handlers;
use crate::middleware::{active_user_middleware, admin_middleware};
use crate::state::AppState;

/// Build the full application router around a prepared state.
pub fn app(state: AppState) -> Router {
    let mut app = Router::new()
        .merge(public_routes())
        .merge(protected_routes(&state))
        .merge(elevated_routes(&state))
        .layer(DefaultBodyLimit::max(state.config.api.max_request_size_bytes));

    if state.config.security.enable_cors {
        app = app.layer(cors_layer(&state.config.security));
    }
    if state.config.api.enable_request_logging {
        app = app.layer(TraceLayer::new_for_http());
    }

    app.with_state(state)
}

fn public_routes() -> Router<AppState> {
    use handlers::public;

    Router::new()
        .route("/", get(public::root))
        .route("/health", get(public::health))
        .route("/token", post(public::token_post))
        .route("/products", get(public::products_list))
        .route("/products/:id", get(public::product_get))
        .route("/sales/top-products/category/:category", get(public::top_products))
        .route("/sales/best-customer", get(public::best_customer))
        .route("/sales/busiest-month", get(public::busiest_month))
        .route("/sales/top-territories", get(public::top_territories))
        // Existing clients call the report routes with a trailing slash
        .route("/sales/best-customer/", get(public::best_customer))
        .route("/sales/busiest-month/", get(public::busiest_month))
        .route("/sales/top-territories/", get(public::top_territories))
}

fn protected_routes(state: &AppState) -> Router<AppState> {
    use handlers::protected;

    Router::new()
        .route("/users/me", get(protected::users_me))
        .route_layer(middleware::from_fn_with_state(state.clone(), active_user_middleware))
}

fn elevated_routes(state: &AppState) -> Router<AppState> {
    use handlers::elevated;

    Router::new()
        .route("/products", post(elevated::product_create))
        .route(
            "/products/:id",
            put(elevated::product_update).delete(elevated::product_delete),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), admin_middleware))
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    let wildcard = security.cors_origins.is_empty() || security.cors_origins.iter().any(|o| o == "*");
    if wildcard {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", o);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any)
}
