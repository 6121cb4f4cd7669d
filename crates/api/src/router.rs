use axum::{Router, http::StatusCode, routing::{get, post, delete}, middleware};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::{auth_handlers, product_handlers, middleware as auth_middleware, AppState};

pub const BANNER: &str = "Stockroom API running";

pub fn router(state: Arc<AppState>) -> Router {
    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/", get(|| async { BANNER }))
        .route("/api/register", post(auth_handlers::register))
        .route("/api/login", post(auth_handlers::login))
        .route("/api/products", get(product_handlers::list_products));

    // Protected routes (require a verified caller; role checks happen in handlers)
    let protected_routes = Router::new()
        .route("/api/profile", get(auth_handlers::profile))
        .route("/api/admin-only", get(auth_handlers::admin_only))
        .route("/api/products", post(product_handlers::create_product))
        .route("/api/products/bulk", post(product_handlers::bulk_create_products))
        .route("/api/products/{id}", delete(product_handlers::delete_product))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware::require_auth,
        ));

    // Combine all routes
    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}

/// The router with the HTTP plumbing every deployment gets: request
/// tracing, permissive CORS and a per-request timeout.
pub fn app(state: Arc<AppState>, request_timeout: Duration) -> Router {
    router(state)
        .layer(TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, request_timeout))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
