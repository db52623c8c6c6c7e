mod cors;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tablero_core::AppError;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

// Multipart uploads are relayed in memory.
const PROXY_BODY_LIMIT_BYTES: usize = 20 * 1024 * 1024;

pub fn build_router(app_state: AppState, frontend_url: &str) -> Result<Router, AppError> {
    let access_routes = Router::new()
        .route(
            "/api/access/check",
            post(handlers::access::check_feature_access_handler),
        )
        .route(
            "/api/access/filter",
            post(handlers::access::filter_features_handler),
        )
        .route(
            "/api/access/cards",
            post(handlers::access::visible_cards_handler),
        )
        .route("/api/catalog", get(handlers::access::catalog_handler));

    let proxy_routes = Router::new()
        .route(
            "/api/proxy/{*path}",
            get(handlers::proxy::proxy_get_handler).post(handlers::proxy::proxy_post_handler),
        )
        .layer(DefaultBodyLimit::max(PROXY_BODY_LIMIT_BYTES));

    Ok(Router::new()
        .route("/health", get(handlers::health::health_handler))
        .merge(access_routes)
        .merge(proxy_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors::build_cors_layer(frontend_url)?)
        .with_state(app_state))
}
