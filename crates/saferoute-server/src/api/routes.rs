//! REST API routes.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::api::{pois, request_context, route_scoring};
use crate::state::AppState;

/// Create the API router.
pub fn create_router() -> Router<Arc<AppState>> {
    let catalog_routes = Router::new()
        .route("/v1/categories", get(pois::list_categories))
        .route("/v1/catalog", get(pois::catalog_summary))
        .route("/v1/catalog/reload", post(pois::reload_catalog))
        .route("/v1/pois", get(pois::list_pois))
        .route("/v1/pois/nearby", get(pois::nearby_pois));

    let route_routes = Router::new()
        .route("/v1/routes/score", post(route_scoring::score_routes))
        .route("/v1/routes/plan", post(route_scoring::plan_route))
        .route("/v1/routes/latest", get(route_scoring::latest_plan));

    Router::new()
        .route("/health", get(|| async { "OK" }))
        .merge(catalog_routes)
        .merge(route_routes)
        .layer(middleware::from_fn(request_context::attach_request_context))
}
