//! HTTP API for the route safety service.

pub mod error;
pub mod pois;
pub mod request_context;
pub mod route_scoring;
mod routes;

use axum::Router;
use std::sync::Arc;

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    routes::create_router()
}
