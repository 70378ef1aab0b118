//! Route scoring and planning endpoints.

use axum::{extract::State, Extension, Json};
use saferoute_core::geocode::{PlaceSource, ResolvedPlace};
use saferoute_core::models::{Coordinate, PointOfInterest, Route, ScoredRoute, Viewport};
use saferoute_core::RouteComparison;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::error::ApiError;
use crate::api::request_context::RequestContext;
use crate::state::AppState;

/// Viewport for a scoring request. Omitted zoom means full density and
/// omitted categories means all of them.
fn request_viewport(
    zoom: Option<u32>,
    categories: Option<&[String]>,
) -> Result<Viewport, ApiError> {
    let categories = categories.map(|list| list.join(","));
    Ok(Viewport::parse(
        zoom.unwrap_or(Viewport::MAX_ZOOM as u32),
        categories.as_deref(),
    )?)
}

fn evaluate(
    state: &AppState,
    viewport: Viewport,
    routes: Vec<Route>,
) -> Result<RouteComparison, ApiError> {
    let (snapshot, points) = state.visible_points(viewport);
    let candidates: Vec<&PointOfInterest> = points.iter().collect();
    let comparison = state.engine().evaluate_against(&candidates, routes)?;
    tracing::debug!(
        "Scored {} route(s) against {} visible points (catalog generation {})",
        comparison.routes.len(),
        candidates.len(),
        snapshot.generation
    );
    Ok(comparison)
}

#[derive(Debug, Deserialize)]
pub struct ScoreRoutesRequest {
    pub routes: Vec<Route>,
    pub zoom: Option<u32>,
    pub categories: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ScoreRoutesResponse {
    pub recommended_index: usize,
    /// Rank order, best first
    pub routes: Vec<ScoredRoute>,
}

impl From<RouteComparison> for ScoreRoutesResponse {
    fn from(comparison: RouteComparison) -> Self {
        Self {
            recommended_index: comparison.recommended_index,
            routes: comparison.routes,
        }
    }
}

/// Score caller-supplied route geometries.
pub async fn score_routes(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ScoreRoutesRequest>,
) -> Result<Json<ScoreRoutesResponse>, ApiError> {
    let viewport = request_viewport(req.zoom, req.categories.as_deref())?;
    let comparison = evaluate(&state, viewport, req.routes)?;
    if let Some(best) = comparison.recommended() {
        tracing::info!(
            "Recommended route {} with score {} ({})",
            best.tag,
            best.score,
            best.verdict_label
        );
    }
    Ok(Json(comparison.into()))
}

/// Origin or destination: free text or explicit coordinates.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PlaceQuery {
    Coordinates(Coordinate),
    Text(String),
}

#[derive(Debug, Deserialize)]
pub struct PlanRouteRequest {
    pub origin: PlaceQuery,
    pub destination: PlaceQuery,
    pub zoom: Option<u32>,
    pub categories: Option<Vec<String>>,
    /// Queries sharing a session supersede each other. Falls back to the
    /// `x-session-id` header.
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PlanRouteResponse {
    pub origin: ResolvedPlace,
    pub destination: ResolvedPlace,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<u64>,
    pub recommended_index: usize,
    pub routes: Vec<ScoredRoute>,
}

async fn resolve_place(state: &AppState, place: &PlaceQuery) -> Result<ResolvedPlace, ApiError> {
    match place {
        PlaceQuery::Coordinates(coordinate) => {
            if !coordinate.is_valid() {
                return Err(ApiError::InvalidRequest(format!(
                    "coordinates out of range ({}, {})",
                    coordinate.lat, coordinate.lon
                )));
            }
            Ok(ResolvedPlace {
                query: format!("{}, {}", coordinate.lat, coordinate.lon),
                coordinate: *coordinate,
                source: PlaceSource::Coordinates,
                matched: None,
            })
        }
        PlaceQuery::Text(text) => {
            if text.trim().is_empty() {
                return Err(ApiError::InvalidRequest("place name is empty".to_string()));
            }
            let snapshot = state.catalog();
            if let Some(place) = state.resolver().resolve_local(text, &snapshot.catalog) {
                return Ok(place);
            }
            Ok(state.geocoder().geocode(text).await?)
        }
    }
}

/// Resolve both endpoints, fetch candidate routes and rank them.
pub async fn plan_route(
    State(state): State<Arc<AppState>>,
    Extension(context): Extension<RequestContext>,
    Json(req): Json<PlanRouteRequest>,
) -> Result<Json<PlanRouteResponse>, ApiError> {
    let viewport = request_viewport(req.zoom, req.categories.as_deref())?;
    let session_id = context.session_or(req.session_id.as_deref());
    if let Some(id) = session_id.as_deref() {
        RequestContext::record_session(id);
    }
    let ticket = session_id.as_deref().map(|id| state.begin_query(id));

    let origin = resolve_place(&state, &req.origin).await?;
    let destination = resolve_place(&state, &req.destination).await?;
    let routes = state
        .routing()
        .routes(origin.coordinate, destination.coordinate)
        .await?;
    let comparison = evaluate(&state, viewport, routes)?;

    if let (Some(id), Some(ticket)) = (session_id.as_deref(), ticket) {
        state.publish_query(id, ticket, comparison.clone())?;
    }

    tracing::info!(
        "Planned {} route(s) from '{}' to '{}'",
        comparison.routes.len(),
        origin.query,
        destination.query
    );
    Ok(Json(PlanRouteResponse {
        origin,
        destination,
        session_id,
        query: ticket.map(|t| t.sequence()),
        recommended_index: comparison.recommended_index,
        routes: comparison.routes,
    }))
}

/// Last published plan for the session named by `?session_id=` or `x-session-id`.
pub async fn latest_plan(
    State(state): State<Arc<AppState>>,
    Extension(context): Extension<RequestContext>,
) -> Result<Json<ScoreRoutesResponse>, ApiError> {
    let session_id = context
        .session_id
        .ok_or_else(|| ApiError::InvalidRequest("session_id is required".to_string()))?;
    state
        .latest_result(&session_id)
        .map(|comparison| Json(comparison.into()))
        .ok_or_else(|| {
            ApiError::NotFound(format!("no published routes for session '{session_id}'"))
        })
}
