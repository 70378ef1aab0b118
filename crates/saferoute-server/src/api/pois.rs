//! Catalog and point-of-interest endpoints.

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use saferoute_core::models::{Category, Coordinate, PointOfInterest, Viewport};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::api::error::ApiError;
use crate::state::{AppState, CatalogSnapshot};

const DEFAULT_NEARBY_RADIUS_KM: f64 = 2.0;

#[derive(Debug, Serialize)]
pub struct CategoryInfo {
    pub name: Category,
    pub label: &'static str,
    pub color: &'static str,
    pub weight: f64,
}

/// List every category with its display metadata and scoring weight.
pub async fn list_categories(State(state): State<Arc<AppState>>) -> Json<Vec<CategoryInfo>> {
    let weights = state.weights();
    Json(
        Category::ALL
            .iter()
            .map(|category| CategoryInfo {
                name: *category,
                label: category.label(),
                color: category.marker_color(),
                weight: weights.weight(*category),
            })
            .collect(),
    )
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CatalogSummary {
    pub generation: u64,
    pub total: usize,
    pub filler: usize,
    pub reported_incidents: usize,
    pub rejected: usize,
    pub categories: BTreeMap<Category, usize>,
    pub loaded_at: DateTime<Utc>,
}

impl From<&CatalogSnapshot> for CatalogSummary {
    fn from(snapshot: &CatalogSnapshot) -> Self {
        Self {
            generation: snapshot.generation,
            total: snapshot.catalog.len(),
            filler: snapshot.catalog.filler_count(),
            reported_incidents: snapshot.reported_incidents,
            rejected: snapshot.rejected,
            categories: snapshot.catalog.counts_by_category(),
            loaded_at: snapshot.loaded_at,
        }
    }
}

pub async fn catalog_summary(State(state): State<Arc<AppState>>) -> Json<CatalogSummary> {
    Json(CatalogSummary::from(state.catalog().as_ref()))
}

/// Rebuild the catalog from the static dataset and the incident store.
pub async fn reload_catalog(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CatalogSummary>, ApiError> {
    let snapshot = state.reload().await?;
    tracing::info!(
        "Catalog reloaded: generation {} with {} points",
        snapshot.generation,
        snapshot.catalog.len()
    );
    Ok(Json(CatalogSummary::from(snapshot.as_ref())))
}

#[derive(Debug, Deserialize)]
pub struct PoiQuery {
    pub zoom: Option<u32>,
    /// Comma separated category names; omitted means all
    pub categories: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PoiResponse {
    pub zoom: u8,
    pub count: usize,
    pub points: Vec<PointOfInterest>,
}

/// Points visible at the requested zoom with the requested categories.
pub async fn list_pois(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PoiQuery>,
) -> Result<Json<PoiResponse>, ApiError> {
    let viewport = Viewport::parse(
        query.zoom.unwrap_or(Viewport::MAX_ZOOM as u32),
        query.categories.as_deref(),
    )?;
    let (_, points) = state.visible_points(viewport);
    Ok(Json(PoiResponse {
        zoom: viewport.zoom,
        count: points.len(),
        points: points.as_ref().clone(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct NearbyQuery {
    pub lat: f64,
    pub lon: f64,
    pub radius_km: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NearbyResponse {
    pub center: Coordinate,
    pub radius_km: f64,
    pub count: usize,
    pub points: Vec<PointOfInterest>,
}

/// Points within a planar radius of a coordinate.
pub async fn nearby_pois(
    State(state): State<Arc<AppState>>,
    Query(query): Query<NearbyQuery>,
) -> Result<Json<NearbyResponse>, ApiError> {
    let center = Coordinate::new(query.lat, query.lon);
    if !center.is_valid() {
        return Err(ApiError::InvalidRequest(format!(
            "coordinates out of range ({}, {})",
            query.lat, query.lon
        )));
    }
    let radius_km = query.radius_km.unwrap_or(DEFAULT_NEARBY_RADIUS_KM);
    if !radius_km.is_finite() || radius_km < 0.0 {
        return Err(ApiError::InvalidRequest(format!(
            "radius_km must be a non-negative number, got {radius_km}"
        )));
    }

    let snapshot = state.catalog();
    let points: Vec<PointOfInterest> = snapshot
        .catalog
        .nearby(center, radius_km)
        .into_iter()
        .cloned()
        .collect();
    Ok(Json(NearbyResponse {
        center,
        radius_km,
        count: points.len(),
        points,
    }))
}
