//! Zoom-gated density filter.
//!
//! Curated points are visible whenever their category is active. Filler
//! points additionally need the viewport to be zoomed in to at least
//! `EngineRules::filler_min_zoom`, which keeps wide views readable and keeps
//! the sampler's catalog small.

use crate::catalog::Catalog;
use crate::models::{PointOfInterest, Viewport};
use crate::rules::EngineRules;

/// Whether a single point should be visible in `viewport`.
pub fn is_visible(poi: &PointOfInterest, viewport: &Viewport, filler_min_zoom: u8) -> bool {
    viewport.categories.contains(poi.category) && (!poi.filler || viewport.zoom >= filler_min_zoom)
}

/// Reduce `catalog` to the points visible in `viewport`, preserving catalog order.
pub fn filter<'a>(
    catalog: &'a Catalog,
    viewport: &Viewport,
    rules: &EngineRules,
) -> Vec<&'a PointOfInterest> {
    if viewport.categories.is_empty() {
        return Vec::new();
    }
    catalog
        .iter()
        .filter(|poi| is_visible(poi, viewport, rules.filler_min_zoom))
        .collect()
}
