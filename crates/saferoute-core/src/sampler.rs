//! Proximity sampling along a route geometry.
//!
//! Only every `step`-th vertex is tested, with
//! `step = max(1, len / max_samples)`, so long road geometries stay cheap.
//! Each sample is compared against every candidate point with the planar
//! degree distance from [`crate::spatial`]; this is an approximation, not a
//! geodesic distance.
//!
//! Matches are not deduplicated across samples. A marker close to several
//! samples is counted once per sample, so clusters along a path weigh more
//! than a lone marker.

use crate::models::{PointOfInterest, RoutePoint};
use crate::rules::EngineRules;
use crate::spatial::planar_distance_deg;

/// One sampled vertex and the points within the proximity threshold.
#[derive(Debug, Clone)]
pub struct Sample<'a> {
    /// Index of the vertex in the route geometry
    pub index: usize,
    pub point: RoutePoint,
    pub matches: Vec<&'a PointOfInterest>,
}

/// Stride between sampled vertices.
pub fn sample_step(len: usize, max_samples: usize) -> usize {
    (len / max_samples.max(1)).max(1)
}

/// Sample `geometry` and collect nearby points from `candidates`.
pub fn sample<'a>(
    geometry: &[RoutePoint],
    candidates: &[&'a PointOfInterest],
    rules: &EngineRules,
) -> Vec<Sample<'a>> {
    let step = sample_step(geometry.len(), rules.max_samples);
    let threshold = rules.proximity_threshold_deg;

    geometry
        .iter()
        .enumerate()
        .step_by(step)
        .map(|(index, point)| {
            let matches = candidates
                .iter()
                .copied()
                .filter(|poi| {
                    planar_distance_deg(point.lat, point.lon, poi.lat, poi.lon) < threshold
                })
                .collect();
            Sample {
                index,
                point: *point,
                matches,
            }
        })
        .collect()
}
