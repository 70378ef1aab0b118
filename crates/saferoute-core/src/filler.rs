//! Seeded bulk point generator.
//!
//! Produces synthetic safety markers spread over a bounding box so that dense
//! zoom levels have something to show. Output is fully determined by the
//! seed, which keeps catalogs reproducible across restarts.

use crate::models::{Category, PointOfInterest, RawPointOfInterest};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

const FILLER_CATEGORIES: [Category; 4] = [
    Category::Safe,
    Category::Hospital,
    Category::Police,
    Category::SafeSpace,
];

const FILLER_DESCRIPTION: &str = "Verified safety location in this district.";

/// Rectangle the generator scatters points over.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FillerBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl Default for FillerBounds {
    fn default() -> Self {
        Self {
            min_lat: 8.0,
            max_lat: 33.0,
            min_lon: 68.0,
            max_lon: 93.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FillerGenerator {
    pub seed: u64,
    pub count: usize,
    pub bounds: FillerBounds,
}

impl FillerGenerator {
    pub fn new(seed: u64, count: usize) -> Self {
        Self {
            seed,
            count,
            bounds: FillerBounds::default(),
        }
    }

    pub fn with_bounds(mut self, bounds: FillerBounds) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn generate(&self) -> Vec<PointOfInterest> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let FillerBounds {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
        } = self.bounds;

        (0..self.count)
            .map(|i| {
                let lat = if max_lat > min_lat {
                    rng.random_range(min_lat..max_lat)
                } else {
                    min_lat
                };
                let lon = if max_lon > min_lon {
                    rng.random_range(min_lon..max_lon)
                } else {
                    min_lon
                };
                let category = FILLER_CATEGORIES[rng.random_range(0..FILLER_CATEGORIES.len())];
                PointOfInterest {
                    id: format!("gen-{i}"),
                    lat,
                    lon,
                    category,
                    title: format!("Safety Node {}", i + 1),
                    description: Some(FILLER_DESCRIPTION.to_string()),
                    filler: true,
                }
            })
            .collect()
    }

    /// Generated points as raw records, ready for `Catalog::load` or export.
    pub fn generate_records(&self) -> Vec<RawPointOfInterest> {
        self.generate().into_iter().map(RawPointOfInterest::from).collect()
    }
}
