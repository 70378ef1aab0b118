//! Tunable constants for filtering, sampling and scoring.

use crate::models::Category;
use serde::{Deserialize, Serialize};

/// Configuration for the scoring engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineRules {
    /// Score before any proximity hits are applied
    pub baseline_score: f64,
    /// Lowest score a route can receive
    pub min_score: u8,
    /// Highest score a route can receive
    pub max_score: u8,
    /// Planar match radius in degrees (~500 m at mid-latitudes)
    pub proximity_threshold_deg: f64,
    /// Target number of sampled vertices per route
    pub max_samples: usize,
    /// Filler points are hidden below this zoom level
    pub filler_min_zoom: u8,
    pub weights: CategoryWeights,
}

impl Default for EngineRules {
    fn default() -> Self {
        Self {
            baseline_score: 70.0,
            min_score: 10,
            max_score: 100,
            proximity_threshold_deg: 0.005,
            max_samples: 50,
            filler_min_zoom: 7,
            weights: CategoryWeights::default(),
        }
    }
}

/// Per-match score delta for every category.
///
/// Camera coverage, lighting and transit are informational overlays and
/// carry zero weight by default; they are listed so the choice is explicit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CategoryWeights {
    pub safe: f64,
    pub moderate: f64,
    pub incident: f64,
    pub police: f64,
    pub hospital: f64,
    pub safe_space: f64,
    pub camera_coverage: f64,
    pub lighting: f64,
    pub transit: f64,
}

impl Default for CategoryWeights {
    fn default() -> Self {
        Self {
            safe: 0.5,
            moderate: -2.0,
            incident: -5.0,
            police: 0.5,
            hospital: 0.5,
            safe_space: 1.5,
            camera_coverage: 0.0,
            lighting: 0.0,
            transit: 0.0,
        }
    }
}

impl CategoryWeights {
    pub fn weight(&self, category: Category) -> f64 {
        match category {
            Category::Safe => self.safe,
            Category::Moderate => self.moderate,
            Category::Incident => self.incident,
            Category::Police => self.police,
            Category::Hospital => self.hospital,
            Category::SafeSpace => self.safe_space,
            Category::CameraCoverage => self.camera_coverage,
            Category::Lighting => self.lighting,
            Category::Transit => self.transit,
        }
    }
}
