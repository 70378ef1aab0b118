//! Point-of-interest catalog.
//!
//! A catalog is built once from raw records and is immutable afterwards.
//! Malformed records are rejected at load time and reported back to the
//! caller; they never reach the sampler or the scorer.

use crate::models::{Category, CategorySet, Coordinate, PointOfInterest, RawPointOfInterest};
use crate::spatial::{km_to_planar_deg, planar_distance_deg};
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;

/// Why a catalog record was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogError {
    #[error("entry has no id")]
    MissingId,
    #[error("entry '{id}' is missing coordinates")]
    MissingCoordinates { id: String },
    #[error("entry '{id}' has out-of-range coordinates ({lat}, {lon})")]
    InvalidCoordinates { id: String, lat: f64, lon: f64 },
    #[error("entry '{id}' has no category")]
    MissingCategory { id: String },
    #[error("entry '{id}' has unknown category '{value}'")]
    UnknownCategory { id: String, value: String },
    #[error("entry '{id}' has an empty title")]
    MissingTitle { id: String },
    #[error("duplicate id '{id}'")]
    DuplicateId { id: String },
    #[error("invalid catalog json: {0}")]
    Json(String),
}

/// Validate a single raw record.
pub fn validate_record(raw: RawPointOfInterest) -> Result<PointOfInterest, CatalogError> {
    let id = raw
        .id
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .ok_or(CatalogError::MissingId)?;

    let (Some(lat), Some(lon)) = (raw.lat, raw.lon) else {
        return Err(CatalogError::MissingCoordinates { id });
    };
    if !Coordinate::new(lat, lon).is_valid() {
        return Err(CatalogError::InvalidCoordinates { id, lat, lon });
    }

    let Some(value) = raw.category else {
        return Err(CatalogError::MissingCategory { id });
    };
    let category = match value.parse::<Category>() {
        Ok(category) => category,
        Err(_) => return Err(CatalogError::UnknownCategory { id, value }),
    };

    let title = raw.title.map(|t| t.trim().to_string()).unwrap_or_default();
    if title.is_empty() {
        return Err(CatalogError::MissingTitle { id });
    }

    Ok(PointOfInterest {
        id,
        lat,
        lon,
        category,
        title,
        description: raw.description.filter(|d| !d.trim().is_empty()),
        filler: raw.filler,
    })
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    points: Vec<PointOfInterest>,
    ids: HashSet<String>,
}

impl Catalog {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a catalog from raw records, returning the rejected entries alongside it.
    pub fn load<I>(records: I) -> (Self, Vec<CatalogError>)
    where
        I: IntoIterator<Item = RawPointOfInterest>,
    {
        let mut catalog = Self::empty();
        let rejected = catalog.extend_validated(records);
        (catalog, rejected)
    }

    /// Parse a JSON array of raw records.
    pub fn from_json_str(json: &str) -> Result<(Self, Vec<CatalogError>), CatalogError> {
        let records: Vec<RawPointOfInterest> =
            serde_json::from_str(json).map_err(|e| CatalogError::Json(e.to_string()))?;
        Ok(Self::load(records))
    }

    /// Produce a new catalog that also contains `records`.
    ///
    /// Used to merge crowd-reported incidents into the static dataset; the
    /// extra records go through the same validation and id uniqueness checks.
    pub fn union<I>(mut self, records: I) -> (Self, Vec<CatalogError>)
    where
        I: IntoIterator<Item = RawPointOfInterest>,
    {
        let rejected = self.extend_validated(records);
        (self, rejected)
    }

    fn extend_validated<I>(&mut self, records: I) -> Vec<CatalogError>
    where
        I: IntoIterator<Item = RawPointOfInterest>,
    {
        let mut rejected = Vec::new();
        for raw in records {
            let result = validate_record(raw).and_then(|poi| {
                if self.ids.contains(&poi.id) {
                    Err(CatalogError::DuplicateId { id: poi.id })
                } else {
                    Ok(poi)
                }
            });
            match result {
                Ok(poi) => {
                    self.ids.insert(poi.id.clone());
                    self.points.push(poi);
                }
                Err(err) => {
                    tracing::warn!("Rejected catalog entry: {}", err);
                    rejected.push(err);
                }
            }
        }
        rejected
    }

    pub fn points(&self) -> &[PointOfInterest] {
        &self.points
    }

    pub fn iter(&self) -> impl Iterator<Item = &PointOfInterest> {
        self.points.iter()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&PointOfInterest> {
        if !self.ids.contains(id) {
            return None;
        }
        self.points.iter().find(|p| p.id == id)
    }

    pub fn filler_count(&self) -> usize {
        self.points.iter().filter(|p| p.filler).count()
    }

    /// Points whose category is in `categories`, in catalog order.
    pub fn by_categories(&self, categories: CategorySet) -> Vec<&PointOfInterest> {
        self.points
            .iter()
            .filter(|p| categories.contains(p.category))
            .collect()
    }

    /// Points within `radius_km` of `center`, using the planar 1° ≈ 111 km rule.
    pub fn nearby(&self, center: Coordinate, radius_km: f64) -> Vec<&PointOfInterest> {
        let radius_deg = km_to_planar_deg(radius_km.max(0.0));
        self.points
            .iter()
            .filter(|p| planar_distance_deg(p.lat, p.lon, center.lat, center.lon) <= radius_deg)
            .collect()
    }

    pub fn counts_by_category(&self) -> BTreeMap<Category, usize> {
        let mut counts = BTreeMap::new();
        for poi in &self.points {
            *counts.entry(poi.category).or_insert(0) += 1;
        }
        counts
    }
}
