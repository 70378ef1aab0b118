//! Local place resolution.
//!
//! Covers the cheap layers of the geocoding fallback: literal coordinates,
//! a fixed alias table, then a substring search over catalog titles. When
//! all of them miss, the caller is expected to ask an external geocoder.

use crate::catalog::Catalog;
use crate::models::Coordinate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const MIN_TITLE_QUERY_LEN: usize = 3;

/// Which layer produced a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceSource {
    Coordinates,
    Alias,
    CatalogTitle,
    External,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedPlace {
    pub query: String,
    pub coordinate: Coordinate,
    pub source: PlaceSource,
    /// Matched alias or catalog title, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PlaceResolver {
    aliases: HashMap<String, Coordinate>,
}

impl Default for PlaceResolver {
    fn default() -> Self {
        Self::with_aliases(default_aliases())
    }
}

impl PlaceResolver {
    pub fn with_aliases<I, S>(aliases: I) -> Self
    where
        I: IntoIterator<Item = (S, Coordinate)>,
        S: AsRef<str>,
    {
        Self {
            aliases: aliases
                .into_iter()
                .map(|(name, coord)| (normalize(name.as_ref()), coord))
                .collect(),
        }
    }

    /// Resolve `query` without leaving the process.
    pub fn resolve_local(&self, query: &str, catalog: &Catalog) -> Option<ResolvedPlace> {
        let normalized = normalize(query);
        if normalized.is_empty() {
            return None;
        }

        if let Some(coordinate) = parse_coordinate_pair(&normalized) {
            return Some(ResolvedPlace {
                query: query.to_string(),
                coordinate,
                source: PlaceSource::Coordinates,
                matched: None,
            });
        }

        if let Some(coordinate) = self.aliases.get(&normalized) {
            return Some(ResolvedPlace {
                query: query.to_string(),
                coordinate: *coordinate,
                source: PlaceSource::Alias,
                matched: Some(normalized),
            });
        }

        if normalized.chars().count() < MIN_TITLE_QUERY_LEN {
            return None;
        }
        catalog
            .iter()
            .find(|poi| poi.title.to_lowercase().contains(&normalized))
            .map(|poi| ResolvedPlace {
                query: query.to_string(),
                coordinate: Coordinate::new(poi.lat, poi.lon),
                source: PlaceSource::CatalogTitle,
                matched: Some(poi.title.clone()),
            })
    }
}

fn normalize(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

/// Parse `"lat, lon"` or `"lat lon"`.
pub fn parse_coordinate_pair(value: &str) -> Option<Coordinate> {
    let parts: Vec<&str> = value
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .collect();
    let [lat, lon] = parts.as_slice() else {
        return None;
    };
    let coordinate = Coordinate::new(lat.parse().ok()?, lon.parse().ok()?);
    coordinate.is_valid().then_some(coordinate)
}

/// Major cities covered by the bundled dataset.
pub fn default_aliases() -> Vec<(&'static str, Coordinate)> {
    vec![
        ("delhi", Coordinate::new(28.6139, 77.2090)),
        ("new delhi", Coordinate::new(28.6139, 77.2090)),
        ("mumbai", Coordinate::new(19.0760, 72.8777)),
        ("bombay", Coordinate::new(19.0760, 72.8777)),
        ("bangalore", Coordinate::new(12.9716, 77.5946)),
        ("bengaluru", Coordinate::new(12.9716, 77.5946)),
        ("chennai", Coordinate::new(13.0827, 80.2707)),
        ("hyderabad", Coordinate::new(17.3850, 78.4867)),
        ("kolkata", Coordinate::new(22.5726, 88.3639)),
        ("pune", Coordinate::new(18.5204, 73.8567)),
        ("ahmedabad", Coordinate::new(23.0225, 72.5714)),
        ("lucknow", Coordinate::new(26.8467, 80.9462)),
        ("chandigarh", Coordinate::new(30.7333, 76.7794)),
        ("kochi", Coordinate::new(9.9312, 76.2673)),
        ("bhubaneswar", Coordinate::new(20.2961, 85.8245)),
        ("indore", Coordinate::new(22.7196, 75.8577)),
        ("agra", Coordinate::new(27.1767, 78.0081)),
        ("varanasi", Coordinate::new(25.3176, 82.9739)),
    ]
}
