//! Core data models for the route safety engine.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Closed set of point-of-interest categories.
///
/// Adding a variant forces every `match` in the scorer and the renderer to
/// be revisited; there is no runtime registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Safe,
    Moderate,
    Incident,
    Police,
    Hospital,
    #[serde(alias = "safespace")]
    SafeSpace,
    #[serde(alias = "cctv")]
    CameraCoverage,
    Lighting,
    #[serde(alias = "transport")]
    Transit,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::Safe,
        Category::Moderate,
        Category::Incident,
        Category::Police,
        Category::Hospital,
        Category::SafeSpace,
        Category::CameraCoverage,
        Category::Lighting,
        Category::Transit,
    ];

    /// Canonical wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Safe => "safe",
            Category::Moderate => "moderate",
            Category::Incident => "incident",
            Category::Police => "police",
            Category::Hospital => "hospital",
            Category::SafeSpace => "safe-space",
            Category::CameraCoverage => "camera-coverage",
            Category::Lighting => "lighting",
            Category::Transit => "transit",
        }
    }

    /// Human-readable legend label.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Safe => "Safe Zone",
            Category::Moderate => "Moderate Caution",
            Category::Incident => "Reported Incident",
            Category::Police => "Police Station",
            Category::Hospital => "Hospital",
            Category::SafeSpace => "Safe Space",
            Category::CameraCoverage => "CCTV Zone",
            Category::Lighting => "Well Lit Path",
            Category::Transit => "Public Transport",
        }
    }

    /// Marker color used by map overlays.
    pub fn marker_color(&self) -> &'static str {
        match self {
            Category::Safe => "#10B981",
            Category::Moderate => "#F59E0B",
            Category::Incident => "#DC2626",
            Category::Police => "#3B82F6",
            Category::Hospital => "#EF4444",
            Category::SafeSpace => "#8B5CF6",
            Category::CameraCoverage => "#64748B",
            Category::Lighting => "#FACC15",
            Category::Transit => "#0EA5E9",
        }
    }

    fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown category '{0}'")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "safe" => Ok(Category::Safe),
            "moderate" => Ok(Category::Moderate),
            "incident" => Ok(Category::Incident),
            "police" => Ok(Category::Police),
            "hospital" => Ok(Category::Hospital),
            "safe-space" | "safespace" => Ok(Category::SafeSpace),
            "camera-coverage" | "cctv" => Ok(Category::CameraCoverage),
            "lighting" => Ok(Category::Lighting),
            "transit" | "transport" => Ok(Category::Transit),
            _ => Err(UnknownCategory(s.to_string())),
        }
    }
}

/// Set of active categories, stored as a bitmask so it can key caches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<Category>", into = "Vec<Category>")]
pub struct CategorySet(u16);

impl CategorySet {
    pub fn empty() -> Self {
        Self(0)
    }

    pub fn all() -> Self {
        Category::ALL.iter().copied().collect()
    }

    pub fn insert(&mut self, category: Category) {
        self.0 |= category.bit();
    }

    pub fn contains(&self, category: Category) -> bool {
        self.0 & category.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Categories in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = Category> + '_ {
        Category::ALL.into_iter().filter(|c| self.contains(*c))
    }

    /// Parse a comma separated list such as `"safe,incident"`.
    /// Empty segments are ignored, so `""` yields the empty set.
    pub fn parse_list(list: &str) -> Result<Self, UnknownCategory> {
        list.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(Category::from_str)
            .collect()
    }
}

impl FromIterator<Category> for CategorySet {
    fn from_iter<I: IntoIterator<Item = Category>>(iter: I) -> Self {
        let mut set = CategorySet::empty();
        for category in iter {
            set.insert(category);
        }
        set
    }
}

impl From<Vec<Category>> for CategorySet {
    fn from(value: Vec<Category>) -> Self {
        value.into_iter().collect()
    }
}

impl From<CategorySet> for Vec<Category> {
    fn from(value: CategorySet) -> Self {
        value.iter().collect()
    }
}

/// A validated, categorized map marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointOfInterest {
    pub id: String,
    pub lat: f64,
    pub lon: f64,
    pub category: Category,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Bulk synthetic point, only shown at close zoom.
    #[serde(default)]
    pub filler: bool,
}

/// Unvalidated catalog record as it appears in datasets and document stores.
///
/// Every field is optional so that malformed entries can be reported by
/// id instead of failing the whole dataset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawPointOfInterest {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, alias = "latitude")]
    pub lat: Option<f64>,
    #[serde(default, alias = "lng", alias = "longitude")]
    pub lon: Option<f64>,
    #[serde(default, alias = "type")]
    pub category: Option<String>,
    #[serde(default, alias = "name")]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub filler: bool,
}

impl From<PointOfInterest> for RawPointOfInterest {
    fn from(poi: PointOfInterest) -> Self {
        Self {
            id: Some(poi.id),
            lat: Some(poi.lat),
            lon: Some(poi.lon),
            category: Some(poi.category.as_str().to_string()),
            title: Some(poi.title),
            description: poi.description,
            filler: poi.filler,
        }
    }
}

/// Geographic coordinate (lat/lon in decimal degrees).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    #[serde(alias = "lng")]
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lon)
    }
}

/// One vertex of a route geometry. Serialized GeoJSON-style as `[lon, lat]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct RoutePoint {
    pub lon: f64,
    pub lat: f64,
}

impl RoutePoint {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

impl From<[f64; 2]> for RoutePoint {
    fn from(value: [f64; 2]) -> Self {
        Self {
            lon: value[0],
            lat: value[1],
        }
    }
}

impl From<RoutePoint> for [f64; 2] {
    fn from(value: RoutePoint) -> Self {
        [value.lon, value.lat]
    }
}

/// A candidate path as supplied by the routing provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub geometry: Vec<RoutePoint>,
    #[serde(default)]
    pub distance_km: f64,
    #[serde(default)]
    pub duration_min: f64,
}

impl Route {
    pub fn new(geometry: Vec<RoutePoint>, distance_km: f64, duration_min: f64) -> Self {
        Self {
            geometry,
            distance_km,
            duration_min,
        }
    }

    /// Routes need at least two vertices to describe a direction of travel.
    pub fn is_scorable(&self) -> bool {
        self.geometry.len() >= 2
    }
}

/// Discrete safety tier derived from a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    HighRisk,
    Caution,
    WellMonitored,
    HighlyRecommended,
}

impl Verdict {
    pub fn label(&self) -> &'static str {
        match self {
            Verdict::HighRisk => "High risk — prefer major roads",
            Verdict::Caution => "Caution — avoid late-night travel",
            Verdict::WellMonitored => "Well-monitored, acceptable",
            Verdict::HighlyRecommended => "Highly recommended",
        }
    }

    /// Stroke color for routes in this band.
    pub fn color(&self) -> &'static str {
        match self {
            Verdict::HighRisk => "#DC2626",
            Verdict::Caution => "#F59E0B",
            Verdict::WellMonitored => "#22C55E",
            Verdict::HighlyRecommended => "#10B981",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Stroke settings for drawing a route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderStyle {
    pub color: String,
    pub width: f64,
    pub opacity: f64,
    /// Higher values are drawn on top.
    pub z_order: usize,
}

/// A route after scoring and ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredRoute {
    /// Sequential label in provider order (`A`, `B`, ...).
    pub tag: String,
    pub provider_index: usize,
    /// 1-based position in score order.
    pub rank: usize,
    pub score: u8,
    pub verdict: Verdict,
    pub verdict_label: String,
    pub recommended: bool,
    pub distance_km: f64,
    pub duration_min: f64,
    /// Vertices tested by the sampler
    pub sample_count: usize,
    /// Proximity hits counted by the scorer
    pub match_count: usize,
    pub style: RenderStyle,
    pub geometry: Vec<RoutePoint>,
}

/// Invalid viewport parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewportError {
    #[error("zoom {0} is outside 0..=22")]
    ZoomOutOfRange(u32),
    #[error(transparent)]
    UnknownCategory(UnknownCategory),
}

/// Current map view: zoom level plus the category toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Viewport {
    pub zoom: u8,
    pub categories: CategorySet,
}

impl Viewport {
    pub const MAX_ZOOM: u8 = 22;

    pub fn new(zoom: u8, categories: CategorySet) -> Self {
        Self { zoom, categories }
    }

    /// Build a viewport from request parameters. A missing category list
    /// means every category; an explicit empty list means none.
    pub fn parse(zoom: u32, categories: Option<&str>) -> Result<Self, ViewportError> {
        let zoom = u8::try_from(zoom)
            .ok()
            .filter(|z| *z <= Self::MAX_ZOOM)
            .ok_or(ViewportError::ZoomOutOfRange(zoom))?;
        let categories = match categories {
            Some(list) => CategorySet::parse_list(list).map_err(ViewportError::UnknownCategory)?,
            None => CategorySet::all(),
        };
        Ok(Self { zoom, categories })
    }

    /// Full-density view with every category enabled.
    pub fn everything() -> Self {
        Self {
            zoom: Self::MAX_ZOOM,
            categories: CategorySet::all(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_parses_legacy_aliases() {
        assert_eq!("safespace".parse::<Category>().unwrap(), Category::SafeSpace);
        assert_eq!("CCTV".parse::<Category>().unwrap(), Category::CameraCoverage);
        assert_eq!(" transport ".parse::<Category>().unwrap(), Category::Transit);
        assert!("volcano".parse::<Category>().is_err());
    }

    #[test]
    fn category_set_parses_lists() {
        let set = CategorySet::parse_list("safe, incident,,police").unwrap();
        assert_eq!(set.len(), 3);
        assert!(set.contains(Category::Incident));
        assert!(!set.contains(Category::Hospital));
        assert!(CategorySet::parse_list("").unwrap().is_empty());
        assert!(CategorySet::parse_list("safe,nope").is_err());
    }

    #[test]
    fn category_set_serializes_as_list() {
        let set: CategorySet = [Category::Police, Category::Safe].into_iter().collect();
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"["safe","police"]"#);
        let back: CategorySet = serde_json::from_str(r#"["safespace"]"#).unwrap();
        assert!(back.contains(Category::SafeSpace));
    }

    #[test]
    fn route_point_uses_lon_lat_order() {
        let point: RoutePoint = serde_json::from_str("[77.2, 28.6]").unwrap();
        assert_eq!(point.lon, 77.2);
        assert_eq!(point.lat, 28.6);
        assert_eq!(serde_json::to_string(&point).unwrap(), "[77.2,28.6]");
    }

    #[test]
    fn viewport_parse_validates_input() {
        let view = Viewport::parse(8, Some("safe,police")).unwrap();
        assert_eq!(view.zoom, 8);
        assert_eq!(view.categories.len(), 2);
        assert_eq!(Viewport::parse(5, None).unwrap().categories, CategorySet::all());
        assert!(Viewport::parse(5, Some("")).unwrap().categories.is_empty());
        assert_eq!(Viewport::parse(23, None), Err(ViewportError::ZoomOutOfRange(23)));
        assert!(matches!(
            Viewport::parse(5, Some("lava")),
            Err(ViewportError::UnknownCategory(_))
        ));
    }

    #[test]
    fn raw_record_accepts_dataset_field_names() {
        let raw: RawPointOfInterest = serde_json::from_str(
            r#"{"id":"d1","lat":28.6,"lng":77.2,"type":"safe","title":"Connaught Place"}"#,
        )
        .unwrap();
        assert_eq!(raw.lon, Some(77.2));
        assert_eq!(raw.category.as_deref(), Some("safe"));
        assert!(!raw.filler);
    }
}
