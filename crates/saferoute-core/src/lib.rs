pub mod catalog;
pub mod dataset;
pub mod density;
pub mod filler;
pub mod geocode;
pub mod models;
pub mod pipeline;
pub mod ranking;
pub mod rules;
pub mod sampler;
pub mod scoring;
pub mod session;
pub mod spatial;
pub mod verdict;

pub use catalog::{validate_record, Catalog, CatalogError};
pub use filler::{FillerBounds, FillerGenerator};
pub use geocode::{parse_coordinate_pair, PlaceResolver, PlaceSource, ResolvedPlace};
pub use models::{
    Category, CategorySet, Coordinate, PointOfInterest, RawPointOfInterest, RenderStyle, Route,
    RoutePoint, ScoredRoute, UnknownCategory, Verdict, Viewport, ViewportError,
};
pub use pipeline::{PipelineError, SafetyEngine};
pub use ranking::{rank, route_tag, RouteAssessment, RouteComparison};
pub use rules::{CategoryWeights, EngineRules};
pub use session::{QueryTicket, RouteQueryGate, Superseded};
pub use spatial::{km_to_planar_deg, planar_distance_deg};
pub use verdict::classify;
