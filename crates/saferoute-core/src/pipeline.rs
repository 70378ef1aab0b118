//! End-to-end route evaluation: filter, sample, score, classify, rank.

use crate::catalog::Catalog;
use crate::density;
use crate::models::{PointOfInterest, Route, Viewport};
use crate::ranking::{rank, RouteAssessment, RouteComparison};
use crate::rules::EngineRules;
use crate::sampler::sample;
use crate::scoring::score_samples;
use crate::verdict::classify;
use thiserror::Error;

/// Reasons the pipeline refuses to produce a comparison.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error("no route available: the routing provider returned no routes")]
    NoRoutes,
    #[error("no route available: route {index} has {points} point(s), at least 2 are required")]
    DegenerateRoute { index: usize, points: usize },
}

/// Stateless evaluator configured with a set of rules.
#[derive(Debug, Clone, Default)]
pub struct SafetyEngine {
    rules: EngineRules,
}

impl SafetyEngine {
    pub fn new(rules: EngineRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &EngineRules {
        &self.rules
    }

    /// Points visible in `viewport`.
    pub fn visible_points<'a>(
        &self,
        catalog: &'a Catalog,
        viewport: &Viewport,
    ) -> Vec<&'a PointOfInterest> {
        density::filter(catalog, viewport, &self.rules)
    }

    /// Score one route against an already filtered candidate list.
    pub fn assess(&self, route: Route, candidates: &[&PointOfInterest]) -> RouteAssessment {
        let samples = sample(&route.geometry, candidates, &self.rules);
        let score = score_samples(&samples, &self.rules);
        let match_count = samples.iter().map(|s| s.matches.len()).sum();
        RouteAssessment {
            sample_count: samples.len(),
            match_count,
            score,
            verdict: classify(score),
            route,
        }
    }

    /// Check every route before any scoring happens.
    pub fn validate(routes: &[Route]) -> Result<(), PipelineError> {
        if routes.is_empty() {
            return Err(PipelineError::NoRoutes);
        }
        if let Some((index, route)) = routes.iter().enumerate().find(|(_, r)| !r.is_scorable()) {
            return Err(PipelineError::DegenerateRoute {
                index,
                points: route.geometry.len(),
            });
        }
        Ok(())
    }

    /// Score and rank `routes` against the points visible in `viewport`.
    pub fn evaluate(
        &self,
        catalog: &Catalog,
        viewport: &Viewport,
        routes: Vec<Route>,
    ) -> Result<RouteComparison, PipelineError> {
        let candidates = self.visible_points(catalog, viewport);
        self.evaluate_against(&candidates, routes)
    }

    /// Like [`SafetyEngine::evaluate`] with a precomputed candidate list.
    pub fn evaluate_against(
        &self,
        candidates: &[&PointOfInterest],
        routes: Vec<Route>,
    ) -> Result<RouteComparison, PipelineError> {
        Self::validate(&routes)?;

        let assessments: Vec<RouteAssessment> = routes
            .into_iter()
            .map(|route| self.assess(route, candidates))
            .collect();

        rank(assessments).ok_or(PipelineError::NoRoutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RawPointOfInterest, RoutePoint, Verdict};

    fn marker(id: &str, category: &str, lat: f64, lon: f64) -> RawPointOfInterest {
        RawPointOfInterest {
            id: Some(id.to_string()),
            lat: Some(lat),
            lon: Some(lon),
            category: Some(category.to_string()),
            title: Some(id.to_string()),
            description: None,
            filler: false,
        }
    }

    fn route(points: &[(f64, f64)]) -> Route {
        Route::new(
            points.iter().map(|(lon, lat)| RoutePoint::new(*lon, *lat)).collect(),
            1.0,
            10.0,
        )
    }

    fn evaluate(catalog: &Catalog, routes: Vec<Route>) -> Result<RouteComparison, PipelineError> {
        SafetyEngine::default().evaluate(catalog, &Viewport::everything(), routes)
    }

    #[test]
    fn incident_hit_by_one_sample() {
        let (catalog, _) = Catalog::load(vec![marker("i", "incident", 0.0, 0.0)]);
        let result = evaluate(&catalog, vec![route(&[(0.0, 0.0), (0.0, 0.01)])]).unwrap();
        let best = &result.routes[0];
        assert_eq!(best.sample_count, 2);
        assert_eq!(best.match_count, 1);
        assert_eq!(best.score, 65);
        assert_eq!(best.verdict, Verdict::WellMonitored);
    }

    #[test]
    fn short_route_samples_both_vertices() {
        // Both vertices lie within the threshold of the incident.
        let (catalog, _) = Catalog::load(vec![marker("i", "incident", 0.0, 0.0)]);
        let result = evaluate(&catalog, vec![route(&[(0.0, 0.0), (0.0, 0.001)])]).unwrap();
        assert_eq!(result.routes[0].match_count, 2);
        assert_eq!(result.routes[0].score, 60);
        assert_eq!(result.routes[0].verdict_label, "Well-monitored, acceptable");
    }

    #[test]
    fn safe_space_cluster_rounds_up() {
        let (catalog, _) = Catalog::load(vec![
            marker("s1", "safe-space", 0.0, 0.0),
            marker("s2", "safe-space", 0.001, 0.0),
            marker("s3", "safe-space", 0.0, 0.001),
        ]);
        let result = evaluate(&catalog, vec![route(&[(0.0, 0.0), (0.0, 0.02)])]).unwrap();
        assert_eq!(result.routes[0].score, 75);
        assert_eq!(result.routes[0].verdict, Verdict::WellMonitored);
    }

    #[test]
    fn no_nearby_points_scores_baseline() {
        let (catalog, _) = Catalog::load(vec![marker("far", "incident", 10.0, 10.0)]);
        let result = evaluate(&catalog, vec![route(&[(0.0, 0.0), (0.0, 0.01)])]).unwrap();
        assert_eq!(result.routes[0].score, 70);
        assert_eq!(result.routes[0].verdict_label, "Well-monitored, acceptable");
    }

    #[test]
    fn empty_catalog_scores_baseline() {
        let result = evaluate(&Catalog::empty(), vec![route(&[(0.0, 0.0), (1.0, 1.0)])]).unwrap();
        assert_eq!(result.routes[0].score, 70);
    }

    #[test]
    fn scoring_is_deterministic() {
        let (catalog, _) = Catalog::load(vec![
            marker("a", "incident", 0.0, 0.0),
            marker("b", "police", 0.0, 0.002),
        ]);
        let routes = vec![route(&[(0.0, 0.0), (0.001, 0.001), (0.002, 0.002)])];
        let first = evaluate(&catalog, routes.clone()).unwrap();
        let second = evaluate(&catalog, routes).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn safest_route_is_recommended() {
        let (catalog, _) = Catalog::load(vec![
            marker("i1", "incident", 0.0, 0.0),
            marker("p1", "police", 1.0, 1.0),
        ]);
        let result = evaluate(
            &catalog,
            vec![
                route(&[(0.0, 0.0), (0.0, 0.01)]),
                route(&[(1.0, 1.0), (1.0, 1.01)]),
            ],
        )
        .unwrap();
        assert_eq!(result.recommended_index, 1);
        assert_eq!(result.recommended().unwrap().tag, "B");
    }

    #[test]
    fn hidden_categories_are_not_scored() {
        let (catalog, _) = Catalog::load(vec![marker("i", "incident", 0.0, 0.0)]);
        let view = Viewport::new(12, [crate::models::Category::Safe].into_iter().collect());
        let result = SafetyEngine::default()
            .evaluate(&catalog, &view, vec![route(&[(0.0, 0.0), (0.0, 0.01)])])
            .unwrap();
        assert_eq!(result.routes[0].score, 70);
    }

    #[test]
    fn rejects_missing_or_degenerate_routes() {
        let catalog = Catalog::empty();
        assert_eq!(evaluate(&catalog, Vec::new()), Err(PipelineError::NoRoutes));
        assert_eq!(
            evaluate(
                &catalog,
                vec![route(&[(0.0, 0.0), (0.0, 0.01)]), route(&[(0.0, 0.0)])]
            ),
            Err(PipelineError::DegenerateRoute {
                index: 1,
                points: 1
            })
        );
        assert!(PipelineError::NoRoutes
            .to_string()
            .starts_with("no route available"));
    }
}
