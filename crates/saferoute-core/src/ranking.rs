//! Ordering of scored routes and render metadata.

use crate::models::{RenderStyle, Route, ScoredRoute, Verdict};
use serde::{Deserialize, Serialize};

const RECOMMENDED_WIDTH: f64 = 6.0;
const RECOMMENDED_OPACITY: f64 = 0.9;
const ALTERNATE_WIDTH: f64 = 4.0;
const ALTERNATE_OPACITY: f64 = 0.7;

/// A route with its score, before ranking.
#[derive(Debug, Clone)]
pub struct RouteAssessment {
    pub route: Route,
    pub score: u8,
    pub verdict: Verdict,
    pub sample_count: usize,
    pub match_count: usize,
}

/// Ranked routes plus the recommended choice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteComparison {
    /// Routes in rank order (best first)
    pub routes: Vec<ScoredRoute>,
    /// Provider index of the recommended route
    pub recommended_index: usize,
}

impl RouteComparison {
    pub fn recommended(&self) -> Option<&ScoredRoute> {
        self.routes.iter().find(|r| r.recommended)
    }
}

/// Label for the route at `index` in provider order: A..Z, then AA, AB, ...
pub fn route_tag(index: usize) -> String {
    let mut n = index + 1;
    let mut tag = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        tag.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    tag.reverse();
    String::from_utf8(tag).unwrap_or_default()
}

/// Order assessed routes by score and attach render metadata.
///
/// The sort is stable, so equal scores keep provider order and the first
/// route seen wins a tie. Returns `None` for an empty input.
pub fn rank(assessments: Vec<RouteAssessment>) -> Option<RouteComparison> {
    if assessments.is_empty() {
        return None;
    }
    let total = assessments.len();

    let mut indexed: Vec<(usize, RouteAssessment)> = assessments.into_iter().enumerate().collect();
    indexed.sort_by(|(_, a), (_, b)| b.score.cmp(&a.score));

    let recommended_index = indexed[0].0;
    let routes = indexed
        .into_iter()
        .enumerate()
        .map(|(position, (provider_index, assessment))| {
            let rank = position + 1;
            let recommended = position == 0;
            let style = RenderStyle {
                color: assessment.verdict.color().to_string(),
                width: if recommended {
                    RECOMMENDED_WIDTH
                } else {
                    ALTERNATE_WIDTH
                },
                opacity: if recommended {
                    RECOMMENDED_OPACITY
                } else {
                    ALTERNATE_OPACITY
                },
                z_order: total - rank,
            };
            ScoredRoute {
                tag: route_tag(provider_index),
                provider_index,
                rank,
                score: assessment.score,
                verdict: assessment.verdict,
                verdict_label: assessment.verdict.label().to_string(),
                recommended,
                distance_km: assessment.route.distance_km,
                duration_min: assessment.route.duration_min,
                sample_count: assessment.sample_count,
                match_count: assessment.match_count,
                style,
                geometry: assessment.route.geometry,
            }
        })
        .collect();

    Some(RouteComparison {
        routes,
        recommended_index,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RoutePoint;
    use crate::verdict::classify;

    fn assessed(score: u8, distance_km: f64) -> RouteAssessment {
        RouteAssessment {
            route: Route::new(
                vec![RoutePoint::new(0.0, 0.0), RoutePoint::new(0.0, 0.01)],
                distance_km,
                distance_km * 12.0,
            ),
            score,
            verdict: classify(score),
            sample_count: 2,
            match_count: 0,
        }
    }

    #[test]
    fn tags_follow_spreadsheet_columns() {
        assert_eq!(route_tag(0), "A");
        assert_eq!(route_tag(2), "C");
        assert_eq!(route_tag(25), "Z");
        assert_eq!(route_tag(26), "AA");
        assert_eq!(route_tag(27), "AB");
    }

    #[test]
    fn highest_score_is_recommended() {
        let comparison =
            rank(vec![assessed(55, 1.0), assessed(82, 2.0), assessed(70, 3.0)]).unwrap();
        assert_eq!(comparison.recommended_index, 1);

        let order: Vec<(usize, usize)> = comparison
            .routes
            .iter()
            .map(|r| (r.provider_index, r.rank))
            .collect();
        assert_eq!(order, vec![(1, 1), (2, 2), (0, 3)]);

        let best = comparison.recommended().unwrap();
        assert_eq!(best.tag, "B");
        assert_eq!(best.style.width, 6.0);
        assert_eq!(best.style.z_order, 2);
        assert_eq!(best.style.color, "#10B981");
        assert_eq!(best.distance_km, 2.0);
    }

    #[test]
    fn ties_keep_provider_order() {
        let comparison =
            rank(vec![assessed(70, 1.0), assessed(70, 2.0), assessed(60, 3.0)]).unwrap();
        assert_eq!(comparison.recommended_index, 0);
        assert_eq!(comparison.routes[0].provider_index, 0);
        assert_eq!(comparison.routes[1].provider_index, 1);
        assert!(!comparison.routes[1].recommended);
        assert_eq!(comparison.routes[1].style.opacity, 0.7);
    }

    #[test]
    fn tags_stay_in_provider_order() {
        let comparison = rank(vec![assessed(30, 1.0), assessed(90, 2.0)]).unwrap();
        let tags: Vec<(usize, &str)> = comparison
            .routes
            .iter()
            .map(|r| (r.provider_index, r.tag.as_str()))
            .collect();
        assert_eq!(tags, vec![(1, "B"), (0, "A")]);
    }

    #[test]
    fn empty_input_has_no_ranking() {
        assert!(rank(Vec::new()).is_none());
    }
}
