//! Safety score computation.

use crate::models::Category;
use crate::rules::EngineRules;
use crate::sampler::Sample;

/// Score a list of proximity hits.
///
/// Starts from the baseline, adds the category weight for every hit, then
/// rounds half away from zero and clamps to `[min_score, max_score]`.
/// A non-finite intermediate result falls back to the baseline.
pub fn score_categories<I>(matches: I, rules: &EngineRules) -> u8
where
    I: IntoIterator<Item = Category>,
{
    let raw = matches
        .into_iter()
        .fold(rules.baseline_score, |acc, category| acc + rules.weights.weight(category));
    clamp_score(raw, rules)
}

/// Score the output of the sampler.
pub fn score_samples(samples: &[Sample<'_>], rules: &EngineRules) -> u8 {
    score_categories(
        samples
            .iter()
            .flat_map(|s| s.matches.iter().map(|poi| poi.category)),
        rules,
    )
}

fn clamp_score(raw: f64, rules: &EngineRules) -> u8 {
    let value = if raw.is_finite() {
        raw
    } else {
        rules.baseline_score
    };
    let min = f64::from(rules.min_score);
    let max = f64::from(rules.max_score.max(rules.min_score));
    value.round().clamp(min, max) as u8
}
