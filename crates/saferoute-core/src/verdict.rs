//! Score to verdict banding.

use crate::models::Verdict;

/// Map a score to its verdict. Bands are inclusive-lower, exclusive-upper;
/// the top band is open-ended.
pub fn classify(score: u8) -> Verdict {
    match score {
        0..=39 => Verdict::HighRisk,
        40..=59 => Verdict::Caution,
        60..=79 => Verdict::WellMonitored,
        _ => Verdict::HighlyRecommended,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_boundaries() {
        assert_eq!(classify(10), Verdict::HighRisk);
        assert_eq!(classify(39), Verdict::HighRisk);
        assert_eq!(classify(40), Verdict::Caution);
        assert_eq!(classify(59), Verdict::Caution);
        assert_eq!(classify(60), Verdict::WellMonitored);
        assert_eq!(classify(79), Verdict::WellMonitored);
        assert_eq!(classify(80), Verdict::HighlyRecommended);
        assert_eq!(classify(100), Verdict::HighlyRecommended);
    }

    #[test]
    fn every_valid_score_has_exactly_one_band() {
        let mut counts = [0usize; 4];
        for score in 10..=100u8 {
            let slot = match classify(score) {
                Verdict::HighRisk => 0,
                Verdict::Caution => 1,
                Verdict::WellMonitored => 2,
                Verdict::HighlyRecommended => 3,
            };
            counts[slot] += 1;
        }
        assert_eq!(counts, [30, 20, 20, 21]);
    }

    #[test]
    fn labels_match_product_copy() {
        assert_eq!(classify(39).label(), "High risk — prefer major roads");
        assert_eq!(classify(40).label(), "Caution — avoid late-night travel");
        assert_eq!(classify(65).label(), "Well-monitored, acceptable");
        assert_eq!(classify(90).label(), "Highly recommended");
    }
}
