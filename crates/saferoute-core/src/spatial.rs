//! Degree-space distance helpers.
//!
//! Everything here is a planar approximation: latitude and longitude are
//! treated as Cartesian axes. That is wrong for geodesy but cheap, and the
//! engine only needs to answer "is this marker roughly next to the path"
//! over distances of a few hundred meters.

/// Rough kilometers per degree used for radius queries.
pub const KM_PER_DEGREE: f64 = 111.0;

/// Euclidean distance in degree space between two lat/lon pairs.
///
/// Returns NaN when any input is NaN; callers compare with `<` so NaN
/// never counts as a match.
pub fn planar_distance_deg(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let dlat = lat1 - lat2;
    let dlon = lon1 - lon2;
    (dlat * dlat + dlon * dlon).sqrt()
}

/// Convert a radius in kilometers to the planar degree radius.
pub fn km_to_planar_deg(km: f64) -> f64 {
    km / KM_PER_DEGREE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn planar_distance_is_pythagorean() {
        let d = planar_distance_deg(0.0, 0.0, 0.003, 0.004);
        assert!((d - 0.005).abs() < 1e-12);
    }

    #[test]
    fn nan_never_compares_as_near() {
        let d = planar_distance_deg(f64::NAN, 0.0, 0.0, 0.0);
        assert!(!(d < 0.005));
    }

    #[test]
    fn radius_conversion() {
        assert!((km_to_planar_deg(111.0) - 1.0).abs() < 1e-12);
    }
}
