//! Bundled curated marker dataset.

use crate::catalog::{Catalog, CatalogError};
use crate::filler::FillerGenerator;
use crate::models::RawPointOfInterest;

const CURATED_MARKERS: &str = include_str!("../data/curated_markers.json");

/// Raw curated records shipped with the crate.
pub fn curated_records() -> Result<Vec<RawPointOfInterest>, CatalogError> {
    serde_json::from_str(CURATED_MARKERS).map_err(|e| CatalogError::Json(e.to_string()))
}

/// Curated markers followed by `filler` generated points.
pub fn load_bundled(
    filler: Option<&FillerGenerator>,
) -> Result<(Catalog, Vec<CatalogError>), CatalogError> {
    let mut records = curated_records()?;
    if let Some(generator) = filler {
        records.extend(generator.generate_records());
    }
    Ok(Catalog::load(records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;

    #[test]
    fn curated_dataset_loads() {
        let (catalog, rejected) = load_bundled(None).unwrap();
        assert!(catalog.len() > 150);
        assert_eq!(catalog.filler_count(), 0);
        // One record uses a category the engine does not know.
        assert_eq!(rejected.len(), 1);
        assert!(matches!(rejected[0], CatalogError::UnknownCategory { .. }));

        let counts = catalog.counts_by_category();
        assert!(counts[&Category::Incident] > 0);
        assert!(counts[&Category::SafeSpace] > 0);
    }

    #[test]
    fn filler_is_appended_after_curated() {
        let generator = FillerGenerator::new(42, 50);
        let (catalog, _) = load_bundled(Some(&generator)).unwrap();
        assert_eq!(catalog.filler_count(), 50);
        assert!(catalog.get("gen-49").is_some());
        assert!(!catalog.points()[0].filler);
    }
}
