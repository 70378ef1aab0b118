//! Catalog assembly: static dataset, filler points and reported incidents.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use saferoute_core::dataset;
use saferoute_core::models::RawPointOfInterest;
use saferoute_core::{Catalog, FillerGenerator};

use crate::config::Config;

/// One immutable catalog version. Replaced wholesale, never mutated.
#[derive(Debug)]
pub struct CatalogSnapshot {
    pub catalog: Catalog,
    pub generation: u64,
    pub loaded_at: DateTime<Utc>,
    /// Records dropped by validation
    pub rejected: usize,
    /// Accepted records that came from the incident store
    pub reported_incidents: usize,
}

impl CatalogSnapshot {
    pub fn empty() -> Self {
        Self {
            catalog: Catalog::empty(),
            generation: 0,
            loaded_at: Utc::now(),
            rejected: 0,
            reported_incidents: 0,
        }
    }

    /// Validate `base` and then `incidents` into a fresh catalog.
    pub fn build(
        base: Vec<RawPointOfInterest>,
        incidents: Vec<RawPointOfInterest>,
        generation: u64,
    ) -> Self {
        let (catalog, mut rejected) = Catalog::load(base);
        let static_len = catalog.len();
        let (catalog, incident_rejections) = catalog.union(incidents);
        rejected.extend(incident_rejections);

        let reported_incidents = catalog.len() - static_len;
        tracing::info!(
            "Catalog generation {}: {} points ({} reported incidents, {} rejected)",
            generation,
            catalog.len(),
            reported_incidents,
            rejected.len()
        );

        Self {
            catalog,
            generation,
            loaded_at: Utc::now(),
            rejected: rejected.len(),
            reported_incidents,
        }
    }
}

/// Static records: the configured dataset (or the bundled one) plus filler.
pub async fn load_base_records(config: &Config) -> Result<Vec<RawPointOfInterest>> {
    let mut records = match &config.catalog_path {
        Some(path) => {
            let json = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read catalog {}", path.display()))?;
            serde_json::from_str::<Vec<RawPointOfInterest>>(&json)
                .with_context(|| format!("Failed to parse catalog {}", path.display()))?
        }
        None => dataset::curated_records().context("Failed to parse bundled catalog")?,
    };

    if config.filler_count > 0 {
        let generator = FillerGenerator::new(config.filler_seed, config.filler_count);
        records.extend(generator.generate_records());
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn incident(id: &str) -> RawPointOfInterest {
        RawPointOfInterest {
            id: Some(id.to_string()),
            lat: Some(28.6),
            lon: Some(77.2),
            category: Some("incident".to_string()),
            title: Some("Reported incident".to_string()),
            description: None,
            filler: false,
        }
    }

    #[test]
    fn reported_incidents_are_counted_after_validation() {
        let base = vec![incident("static-1")];
        let reports = vec![
            incident("report-a"),
            incident("static-1"),
            RawPointOfInterest::default(),
        ];
        let snapshot = CatalogSnapshot::build(base, reports, 3);
        assert_eq!(snapshot.generation, 3);
        assert_eq!(snapshot.catalog.len(), 2);
        assert_eq!(snapshot.reported_incidents, 1);
        assert_eq!(snapshot.rejected, 2);
    }

    #[tokio::test]
    async fn bundled_dataset_with_filler() {
        let config = Config {
            filler_count: 10,
            ..Config::default()
        };
        let records = load_base_records(&config).await.unwrap();
        let snapshot = CatalogSnapshot::build(records, Vec::new(), 1);
        assert_eq!(snapshot.catalog.filler_count(), 10);
        assert!(snapshot.catalog.len() > 10);
    }
}
