//! Server configuration from environment.

use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    /// JSON dataset replacing the bundled curated markers
    pub catalog_path: Option<PathBuf>,
    /// JSON `EngineRules` overriding the built-in constants
    pub rules_path: Option<PathBuf>,
    pub filler_count: usize,
    pub filler_seed: u64,
    pub routing_url: String,
    pub routing_profile: String,
    pub geocoder_url: String,
    pub incident_store_url: Option<String>,
    pub incident_store_project: Option<String>,
    pub incident_sync_secs: u64,
    pub density_cache_max_entries: usize,
    pub density_cache_ttl_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            catalog_path: None,
            rules_path: None,
            filler_count: 400,
            filler_seed: 42,
            routing_url: "https://router.project-osrm.org".to_string(),
            routing_profile: "foot".to_string(),
            geocoder_url: "https://nominatim.openstreetmap.org".to_string(),
            incident_store_url: None,
            incident_store_project: None,
            incident_sync_secs: 300,
            density_cache_max_entries: 256,
            density_cache_ttl_secs: 600,
        }
    }
}

fn parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.trim().parse().ok())
}

fn non_empty(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: parsed("SAFEROUTE_PORT").unwrap_or(defaults.server_port),
            catalog_path: non_empty("SAFEROUTE_CATALOG_PATH").map(PathBuf::from),
            rules_path: non_empty("SAFEROUTE_RULES_PATH").map(PathBuf::from),
            filler_count: parsed("SAFEROUTE_FILLER_COUNT").unwrap_or(defaults.filler_count),
            filler_seed: parsed("SAFEROUTE_FILLER_SEED").unwrap_or(defaults.filler_seed),
            routing_url: non_empty("ROUTING_URL").unwrap_or(defaults.routing_url),
            routing_profile: non_empty("ROUTING_PROFILE").unwrap_or(defaults.routing_profile),
            geocoder_url: non_empty("GEOCODER_URL").unwrap_or(defaults.geocoder_url),
            incident_store_url: non_empty("INCIDENT_STORE_URL"),
            incident_store_project: non_empty("INCIDENT_STORE_PROJECT"),
            incident_sync_secs: parsed("INCIDENT_SYNC_SECS")
                .unwrap_or(defaults.incident_sync_secs)
                .max(1),
            density_cache_max_entries: parsed("DENSITY_CACHE_MAX_ENTRIES")
                .unwrap_or(defaults.density_cache_max_entries),
            density_cache_ttl_secs: parsed("DENSITY_CACHE_TTL_SECS")
                .unwrap_or(defaults.density_cache_ttl_secs),
        }
    }

    /// Document store settings, when both are configured.
    pub fn incident_store(&self) -> Option<(&str, &str)> {
        Some((
            self.incident_store_url.as_deref()?,
            self.incident_store_project.as_deref()?,
        ))
    }
}
