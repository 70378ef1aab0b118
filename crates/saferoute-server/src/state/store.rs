//! Shared application state.

use dashmap::DashMap;
use saferoute_core::models::{PointOfInterest, RawPointOfInterest, Viewport};
use saferoute_core::{
    CategoryWeights, EngineRules, PlaceResolver, QueryTicket, RouteComparison, RouteQueryGate,
    SafetyEngine, Superseded,
};
use saferoute_providers::{
    FirestoreClient, Geocoder, IncidentSource, NominatimClient, OsrmClient, ProviderError,
    RoutingProvider,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::time::{Duration, Instant};

use crate::cache::{prune_cache, CacheEntry, DensityCache};
use crate::config::Config;
use crate::state::catalog::{load_base_records, CatalogSnapshot};

const MAX_SESSIONS: usize = 10_000;
const SESSION_TTL: Duration = Duration::from_secs(30 * 60);

/// External collaborators, behind traits so tests can stub them.
#[derive(Clone)]
pub struct Providers {
    pub routing: Arc<dyn RoutingProvider>,
    pub geocoder: Arc<dyn Geocoder>,
    pub incidents: Option<Arc<dyn IncidentSource>>,
}

impl Providers {
    pub fn from_config(config: &Config) -> Result<Self, ProviderError> {
        let incidents = match config.incident_store() {
            Some((url, project)) => {
                Some(Arc::new(FirestoreClient::new(url, project)?) as Arc<dyn IncidentSource>)
            }
            None => None,
        };
        Ok(Self {
            routing: Arc::new(OsrmClient::new(&config.routing_url, &config.routing_profile)?),
            geocoder: Arc::new(NominatimClient::new(&config.geocoder_url)?),
            incidents,
        })
    }
}

struct SessionEntry {
    gate: RouteQueryGate<RouteComparison>,
    touched_at: Instant,
}

impl CacheEntry for SessionEntry {
    fn fetched_at(&self) -> Instant {
        self.touched_at
    }
}

#[derive(Default)]
struct CatalogSources {
    base: Vec<RawPointOfInterest>,
    incidents: Vec<RawPointOfInterest>,
}

/// Application state shared by handlers and background loops.
pub struct AppState {
    config: Config,
    engine: SafetyEngine,
    resolver: PlaceResolver,
    providers: Providers,
    sources: Mutex<CatalogSources>,
    catalog: RwLock<Arc<CatalogSnapshot>>,
    generation: AtomicU64,
    density_cache: DensityCache,
    sessions: DashMap<String, SessionEntry>,
}

impl AppState {
    pub fn new(config: Config, rules: EngineRules, providers: Providers) -> Self {
        let density_cache = DensityCache::new(
            config.density_cache_max_entries,
            Duration::from_secs(config.density_cache_ttl_secs),
        );
        Self {
            config,
            engine: SafetyEngine::new(rules),
            resolver: PlaceResolver::default(),
            providers,
            sources: Mutex::new(CatalogSources::default()),
            catalog: RwLock::new(Arc::new(CatalogSnapshot::empty())),
            generation: AtomicU64::new(0),
            density_cache,
            sessions: DashMap::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn engine(&self) -> &SafetyEngine {
        &self.engine
    }

    pub fn weights(&self) -> &CategoryWeights {
        &self.engine.rules().weights
    }

    pub fn resolver(&self) -> &PlaceResolver {
        &self.resolver
    }

    pub fn routing(&self) -> &dyn RoutingProvider {
        self.providers.routing.as_ref()
    }

    pub fn geocoder(&self) -> &dyn Geocoder {
        self.providers.geocoder.as_ref()
    }

    pub fn incident_source(&self) -> Option<Arc<dyn IncidentSource>> {
        self.providers.incidents.clone()
    }

    /// Current catalog version.
    pub fn catalog(&self) -> Arc<CatalogSnapshot> {
        self.catalog
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Replace the static records and rebuild the catalog.
    pub fn set_base_records(&self, base: Vec<RawPointOfInterest>) -> Arc<CatalogSnapshot> {
        self.rebuild(|sources| sources.base = base)
    }

    /// Replace the reported incidents and rebuild the catalog.
    pub fn set_incident_records(&self, incidents: Vec<RawPointOfInterest>) -> Arc<CatalogSnapshot> {
        self.rebuild(|sources| sources.incidents = incidents)
    }

    fn rebuild<F>(&self, update: F) -> Arc<CatalogSnapshot>
    where
        F: FnOnce(&mut CatalogSources),
    {
        let mut sources = self
            .sources
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        update(&mut sources);

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let snapshot = Arc::new(CatalogSnapshot::build(
            sources.base.clone(),
            sources.incidents.clone(),
            generation,
        ));

        *self
            .catalog
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = snapshot.clone();
        self.density_cache.invalidate();
        snapshot
    }

    /// Re-read the static dataset and refetch incidents.
    ///
    /// An unreachable incident store keeps the previously fetched incidents.
    pub async fn reload(&self) -> anyhow::Result<Arc<CatalogSnapshot>> {
        let base = load_base_records(&self.config).await?;
        if let Some(source) = self.incident_source() {
            match source.fetch_incidents().await {
                Ok(incidents) => {
                    let mut sources = self
                        .sources
                        .lock()
                        .unwrap_or_else(|poisoned| poisoned.into_inner());
                    sources.incidents = incidents;
                }
                Err(err) => tracing::warn!("Incident fetch failed during reload: {}", err),
            }
        }
        Ok(self.set_base_records(base))
    }

    /// Points visible in `viewport`, memoized per catalog generation.
    pub fn visible_points(
        &self,
        viewport: Viewport,
    ) -> (Arc<CatalogSnapshot>, Arc<Vec<PointOfInterest>>) {
        let snapshot = self.catalog();
        let points = self
            .density_cache
            .get_or_insert_with(viewport, snapshot.generation, || {
                self.engine
                    .visible_points(&snapshot.catalog, &viewport)
                    .into_iter()
                    .cloned()
                    .collect()
            });
        (snapshot, points)
    }

    /// Start a route query for `session`, superseding its earlier queries.
    pub fn begin_query(&self, session: &str) -> QueryTicket {
        if self.sessions.len() > MAX_SESSIONS {
            prune_cache(&self.sessions, MAX_SESSIONS, SESSION_TTL);
        }
        let mut entry = self
            .sessions
            .entry(session.to_string())
            .or_insert_with(|| SessionEntry {
                gate: RouteQueryGate::new(),
                touched_at: Instant::now(),
            });
        entry.touched_at = Instant::now();
        entry.gate.begin()
    }

    /// Publish a finished query if it is still the session's newest.
    pub fn publish_query(
        &self,
        session: &str,
        ticket: QueryTicket,
        result: RouteComparison,
    ) -> Result<(), Superseded> {
        match self.sessions.get_mut(session) {
            Some(mut entry) => {
                entry.touched_at = Instant::now();
                entry.gate.publish(ticket, result)
            }
            // Session expired while the query was in flight.
            None => Ok(()),
        }
    }

    /// Last published comparison for `session`.
    pub fn latest_result(&self, session: &str) -> Option<RouteComparison> {
        self.sessions
            .get(session)
            .and_then(|entry| entry.gate.latest().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use saferoute_core::models::{Route, RoutePoint};

    fn state() -> AppState {
        let config = Config::default();
        let providers = Providers::from_config(&config).unwrap();
        AppState::new(config, EngineRules::default(), providers)
    }

    fn comparison(state: &AppState) -> RouteComparison {
        let route = Route::new(
            vec![RoutePoint::new(0.0, 0.0), RoutePoint::new(0.01, 0.0)],
            1.0,
            12.0,
        );
        state.engine().evaluate_against(&[], vec![route]).unwrap()
    }

    #[test]
    fn evicted_session_rejects_its_in_flight_query() {
        let state = state();
        let in_flight = state.begin_query("tab-1");

        // Pruned while the first query waits on the routing provider.
        state.sessions.remove("tab-1");
        let fresh = state.begin_query("tab-1");
        assert_ne!(fresh, in_flight);

        assert!(state.publish_query("tab-1", fresh, comparison(&state)).is_ok());
        let err = state
            .publish_query("tab-1", in_flight, comparison(&state))
            .unwrap_err();
        assert_eq!(err.ticket, in_flight.sequence());
        assert_eq!(err.latest, fresh.sequence());
        assert!(state.latest_result("tab-1").is_some());
    }

    #[test]
    fn sessions_are_independent() {
        let state = state();
        let a = state.begin_query("tab-a");
        let _b = state.begin_query("tab-b");
        assert!(state.publish_query("tab-a", a, comparison(&state)).is_ok());
        assert!(state.latest_result("tab-b").is_none());
    }
}
