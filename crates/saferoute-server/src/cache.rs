//! Memoization of density-filter results.
//!
//! Entries are keyed by viewport and tagged with the catalog generation they
//! were computed from, so a result computed against a replaced catalog is
//! never served.

use dashmap::DashMap;
use saferoute_core::models::{PointOfInterest, Viewport};
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};

pub trait CacheEntry {
    fn fetched_at(&self) -> Instant;
}

/// Drop entries older than `max_age`, then the oldest ones until at most
/// `max_entries` remain.
pub fn prune_cache<K, V>(cache: &DashMap<K, V>, max_entries: usize, max_age: Duration)
where
    K: Clone + Eq + Hash,
    V: CacheEntry,
{
    let now = Instant::now();
    let mut entries: Vec<(K, Instant)> = cache
        .iter()
        .map(|entry| (entry.key().clone(), entry.value().fetched_at()))
        .collect();

    for (key, fetched_at) in &entries {
        if now.duration_since(*fetched_at) > max_age {
            cache.remove(key);
        }
    }

    if cache.len() <= max_entries {
        return;
    }

    entries.sort_by_key(|(_, fetched_at)| *fetched_at);
    for (key, _) in entries {
        if cache.len() <= max_entries {
            break;
        }
        cache.remove(&key);
    }
}

#[derive(Debug, Clone)]
pub struct DensityEntry {
    pub generation: u64,
    pub points: Arc<Vec<PointOfInterest>>,
    fetched_at: Instant,
}

impl CacheEntry for DensityEntry {
    fn fetched_at(&self) -> Instant {
        self.fetched_at
    }
}

pub struct DensityCache {
    entries: DashMap<Viewport, DensityEntry>,
    max_entries: usize,
    max_age: Duration,
}

impl DensityCache {
    pub fn new(max_entries: usize, max_age: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            max_entries,
            max_age,
        }
    }

    /// Cached points for `viewport`, computing them with `compute` on a miss.
    pub fn get_or_insert_with<F>(
        &self,
        viewport: Viewport,
        generation: u64,
        compute: F,
    ) -> Arc<Vec<PointOfInterest>>
    where
        F: FnOnce() -> Vec<PointOfInterest>,
    {
        if let Some(entry) = self.entries.get(&viewport) {
            if entry.generation == generation && entry.fetched_at.elapsed() <= self.max_age {
                return entry.points.clone();
            }
        }

        let points = Arc::new(compute());
        self.entries.insert(
            viewport,
            DensityEntry {
                generation,
                points: points.clone(),
                fetched_at: Instant::now(),
            },
        );
        if self.entries.len() > self.max_entries {
            prune_cache(&self.entries, self.max_entries, self.max_age);
        }
        points
    }

    pub fn invalidate(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use saferoute_core::models::CategorySet;
    use std::cell::Cell;

    #[test]
    fn second_lookup_is_a_hit() {
        let cache = DensityCache::new(8, Duration::from_secs(60));
        let calls = Cell::new(0);
        let view = Viewport::new(8, CategorySet::all());

        for _ in 0..3 {
            cache.get_or_insert_with(view, 1, || {
                calls.set(calls.get() + 1);
                Vec::new()
            });
        }
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn new_generation_recomputes() {
        let cache = DensityCache::new(8, Duration::from_secs(60));
        let calls = Cell::new(0);
        let view = Viewport::new(8, CategorySet::all());
        let lookup = |generation| {
            cache.get_or_insert_with(view, generation, || {
                calls.set(calls.get() + 1);
                Vec::new()
            });
        };
        lookup(1);
        lookup(2);
        lookup(2);
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn prune_keeps_newest_entries() {
        let cache = DensityCache::new(2, Duration::from_secs(60));
        for zoom in 0..5 {
            cache.get_or_insert_with(Viewport::new(zoom, CategorySet::all()), 1, Vec::new);
        }
        assert!(cache.len() <= 2);

        cache.invalidate();
        assert!(cache.is_empty());
    }
}
