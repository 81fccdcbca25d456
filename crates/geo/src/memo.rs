//! Memoized clustering.
//!
//! Map screens recluster on every re-render even when neither the point list
//! nor the radius changed. [`ClusterCache`] keys each call on a digest of the
//! ids, coordinates and radius, and hands back the previous result when they
//! match.
//!
//! # Example
//!
//! ```
//! use loofinder_geo::{ClusterCache, GeoPoint, PointOfInterest};
//!
//! let cache = ClusterCache::new(8);
//! let points = vec![PointOfInterest::new("a", GeoPoint::new(42.6977, 23.3219), ())];
//!
//! let first = cache.get_or_compute(&points, 0.5);
//! let second = cache.get_or_compute(&points, 0.5);
//! assert!(std::sync::Arc::ptr_eq(&first, &second));
//! assert_eq!(cache.hits(), 1);
//! ```

use crate::{cluster, ClusterResult, PointOfInterest};
use sha2::{Digest, Sha256};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

/// Default number of cached results.
pub const DEFAULT_CAPACITY: usize = 32;

type Results<T> = Arc<Vec<ClusterResult<T>>>;

struct Entries<T> {
    map: HashMap<String, Results<T>>,
    order: VecDeque<String>,
}

/// Thread-safe memo of clustering results, evicting the oldest entry when full.
pub struct ClusterCache<T> {
    capacity: usize,
    entries: RwLock<Entries<T>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<T: Clone> ClusterCache<T> {
    /// Create a cache holding at most `capacity` results (at least one).
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: RwLock::new(Entries {
                map: HashMap::new(),
                order: VecDeque::new(),
            }),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Return the cached clustering for `(points, radius_km)`, computing it on a miss.
    ///
    /// Any change to ids, coordinates, their order, or the radius is a miss.
    /// Payloads are not part of the key: after editing a payload in place, call
    /// [`invalidate_id`](Self::invalidate_id) or [`clear`](Self::clear) or the
    /// stale payload is served back.
    pub fn get_or_compute(&self, points: &[PointOfInterest<T>], radius_km: f64) -> Results<T> {
        let key = cache_key(points, radius_km);

        if let Some(found) = self.read_entries().map.get(&key).cloned() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            tracing::trace!(key = %&key[..12], "Cluster cache hit");
            return found;
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let computed = Arc::new(cluster(points, radius_km));

        let mut entries = self.write_entries();
        if !entries.map.contains_key(&key) {
            while entries.order.len() >= self.capacity {
                if let Some(oldest) = entries.order.pop_front() {
                    entries.map.remove(&oldest);
                }
            }
            entries.order.push_back(key.clone());
        }
        entries.map.insert(key, Arc::clone(&computed));

        computed
    }

    /// Number of cached results.
    pub fn len(&self) -> usize {
        self.read_entries().map.len()
    }

    /// Returns true when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every cached result. Hit/miss counters are kept.
    pub fn clear(&self) {
        let mut entries = self.write_entries();
        entries.map.clear();
        entries.order.clear();
    }

    /// Drop every cached result that contains a point with this id.
    ///
    /// Returns the number of results removed.
    pub fn invalidate_id(&self, id: &str) -> usize {
        let mut entries = self.write_entries();
        let stale: Vec<String> = entries
            .map
            .iter()
            .filter(|(_, groups)| {
                groups
                    .iter()
                    .any(|group| group.members().any(|m| m.id == id))
            })
            .map(|(key, _)| key.clone())
            .collect();

        for key in &stale {
            entries.map.remove(key);
        }
        entries.order.retain(|key| !stale.contains(key));

        if !stale.is_empty() {
            tracing::trace!(id, removed = stale.len(), "Invalidated cached clusterings");
        }
        stale.len()
    }

    /// Number of lookups answered from the cache.
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Number of lookups that had to cluster.
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    // A panic while holding the lock leaves the map consistent, so poisoning is ignored.
    fn read_entries(&self) -> std::sync::RwLockReadGuard<'_, Entries<T>> {
        self.entries.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_entries(&self) -> std::sync::RwLockWriteGuard<'_, Entries<T>> {
        self.entries.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<T: Clone> Default for ClusterCache<T> {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

fn cache_key<T>(points: &[PointOfInterest<T>], radius_km: f64) -> String {
    let mut hasher = Sha256::new();
    hasher.update(radius_km.to_bits().to_le_bytes());
    hasher.update((points.len() as u64).to_le_bytes());
    for point in points {
        hasher.update((point.id.len() as u64).to_le_bytes());
        hasher.update(point.id.as_bytes());
        hasher.update(point.coordinates.latitude.to_bits().to_le_bytes());
        hasher.update(point.coordinates.longitude.to_bits().to_le_bytes());
    }
    hex::encode(hasher.finalize())
}
