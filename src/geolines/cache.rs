//! Process-lifetime cache of loaded line layers.
//!
//! Keyed by `"feature:resolution"`. A failed load is cached like a success,
//! so a broken asset is not refetched on every frame. With a retry interval
//! configured, a failed entry becomes eligible for one new attempt once the
//! interval has passed.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::OnceCell;
use tracing::{debug, info};

use super::source::{FeatureType, GeoLineData, GeoLineSource, Resolution};

/// Cache key for a layer.
pub fn cache_key(feature: FeatureType, resolution: Resolution) -> String {
    format!("{}:{}", feature, resolution)
}

#[derive(Debug, Clone)]
struct CachedLayer {
    data: Option<Arc<GeoLineData>>,
    loaded_at: Instant,
}

type Slot = Arc<OnceCell<CachedLayer>>;

/// Memoizing wrapper around [`GeoLineSource::load`].
pub struct GeoLineCache {
    source: GeoLineSource,
    slots: Mutex<HashMap<String, Slot>>,
    failure_retry: Option<Duration>,
}

impl GeoLineCache {
    /// A cache that never retries failed loads.
    pub fn new(source: GeoLineSource) -> Self {
        Self {
            source,
            slots: Mutex::new(HashMap::new()),
            failure_retry: None,
        }
    }

    /// Allow a failed layer to be fetched again after `interval`.
    pub fn with_failure_retry(mut self, interval: Option<Duration>) -> Self {
        self.failure_retry = interval;
        self
    }

    /// Load a layer at most once per key. Concurrent callers for the same key
    /// wait on a single load and all see its result.
    pub async fn get_cached(
        &self,
        feature: FeatureType,
        resolution: Resolution,
    ) -> Option<Arc<GeoLineData>> {
        let key = cache_key(feature, resolution);
        let slot = self.slot_for(&key);

        let layer = slot
            .get_or_init(|| async {
                let data = self.source.load(feature, resolution).await.map(Arc::new);
                info!(
                    operation = "geoline_cache_fill",
                    key = %key,
                    available = data.is_some(),
                    "Line layer cached"
                );
                CachedLayer {
                    data,
                    loaded_at: Instant::now(),
                }
            })
            .await;

        layer.data.clone()
    }

    fn slot_for(&self, key: &str) -> Slot {
        let mut slots = self.slots.lock();

        if let Some(slot) = slots.get(key) {
            let expired = match (self.failure_retry, slot.get()) {
                (Some(interval), Some(layer)) => {
                    layer.data.is_none() && layer.loaded_at.elapsed() >= interval
                }
                _ => false,
            };
            if !expired {
                return slot.clone();
            }
            debug!(key = key, "Retrying failed line layer");
        }

        let slot: Slot = Arc::new(OnceCell::new());
        slots.insert(key.to_string(), slot.clone());
        slot
    }

    /// Forget one layer so the next request loads it again.
    pub fn invalidate(&self, feature: FeatureType, resolution: Resolution) -> bool {
        self.slots
            .lock()
            .remove(&cache_key(feature, resolution))
            .is_some()
    }

    /// Number of keys requested so far.
    pub fn len(&self) -> usize {
        self.slots.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of keys whose load finished with data.
    pub fn available_count(&self) -> usize {
        self.slots
            .lock()
            .values()
            .filter(|slot| slot.get().map_or(false, |layer| layer.data.is_some()))
            .count()
    }
}
