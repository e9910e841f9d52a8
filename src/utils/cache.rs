//! High-Performance In-Memory Signal Cache
//!
//! Thread-safe cache for aggregated signal bundles, keyed by domain.
//! Uses DashMap for concurrent access without a global lock.
//!
//! Features:
//! - Per-entry expiry timestamp, checked lazily on every `get`
//! - Generation-tagged entries so an old expiry never evicts a newer bundle
//! - Supervised background sweep that can be shut down and awaited
//! - Domain normalization (lowercase) and HIT/MISS statistics

use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::models::signals::SignalBundle;
use crate::utils::constants::MIN_SWEEP_INTERVAL;

/// Cache entry with its own expiry instant
#[derive(Clone, Debug)]
pub struct CacheEntry {
    /// Shared, read-only bundle
    pub bundle: Arc<SignalBundle>,
    /// When the entry was installed
    pub inserted_at: Instant,
    /// When the entry stops being served
    pub expires_at: Instant,
    /// Monotonic insertion id, unique per cache
    pub generation: u64,
}

impl CacheEntry {
    /// Check whether the entry has expired
    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }

    /// Remaining lifetime (zero once expired)
    pub fn remaining_ttl(&self) -> Duration {
        self.expires_at.saturating_duration_since(Instant::now())
    }
}

/// Domain → signal bundle cache with TTL
#[derive(Clone)]
pub struct SignalCache {
    /// Internal storage: lowercase domain -> CacheEntry
    store: Arc<DashMap<String, CacheEntry>>,
    ttl: Duration,
    next_generation: Arc<AtomicU64>,
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
}

impl SignalCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            store: Arc::new(DashMap::new()),
            ttl,
            next_generation: Arc::new(AtomicU64::new(0)),
            hits: Arc::new(AtomicU64::new(0)),
            misses: Arc::new(AtomicU64::new(0)),
        }
    }

    #[inline]
    fn normalize(domain: &str) -> String {
        domain.trim().to_lowercase()
    }

    /// Returns the bundle if present and not yet expired
    pub fn get(&self, domain: &str) -> Option<Arc<SignalBundle>> {
        let key = Self::normalize(domain);

        let Some(entry) = self.store.get(&key) else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            debug!("📭 CACHE MISS: {}", key);
            return None;
        };

        if entry.is_expired() {
            let generation = entry.generation;
            drop(entry); // Release shard read lock before taking the write lock
            // Only remove the exact entry we saw; a concurrent put may have
            // replaced it in the meantime.
            self.store
                .remove_if(&key, |_, current| current.generation == generation);
            self.misses.fetch_add(1, Ordering::Relaxed);
            debug!("📭 CACHE MISS (expired): {}", key);
            return None;
        }

        self.hits.fetch_add(1, Ordering::Relaxed);
        info!(
            "✅ CACHE HIT: {} (TTL: {}s remaining)",
            key,
            entry.remaining_ttl().as_secs()
        );
        Some(entry.bundle.clone())
    }

    /// Install a fully built bundle, replacing any previous entry for `domain`
    pub fn put(&self, domain: &str, bundle: SignalBundle) -> Arc<SignalBundle> {
        let key = Self::normalize(domain);
        let now = Instant::now();
        let bundle = Arc::new(bundle);
        let entry = CacheEntry {
            bundle: bundle.clone(),
            inserted_at: now,
            expires_at: now + self.ttl,
            generation: self.next_generation.fetch_add(1, Ordering::Relaxed),
        };

        self.store.insert(key.clone(), entry);
        info!("💾 CACHE SET: {} (TTL: {}s)", key, self.ttl.as_secs());
        bundle
    }

    /// Remove every expired entry, returns how many were removed
    pub fn cleanup_expired(&self) -> usize {
        let before = self.store.len();
        self.store.retain(|_, entry| !entry.is_expired());
        let removed = before.saturating_sub(self.store.len());
        if removed > 0 {
            info!("🧹 CACHE CLEANUP: {} expired entries removed", removed);
        }
        removed
    }

    /// Start the periodic sweep. Must be called from within a Tokio runtime.
    /// Intervals shorter than `MIN_SWEEP_INTERVAL` are raised to it.
    pub fn spawn_sweeper(&self, interval: Duration) -> CacheSweeper {
        if interval < MIN_SWEEP_INTERVAL {
            warn!(
                "⚠️ Sweep interval {:?} too short, using {:?}",
                interval, MIN_SWEEP_INTERVAL
            );
        }
        let interval = interval.max(MIN_SWEEP_INTERVAL);
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let cache = self.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        cache.cleanup_expired();
                    }
                    changed = shutdown_rx.changed() => {
                        if changed.is_err() || *shutdown_rx.borrow() {
                            break;
                        }
                    }
                }
            }
            debug!("🧹 Cache sweeper stopped");
        });

        CacheSweeper {
            shutdown: shutdown_tx,
            handle,
        }
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        let hit_rate = if total > 0 {
            (hits as f64 / total as f64) * 100.0
        } else {
            0.0
        };

        CacheStats {
            entries: self.store.len(),
            hits,
            misses,
            hit_rate,
            ttl_secs: self.ttl.as_secs(),
        }
    }

    pub fn clear(&self) {
        self.store.clear();
        info!("🗑️ CACHE CLEARED");
    }
}

/// Handle to the background sweep task
pub struct CacheSweeper {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl CacheSweeper {
    /// Signal the sweep to stop and wait until it has
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        if let Err(e) = self.handle.await {
            warn!("⚠️ Cache sweeper ended abnormally: {}", e);
        }
    }
}

/// Cache statistics for monitoring
#[derive(Debug, Clone, serde::Serialize)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
    pub ttl_secs: u64,
}
