//! Signal Aggregator
//!
//! Fans out to every [`SignalProvider`] in parallel, merges their partial
//! bundles and caches the result. A failing (or timed out, or panicking)
//! provider only loses its own keys; aggregation fails only when providers
//! failed and nothing at all could be collected. An empty bundle from
//! providers that all succeeded is a valid, cacheable answer.

use futures_util::future::join_all;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::models::errors::{AppError, AppResult};
use crate::models::signals::SignalBundle;
use crate::models::types::CanonicalDomain;
use crate::providers::SignalProvider;
use crate::utils::cache::SignalCache;

/// Concurrent multi-source signal aggregator
pub struct SignalAggregator {
    providers: Vec<Arc<dyn SignalProvider>>,
    cache: SignalCache,
    provider_timeout: Duration,
}

impl SignalAggregator {
    pub fn new(
        providers: Vec<Arc<dyn SignalProvider>>,
        cache: SignalCache,
        provider_timeout: Duration,
    ) -> Self {
        Self {
            providers,
            cache,
            provider_timeout,
        }
    }

    pub fn cache(&self) -> &SignalCache {
        &self.cache
    }

    pub fn provider_count(&self) -> usize {
        self.providers.len()
    }

    /// Signals for `domain`, from cache when fresh, otherwise from all
    /// providers at once
    pub async fn aggregate(&self, domain: &CanonicalDomain) -> AppResult<Arc<SignalBundle>> {
        let key = domain.host();
        if let Some(bundle) = self.cache.get(&key) {
            return Ok(bundle);
        }

        let start = Instant::now();
        let domain = Arc::new(domain.clone());
        let merged = Arc::new(Mutex::new(SignalBundle::new()));
        let timeout = self.provider_timeout;

        let handles: Vec<_> = self
            .providers
            .iter()
            .map(|provider| {
                let provider = provider.clone();
                let domain = domain.clone();
                let merged = merged.clone();
                tokio::spawn(async move {
                    let name = provider.name();
                    let partial = match tokio::time::timeout(timeout, provider.fetch(&domain)).await {
                        Ok(Ok(partial)) => partial,
                        Ok(Err(e)) => return Err(e),
                        Err(_) => {
                            return Err(AppError::provider_timeout(name, timeout.as_millis() as u64))
                        }
                    };
                    debug!("📥 {} returned {} signals for {}", name, partial.len(), domain.host());
                    merged.lock().await.merge(partial);
                    Ok(())
                })
            })
            .collect();

        let names: Vec<&'static str> = self.providers.iter().map(|p| p.name()).collect();
        let mut failures = Vec::new();
        for (name, joined) in names.into_iter().zip(join_all(handles).await) {
            match joined {
                Ok(Ok(())) => {}
                Ok(Err(e)) => failures.push(e),
                Err(e) => failures.push(AppError::provider(name, format!("task failed: {}", e))),
            }
        }

        let bundle = std::mem::take(&mut *merged.lock().await);

        if bundle.is_empty() && !failures.is_empty() {
            let err = AppError::all_sources_failed(&failures);
            warn!("❌ {} ({})", err, key);
            return Err(err);
        }

        for failure in &failures {
            warn!("⚠️ Signal source failed for {}: {}", key, failure);
        }
        info!(
            "📡 Aggregated {} signals for {} from {}/{} providers in {}ms",
            bundle.len(),
            key,
            self.providers.len() - failures.len(),
            self.providers.len(),
            start.elapsed().as_millis()
        );

        Ok(self.cache.put(&key, bundle))
    }
}
