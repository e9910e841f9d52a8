//! Domain Estimator
//!
//! Single entry point for a valuation: parse, load rules, aggregate signals,
//! score, record. Signal failures degrade the result instead of failing it;
//! parse and rule-store failures are returned to the caller.

use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use super::aggregator::SignalAggregator;
use super::parser;
use super::valuation::ValuationBuilder;
use crate::models::config::AppraiserConfig;
use crate::models::errors::AppResult;
use crate::models::types::{EstimationResult, RuleCategory};
use crate::providers::default_providers;
use crate::storage::{HistorySink, InMemoryRuleStore, RuleStore};
use crate::utils::cache::SignalCache;

pub struct DomainEstimator {
    rules: Arc<dyn RuleStore>,
    aggregator: SignalAggregator,
    history: Option<Arc<dyn HistorySink>>,
}

impl DomainEstimator {
    pub fn new(rules: Arc<dyn RuleStore>, aggregator: SignalAggregator) -> Self {
        Self {
            rules,
            aggregator,
            history: None,
        }
    }

    pub fn with_history(mut self, history: Arc<dyn HistorySink>) -> Self {
        self.history = Some(history);
        self
    }

    /// Estimator over the configured rule table and the default providers
    pub fn from_config(config: &AppraiserConfig) -> AppResult<Self> {
        config.validate()?;
        let rules = InMemoryRuleStore::load(config.rules_path.as_deref())?;
        let aggregator = SignalAggregator::new(
            default_providers(),
            SignalCache::new(config.cache_ttl),
            config.provider_timeout,
        );
        info!(
            "🔧 Estimator ready: {} rules, {} providers, cache TTL {}s",
            rules.len(),
            aggregator.provider_count(),
            config.cache_ttl.as_secs()
        );
        Ok(Self::new(Arc::new(rules), aggregator))
    }

    pub fn cache(&self) -> &SignalCache {
        self.aggregator.cache()
    }

    /// Value one domain
    pub async fn estimate(&self, raw_input: &str) -> AppResult<EstimationResult> {
        let start = Instant::now();
        let domain = parser::parse(raw_input)?;

        let (tld_rules, base_rules, other_rules) = tokio::try_join!(
            self.rules.list_tld_rules(),
            self.rules.list_by_category(RuleCategory::Base),
            self.rules.list_by_category(RuleCategory::Other),
        )?;

        let mut builder = ValuationBuilder::new(&domain)
            .with_tld_rule(tld_rules.get(&domain.tld))
            .with_length_rule(&base_rules)
            .with_structure_rule(&base_rules);

        match self.aggregator.aggregate(&domain).await {
            Ok(signals) => builder = builder.with_signals(&signals),
            Err(e) => warn!("⚠️ Degraded valuation for {}: {}", domain.host(), e),
        }

        if !builder.has_other_attributes() {
            builder = builder.with_static_fallback(&other_rules);
        }

        let result = builder.build();
        info!(
            "💰 {} -> ${:.2} (grade {:.2}{}) in {}ms",
            domain.host(),
            result.price,
            result.grade,
            if result.degraded { ", degraded" } else { "" },
            start.elapsed().as_millis()
        );

        if let Some(history) = &self.history {
            if let Err(e) = history.record(&result).await {
                warn!("⚠️ Failed to record history for {}: {}", domain.host(), e);
            }
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::errors::{AppError, ErrorCode};
    use crate::models::signals::{keys, SignalBundle};
    use crate::models::types::{AttributeRule, CanonicalDomain};
    use crate::providers::SignalProvider;
    use crate::storage::InMemoryHistory;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::time::Duration;

    struct FixedSignals(SignalBundle);

    #[async_trait]
    impl SignalProvider for FixedSignals {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn fetch(&self, _domain: &CanonicalDomain) -> AppResult<SignalBundle> {
            Ok(self.0.clone())
        }
    }

    struct Offline;

    #[async_trait]
    impl SignalProvider for Offline {
        fn name(&self) -> &'static str {
            "offline"
        }

        async fn fetch(&self, _domain: &CanonicalDomain) -> AppResult<SignalBundle> {
            Err(AppError::provider("offline", "connection refused"))
        }
    }

    struct BrokenRules;

    #[async_trait]
    impl RuleStore for BrokenRules {
        async fn list_by_category(&self, _category: RuleCategory) -> AppResult<Vec<AttributeRule>> {
            Err(AppError::rule_store("table unavailable"))
        }

        async fn list_tld_rules(&self) -> AppResult<HashMap<String, AttributeRule>> {
            Err(AppError::rule_store("table unavailable"))
        }
    }

    struct BrokenSink;

    #[async_trait]
    impl HistorySink for BrokenSink {
        async fn record(&self, _result: &EstimationResult) -> AppResult<()> {
            Err(AppError::history_write("disk full"))
        }
    }

    fn estimator_with(provider: Arc<dyn SignalProvider>) -> DomainEstimator {
        let aggregator = SignalAggregator::new(
            vec![provider],
            SignalCache::new(Duration::from_secs(300)),
            Duration::from_secs(1),
        );
        DomainEstimator::new(Arc::new(InMemoryRuleStore::builtin().unwrap()), aggregator)
    }

    fn default_estimator() -> DomainEstimator {
        let mut config = AppraiserConfig::default()
            .with_cache_ttl(Duration::from_secs(300))
            .with_provider_timeout(Duration::from_secs(1));
        config.rules_path = None;
        DomainEstimator::from_config(&config).unwrap()
    }

    #[tokio::test]
    async fn test_same_input_same_valuation() {
        let estimator = default_estimator();

        let first = estimator.estimate("ShopCloud.com").await.unwrap();
        estimator.cache().clear();
        let second = estimator.estimate("ShopCloud.com").await.unwrap();

        assert_eq!(first.price, second.price);
        assert_eq!(first.grade, second.grade);
        assert_eq!(first.base_attributes, second.base_attributes);
        assert_eq!(first.other_attributes, second.other_attributes);
        assert!(!first.degraded);
    }

    #[tokio::test]
    async fn test_signals_drive_other_attributes() {
        let signals = SignalBundle::new()
            .with(keys::TRAFFIC_RANK, 5_000i64)
            .with(keys::SEARCH_VOLUME, 20_000i64);
        let estimator = estimator_with(Arc::new(FixedSignals(signals)));

        let result = estimator.estimate("https://www.Example.com/about").await.unwrap();

        assert_eq!(result.domain, "https://www.Example.com/about");
        assert_eq!(result.other_attributes.len(), 2);
        // com suffix, all-letters structure, rank < 10k, volume > 10k
        let expected = 25.0 * 9.55 * 1.4 * 2.5 * 3.0;
        assert!((result.price - expected).abs() < 1e-9, "price {}", result.price);
    }

    #[tokio::test]
    async fn test_unreachable_providers_degrade_to_static_rules() {
        let history = Arc::new(InMemoryHistory::new(10));
        let estimator = estimator_with(Arc::new(Offline)).with_history(history.clone());

        let result = estimator.estimate("gameshop.io").await.unwrap();

        assert!(result.degraded);
        let names: Vec<&str> = result.other_attributes.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Contains 'shop'", "Contains 'game'"]);
        assert_eq!(history.len(), 1);
    }

    #[tokio::test]
    async fn test_signals_without_dynamic_keys_fall_back() {
        let signals = SignalBundle::new().with(keys::REGISTRAR, "Example Registrar");
        let estimator = estimator_with(Arc::new(FixedSignals(signals)));

        let result = estimator.estimate("newsapp.net").await.unwrap();

        assert!(result.degraded);
        assert_eq!(result.other_attributes.len(), 2);
    }

    #[tokio::test]
    async fn test_history_failure_does_not_fail_estimate() {
        let estimator = estimator_with(Arc::new(Offline)).with_history(Arc::new(BrokenSink));
        assert!(estimator.estimate("example.com").await.is_ok());
    }

    #[tokio::test]
    async fn test_invalid_input_is_rejected_and_not_recorded() {
        let history = Arc::new(InMemoryHistory::new(10));
        let estimator = estimator_with(Arc::new(Offline)).with_history(history.clone());

        let err = estimator.estimate("localhost").await.unwrap_err();

        assert_eq!(err.code, ErrorCode::DomainInvalidFormat);
        assert!(history.is_empty());
    }

    #[test]
    fn test_from_config_rejects_zero_sweep_interval() {
        let mut config = AppraiserConfig::default().with_sweep_interval(Duration::ZERO);
        config.rules_path = None;

        let err = DomainEstimator::from_config(&config).err().unwrap();
        assert_eq!(err.code, ErrorCode::ConfigInvalidValue);
    }

    #[tokio::test]
    async fn test_rule_store_failure_propagates() {
        let offline: Arc<dyn SignalProvider> = Arc::new(Offline);
        let aggregator = SignalAggregator::new(
            vec![offline],
            SignalCache::new(Duration::from_secs(300)),
            Duration::from_secs(1),
        );
        let estimator = DomainEstimator::new(Arc::new(BrokenRules), aggregator);

        let err = estimator.estimate("example.com").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::RuleStoreError);
    }
}
