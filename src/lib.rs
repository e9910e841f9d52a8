//! Domain Appraiser Library
//!
//! Estimates the market value of a domain name:
//! - Parses raw input into a canonical domain
//! - Collects traffic, search, registration and social signals concurrently
//! - Caches signal bundles per domain with a TTL
//! - Folds rule-table attributes and signal tiers into a price and a grade
//!
//! Signal outages degrade a valuation to static heuristics instead of
//! failing it.

pub mod api;
pub mod core;
pub mod models;
pub mod providers;
pub mod storage;
pub mod utils;

pub use crate::core::{parse, DomainEstimator, SignalAggregator, ValuationBuilder};
pub use models::{
    AppError, AppResult, AppraiserConfig, AttributeDetail, AttributeRule, CanonicalDomain,
    DomainStructure, ErrorCode, EstimationResult, HistoryRecord, RuleCategory, SignalBundle,
    SignalValue,
};
pub use providers::{default_providers, SignalProvider};
pub use storage::{HistorySink, InMemoryHistory, InMemoryRuleStore, RuleStore};
pub use utils::cache::{CacheStats, CacheSweeper, SignalCache};
