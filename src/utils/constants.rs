//! Constants Module - Single Source of Truth
//!
//! Every tunable number used by the scoring engine and its runtime lives
//! here. Other modules must not hardcode these values.

use std::time::Duration;

// ============================================
// APPLICATION CONSTANTS
// ============================================

/// Application name
pub const APP_NAME: &str = "DomainAppraiser";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================
// VALUATION BASELINE
// ============================================

/// Price every valuation starts from, before any factor is applied
pub const BASE_PRICE: f64 = 25.0;

/// Grade every valuation starts from, before any factor is added
pub const BASE_GRADE: f64 = -0.5;

// ============================================
// SIGNAL TIERS
// ============================================

/// A (price factor, grade factor) pair selected by a signal's range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tier {
    pub label: &'static str,
    pub price_factor: f64,
    pub grade_factor: f64,
}

impl Tier {
    pub const fn new(label: &'static str, price_factor: f64, grade_factor: f64) -> Self {
        Self {
            label,
            price_factor,
            grade_factor,
        }
    }
}

/// Traffic rank upper bounds (exclusive), best first
pub const RANK_EXCELLENT_BELOW: i64 = 10_000;
pub const RANK_GOOD_BELOW: i64 = 100_000;
pub const RANK_FAIR_BELOW: i64 = 1_000_000;

pub const RANK_EXCELLENT: Tier = Tier::new("Excellent traffic rank", 2.5, 0.8);
pub const RANK_GOOD: Tier = Tier::new("Good traffic rank", 1.8, 0.5);
pub const RANK_FAIR: Tier = Tier::new("Fair traffic rank", 1.2, 0.2);
pub const RANK_NEUTRAL: Tier = Tier::new("Traffic rank", 1.0, 0.0);

/// Search volume lower bounds (exclusive), best first
pub const SEARCH_HUGE_ABOVE: i64 = 10_000;
pub const SEARCH_VERY_HIGH_ABOVE: i64 = 5_000;
pub const SEARCH_HIGH_ABOVE: i64 = 1_000;

pub const SEARCH_HUGE: Tier = Tier::new("Huge search volume", 3.0, 0.9);
pub const SEARCH_VERY_HIGH: Tier = Tier::new("Very high search volume", 2.2, 0.7);
pub const SEARCH_HIGH: Tier = Tier::new("High search volume", 1.8, 0.6);
pub const SEARCH_NEUTRAL: Tier = Tier::new("Search volume", 1.0, 0.0);

/// Related TLD statuses
pub const RELATED_REGISTERED: Tier = Tier::new("related domain registered", 0.86, -0.1);
pub const RELATED_UNREGISTERED: Tier = Tier::new("related domain unregistered", 0.65, -0.2);

/// Community post count lower bound (exclusive) for the top tier
pub const COMMUNITY_HUGE_ABOVE: i64 = 10_000;
pub const COMMUNITY_HUGE: Tier = Tier::new("Huge community presence", 2.25, 0.6);
pub const COMMUNITY_PRESENT: Tier = Tier::new("Community presence", 1.5, 0.3);

/// Marketplace listing count lower bound (exclusive) for the top tier
pub const MARKETPLACE_MANY_ABOVE: i64 = 1_000;
pub const MARKETPLACE_MANY: Tier = Tier::new("Many marketplace listings", 1.5, 0.3);
pub const MARKETPLACE_PRESENT: Tier = Tier::new("Marketplace listings", 1.18, 0.1);

// ============================================
// SIGNAL PROVIDERS
// ============================================

/// TLDs checked for related-domain registration status
pub const RELATED_TLDS: [&str; 7] = ["com", "net", "org", "co", "cc", "io", "ai"];

/// Related TLDs considered "common" by the simulated registration check
pub const COMMON_TLDS: [&str; 3] = ["com", "net", "org"];

/// Words that make a name more popular in the simulated providers
pub const COMMON_WORDS: [&str; 8] = ["news", "shop", "blog", "tech", "game", "app", "web", "cloud"];

/// Registrars reported by the simulated WHOIS provider
pub const REGISTRARS: [&str; 5] = ["GoDaddy", "Namecheap", "Alibaba Cloud", "Tencent Cloud", "NameSilo"];

// ============================================
// RUNTIME DEFAULTS
// ============================================

/// Default signal cache TTL (seconds): 24 hours
pub const DEFAULT_CACHE_TTL_SECS: u64 = 86_400;

/// Default interval between cache sweeps (seconds)
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60;

/// Shortest sweep interval the cache will run with
pub const MIN_SWEEP_INTERVAL: Duration = Duration::from_secs(1);

/// Default per-provider deadline (milliseconds)
pub const DEFAULT_PROVIDER_TIMEOUT_MS: u64 = 5_000;

/// Default number of history records retained in memory
pub const DEFAULT_HISTORY_CAPACITY: usize = 1_000;

/// Default page size for history queries
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Default API port
pub const DEFAULT_API_PORT: u16 = 8080;
