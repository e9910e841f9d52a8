//! Providers Module - External Signal Sources
//!
//! Every signal family sits behind [`SignalProvider`]. The simulated
//! providers in `simulated.rs` generate plausible values deterministically
//! per domain; real integrations plug in through the same trait.

pub mod simulated;

pub use simulated::*;

use async_trait::async_trait;
use std::sync::Arc;

use crate::models::errors::AppResult;
use crate::models::signals::SignalBundle;
use crate::models::types::CanonicalDomain;

/// One independent source of signals.
///
/// Each provider owns a disjoint set of keys, so bundles from different
/// providers merge without conflicts.
#[async_trait]
pub trait SignalProvider: Send + Sync {
    /// Short identifier used in logs and error messages
    fn name(&self) -> &'static str;

    /// Fetch this provider's partial bundle for `domain`
    async fn fetch(&self, domain: &CanonicalDomain) -> AppResult<SignalBundle>;
}

/// The five simulated signal families
pub fn default_providers() -> Vec<Arc<dyn SignalProvider>> {
    vec![
        Arc::new(WhoisProvider),
        Arc::new(RankProvider),
        Arc::new(SearchVolumeProvider),
        Arc::new(RelatedDomainProvider),
        Arc::new(SocialProvider),
    ]
}
