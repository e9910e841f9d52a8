//! Storage Module - Rule Tables & Valuation History
//!
//! The scoring engine reads rules through [`RuleStore`] and hands finished
//! valuations to a [`HistorySink`]. In-memory implementations back both.

pub mod history;
pub mod rules;

pub use history::*;
pub use rules::*;

use async_trait::async_trait;
use std::collections::HashMap;

use crate::models::errors::AppResult;
use crate::models::types::{AttributeRule, EstimationResult, RuleCategory};

/// Read-only provider of attribute rules
#[async_trait]
pub trait RuleStore: Send + Sync {
    /// Rules of one category, in table order
    async fn list_by_category(&self, category: RuleCategory) -> AppResult<Vec<AttributeRule>>;

    /// TLD rules keyed by lowercase TLD. Duplicate TLDs: the last rule wins.
    async fn list_tld_rules(&self) -> AppResult<HashMap<String, AttributeRule>>;
}

/// Write-only consumer of finished valuations
#[async_trait]
pub trait HistorySink: Send + Sync {
    async fn record(&self, result: &EstimationResult) -> AppResult<()>;
}
