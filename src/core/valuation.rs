//! Valuation Module
//!
//! Folds attributes into a price and a grade. Every attribute multiplies the
//! running price factor and adds to the running grade factor:
//!
//! - price = BASE_PRICE × Π price_factor
//! - grade = BASE_GRADE + Σ grade_factor
//!
//! Attributes are applied in a fixed order (TLD, length, structure, then
//! dynamic signals or the static fallback), so the breakdown and the
//! floating-point result are reproducible.

use chrono::Utc;

use crate::models::signals::{keys, SignalBundle, SignalValue, UNREGISTERED};
use crate::models::types::{
    AttributeDetail, AttributeRule, CanonicalDomain, EstimationResult, RuleKind,
};
use crate::utils::constants::*;

// ============================================
// Tier selection
// ============================================

pub fn rank_tier(rank: i64) -> Tier {
    if rank < RANK_EXCELLENT_BELOW {
        RANK_EXCELLENT
    } else if rank < RANK_GOOD_BELOW {
        RANK_GOOD
    } else if rank < RANK_FAIR_BELOW {
        RANK_FAIR
    } else {
        RANK_NEUTRAL
    }
}

pub fn search_volume_tier(volume: i64) -> Tier {
    if volume > SEARCH_HUGE_ABOVE {
        SEARCH_HUGE
    } else if volume > SEARCH_VERY_HIGH_ABOVE {
        SEARCH_VERY_HIGH
    } else if volume > SEARCH_HIGH_ABOVE {
        SEARCH_HIGH
    } else {
        SEARCH_NEUTRAL
    }
}

pub fn related_domain_tier(registered: bool) -> Tier {
    if registered {
        RELATED_REGISTERED
    } else {
        RELATED_UNREGISTERED
    }
}

/// `None` when there are no posts at all
pub fn community_tier(posts: i64) -> Option<Tier> {
    if posts <= 0 {
        None
    } else if posts > COMMUNITY_HUGE_ABOVE {
        Some(COMMUNITY_HUGE)
    } else {
        Some(COMMUNITY_PRESENT)
    }
}

/// `None` when there are no listings at all
pub fn marketplace_tier(listings: i64) -> Option<Tier> {
    if listings <= 0 {
        None
    } else if listings > MARKETPLACE_MANY_ABOVE {
        Some(MARKETPLACE_MANY)
    } else {
        Some(MARKETPLACE_PRESENT)
    }
}

/// Registration status of a related domain, see
/// [`keys::RELATED_DOMAIN_PREFIX`] for the accepted forms
fn related_status(value: &SignalValue) -> Option<(bool, String)> {
    match value {
        SignalValue::Text(status) => {
            let normalized = status.trim().to_lowercase();
            match normalized.as_str() {
                "unregistered" | "not registered" | "available" => {
                    Some((false, UNREGISTERED.to_string()))
                }
                s if s == "registered" || s.starts_with("registered ") => {
                    Some((true, status.trim().to_string()))
                }
                _ => None,
            }
        }
        SignalValue::Bool(registered) => Some((
            *registered,
            if *registered { "registered" } else { UNREGISTERED }.to_string(),
        )),
        SignalValue::Int(_) => None,
    }
}

// ============================================
// Builder
// ============================================

/// Accumulates attributes for one domain and produces the final result
pub struct ValuationBuilder<'a> {
    domain: &'a CanonicalDomain,
    price_factor: f64,
    grade_factor: f64,
    base: Vec<AttributeDetail>,
    other: Vec<AttributeDetail>,
    degraded: bool,
}

impl<'a> ValuationBuilder<'a> {
    pub fn new(domain: &'a CanonicalDomain) -> Self {
        Self {
            domain,
            price_factor: 1.0,
            grade_factor: 0.0,
            base: Vec::new(),
            other: Vec::new(),
            degraded: false,
        }
    }

    fn apply(&mut self, detail: AttributeDetail) -> &mut Self {
        self.price_factor *= detail.price_factor;
        self.grade_factor += detail.grade_factor;
        self
    }

    fn push_base(&mut self, detail: AttributeDetail) {
        self.apply(detail.clone());
        self.base.push(detail);
    }

    fn push_other(&mut self, detail: AttributeDetail) {
        self.apply(detail.clone());
        self.other.push(detail);
    }

    fn push_tier(&mut self, tier: Tier, value: String, description: String) {
        self.push_other(AttributeDetail::new(
            tier.label,
            value,
            description,
            tier.price_factor,
            tier.grade_factor,
        ));
    }

    /// TLD rule, applied at most once
    pub fn with_tld_rule(mut self, rule: Option<&AttributeRule>) -> Self {
        if let Some(rule) = rule {
            let domain = self.domain;
            let tld = &domain.tld;
            self.push_base(AttributeDetail::new(
                &rule.name,
                tld.as_str(),
                format!("{} suffix", tld),
                rule.price_factor,
                rule.grade_factor,
            ));
        }
        self
    }

    /// First length rule matching the name length
    pub fn with_length_rule(mut self, base_rules: &[AttributeRule]) -> Self {
        let length = self.domain.length.to_string();
        if let Some(rule) = base_rules
            .iter()
            .find(|r| r.denotes(RuleKind::Length) && r.match_value.trim() == length)
        {
            self.push_base(AttributeDetail::new(
                &rule.name,
                length.as_str(),
                format!("{}-char length", length),
                rule.price_factor,
                rule.grade_factor,
            ));
        }
        self
    }

    /// First structure rule matching the parsed structure
    pub fn with_structure_rule(mut self, base_rules: &[AttributeRule]) -> Self {
        let structure = self.domain.structure.as_str();
        if let Some(rule) = base_rules.iter().find(|r| {
            r.denotes(RuleKind::Structure) && r.match_value.trim().eq_ignore_ascii_case(structure)
        }) {
            self.push_base(AttributeDetail::new(
                &rule.name,
                structure,
                format!("{} structure", structure),
                rule.price_factor,
                rule.grade_factor,
            ));
        }
        self
    }

    /// One tier per recognized signal key. Unknown keys and values of the
    /// wrong type are ignored.
    pub fn with_signals(mut self, signals: &SignalBundle) -> Self {
        if let Some(rank) = signals.get_int(keys::TRAFFIC_RANK) {
            self.push_tier(rank_tier(rank), rank.to_string(), format!("Traffic rank {}", rank));
        }

        if let Some(volume) = signals.get_int(keys::SEARCH_VOLUME) {
            self.push_tier(
                search_volume_tier(volume),
                volume.to_string(),
                format!("Search volume {}", volume),
            );
        }

        let keyword = self.domain.keyword().to_string();
        for (key, value) in signals.with_prefix(keys::RELATED_DOMAIN_PREFIX) {
            let tld = &key[keys::RELATED_DOMAIN_PREFIX.len()..];
            let Some((registered, shown)) = related_status(value) else {
                continue;
            };
            let tier = related_domain_tier(registered);
            self.push_other(AttributeDetail::new(
                format!("{} {}", tld, tier.label),
                shown.as_str(),
                format!("{}.{} {}", keyword, tld, shown),
                tier.price_factor,
                tier.grade_factor,
            ));
        }

        if let Some(posts) = signals.get_int(keys::COMMUNITY_POSTS) {
            if let Some(tier) = community_tier(posts) {
                self.push_tier(tier, posts.to_string(), format!("Community posts {}", posts));
            }
        }

        if let Some(listings) = signals.get_int(keys::MARKETPLACE_LISTINGS) {
            if let Some(tier) = marketplace_tier(listings) {
                self.push_tier(
                    tier,
                    listings.to_string(),
                    format!("Marketplace listings {}", listings),
                );
            }
        }

        self
    }

    /// Degraded mode: every other-category rule whose match value occurs in
    /// the raw input (case-insensitive)
    pub fn with_static_fallback(mut self, other_rules: &[AttributeRule]) -> Self {
        self.degraded = true;
        let raw = self.domain.raw_input.to_lowercase();
        for rule in other_rules {
            let needle = rule.match_value.to_lowercase();
            if needle.is_empty() || !raw.contains(&needle) {
                continue;
            }
            self.push_other(AttributeDetail::new(
                &rule.name,
                &rule.match_value,
                &rule.name,
                rule.price_factor,
                rule.grade_factor,
            ));
        }
        self
    }

    /// True once any dynamic or fallback attribute has been applied
    pub fn has_other_attributes(&self) -> bool {
        !self.other.is_empty()
    }

    pub fn price_factor(&self) -> f64 {
        self.price_factor
    }

    pub fn grade_factor(&self) -> f64 {
        self.grade_factor
    }

    pub fn build(self) -> EstimationResult {
        EstimationResult {
            domain: self.domain.raw_input.clone(),
            grade: BASE_GRADE + self.grade_factor,
            price: BASE_PRICE * self.price_factor,
            base_attributes: self.base,
            other_attributes: self.other,
            estimation_date: Utc::now(),
            degraded: self.degraded,
        }
    }
}
