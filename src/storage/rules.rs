//! In-memory rule table loaded from JSON

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

use super::RuleStore;
use crate::models::errors::{AppError, AppResult};
use crate::models::types::{AttributeRule, RuleCategory, RuleKind};

/// Rule table shipped with the crate
const DEFAULT_RULES_JSON: &str = include_str!("../../data/default_rules.json");

/// Immutable rule table held in memory
#[derive(Debug, Clone)]
pub struct InMemoryRuleStore {
    rules: Vec<AttributeRule>,
}

impl InMemoryRuleStore {
    /// Build from rules; rejects non-positive or non-finite price factors
    pub fn new(rules: Vec<AttributeRule>) -> AppResult<Self> {
        if let Some(bad) = rules
            .iter()
            .find(|r| !(r.price_factor.is_finite() && r.price_factor > 0.0) || !r.grade_factor.is_finite())
        {
            return Err(AppError::rule_store(format!(
                "Rule '{}' has invalid factors (price {}, grade {})",
                bad.name, bad.price_factor, bad.grade_factor
            )));
        }
        Ok(Self { rules })
    }

    pub fn from_json(json: &str) -> AppResult<Self> {
        let rules: Vec<AttributeRule> = serde_json::from_str(json)?;
        Self::new(rules)
    }

    pub fn from_path(path: &Path) -> AppResult<Self> {
        let json = std::fs::read_to_string(path)?;
        let store = Self::from_json(&json)?;
        info!("📚 Loaded {} rules from {}", store.rules.len(), path.display());
        Ok(store)
    }

    /// The embedded rule table
    pub fn builtin() -> AppResult<Self> {
        Self::from_json(DEFAULT_RULES_JSON)
    }

    /// Load `path` when given, otherwise the embedded table
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        match path {
            Some(path) => Self::from_path(path),
            None => Self::builtin(),
        }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[async_trait]
impl RuleStore for InMemoryRuleStore {
    async fn list_by_category(&self, category: RuleCategory) -> AppResult<Vec<AttributeRule>> {
        Ok(self
            .rules
            .iter()
            .filter(|r| r.category == category)
            .cloned()
            .collect())
    }

    async fn list_tld_rules(&self) -> AppResult<HashMap<String, AttributeRule>> {
        Ok(self
            .rules
            .iter()
            .filter(|r| r.denotes(RuleKind::Suffix))
            .map(|r| (r.match_value.to_lowercase(), r.clone()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(name: &str, category: RuleCategory, price: f64, value: &str) -> AttributeRule {
        AttributeRule {
            name: name.to_string(),
            category,
            price_factor: price,
            grade_factor: 0.0,
            match_value: value.to_string(),
        }
    }

    #[test]
    fn test_builtin_table_parses() {
        let store = InMemoryRuleStore::builtin().unwrap();
        assert!(!store.is_empty());
    }

    #[tokio::test]
    async fn test_builtin_has_com_rule() {
        let store = InMemoryRuleStore::builtin().unwrap();
        let tlds = store.list_tld_rules().await.unwrap();
        let com = tlds.get("com").expect("com rule");
        assert_eq!(com.price_factor, 9.55);
        assert_eq!(com.grade_factor, 0.5);
    }

    #[tokio::test]
    async fn test_category_filter_preserves_order() {
        let store = InMemoryRuleStore::new(vec![
            rule("b", RuleCategory::Other, 1.0, "b"),
            rule("x length", RuleCategory::Base, 1.0, "3"),
            rule("a", RuleCategory::Other, 1.0, "a"),
        ])
        .unwrap();

        let other = store.list_by_category(RuleCategory::Other).await.unwrap();
        let names: Vec<&str> = other.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[tokio::test]
    async fn test_duplicate_tld_last_wins() {
        let store = InMemoryRuleStore::new(vec![
            rule("com suffix", RuleCategory::Base, 2.0, "com"),
            rule("COM Suffix (revised)", RuleCategory::Base, 3.0, "COM"),
        ])
        .unwrap();

        let tlds = store.list_tld_rules().await.unwrap();
        assert_eq!(tlds.len(), 1);
        assert_eq!(tlds["com"].price_factor, 3.0);
    }

    #[test]
    fn test_rejects_non_positive_price_factor() {
        let err = InMemoryRuleStore::new(vec![rule("zero", RuleCategory::Base, 0.0, "x")]).unwrap_err();
        assert_eq!(err.code, crate::models::errors::ErrorCode::RuleStoreError);
    }

    #[test]
    fn test_bad_json_is_rule_store_error() {
        let err = InMemoryRuleStore::from_json("{not json").unwrap_err();
        assert_eq!(err.code, crate::models::errors::ErrorCode::RuleStoreError);
    }
}
