//! Dynamically fetched signal values
//!
//! Providers return loosely typed values. Each known key documents the type
//! it is expected to carry; reading a key with the wrong accessor yields
//! `None`, the same as a missing key.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Known signal keys and their expected value types
pub mod keys {
    /// Text, `YYYY-MM-DD`
    pub const REGISTER_DATE: &str = "register_date";
    /// Text, `YYYY-MM-DD`
    pub const EXPIRE_DATE: &str = "expire_date";
    /// Text
    pub const REGISTRAR: &str = "registrar";
    /// Int, lower is better
    pub const TRAFFIC_RANK: &str = "traffic_rank";
    /// Int
    pub const SEARCH_VOLUME: &str = "search_volume";
    /// Prefix; one Text (or Bool) entry per related TLD.
    ///
    /// Text values are read case-insensitively: `"registered"` optionally
    /// followed by a date means registered; `"unregistered"`,
    /// `"not registered"` and `"available"` mean free. Any other text is
    /// ignored, as are Int values.
    pub const RELATED_DOMAIN_PREFIX: &str = "related_domain_";
    /// Int
    pub const COMMUNITY_POSTS: &str = "community_posts";
    /// Int
    pub const MARKETPLACE_LISTINGS: &str = "marketplace_listings";
    /// Int
    pub const ENCYCLOPEDIA_INDEX: &str = "encyclopedia_index";
    /// Bool
    pub const DICTIONARY_RECORD: &str = "dictionary_record";
    /// Int
    pub const SEARCH_INDEX: &str = "search_index";
    /// Int
    pub const MEDIA_INDEX: &str = "media_index";
    /// Int
    pub const SOCIAL_INDEX: &str = "social_index";

    /// Key for the registration status of `keyword.tld`
    pub fn related_domain(tld: &str) -> String {
        format!("{}{}", RELATED_DOMAIN_PREFIX, tld)
    }
}

/// Status text used for related domains nobody has registered
pub const UNREGISTERED: &str = "unregistered";

/// One signal value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SignalValue {
    Int(i64),
    Text(String),
    Bool(bool),
}

impl From<i64> for SignalValue {
    fn from(v: i64) -> Self {
        SignalValue::Int(v)
    }
}

impl From<String> for SignalValue {
    fn from(v: String) -> Self {
        SignalValue::Text(v)
    }
}

impl From<&str> for SignalValue {
    fn from(v: &str) -> Self {
        SignalValue::Text(v.to_string())
    }
}

impl From<bool> for SignalValue {
    fn from(v: bool) -> Self {
        SignalValue::Bool(v)
    }
}

impl std::fmt::Display for SignalValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignalValue::Int(v) => write!(f, "{}", v),
            SignalValue::Text(v) => f.write_str(v),
            SignalValue::Bool(v) => write!(f, "{}", v),
        }
    }
}

/// Everything fetched for one domain in one aggregation pass.
///
/// Ordered by key so that iteration, and therefore the floating-point
/// accumulation done over it, is reproducible.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignalBundle {
    values: BTreeMap<String, SignalValue>,
}

impl SignalBundle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<SignalValue>) {
        self.values.insert(key.into(), value.into());
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<SignalValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Move every entry of `other` into `self`
    pub fn merge(&mut self, other: SignalBundle) {
        self.values.extend(other.values);
    }

    pub fn get(&self, key: &str) -> Option<&SignalValue> {
        self.values.get(key)
    }

    pub fn get_int(&self, key: &str) -> Option<i64> {
        match self.values.get(key) {
            Some(SignalValue::Int(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn get_text(&self, key: &str) -> Option<&str> {
        match self.values.get(key) {
            Some(SignalValue::Text(v)) => Some(v.as_str()),
            _ => None,
        }
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.values.get(key) {
            Some(SignalValue::Bool(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Entries whose key starts with `prefix`, in key order
    pub fn with_prefix<'a>(
        &'a self,
        prefix: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a SignalValue)> + 'a {
        self.values
            .range(prefix.to_string()..)
            .take_while(move |(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrong_type_reads_as_absent() {
        let bundle = SignalBundle::new()
            .with(keys::TRAFFIC_RANK, "not a number")
            .with(keys::DICTIONARY_RECORD, true);

        assert_eq!(bundle.get_int(keys::TRAFFIC_RANK), None);
        assert_eq!(bundle.get_text(keys::TRAFFIC_RANK), Some("not a number"));
        assert_eq!(bundle.get_bool(keys::DICTIONARY_RECORD), Some(true));
        assert_eq!(bundle.get_int(keys::SEARCH_VOLUME), None);
    }

    #[test]
    fn test_prefix_scan_is_ordered_and_bounded() {
        let bundle = SignalBundle::new()
            .with(keys::related_domain("org"), UNREGISTERED)
            .with(keys::related_domain("ai"), "registered 2021.03.04")
            .with("register_date", "2020-01-01")
            .with("search_volume", 10i64);

        let tlds: Vec<&str> = bundle
            .with_prefix(keys::RELATED_DOMAIN_PREFIX)
            .map(|(k, _)| k)
            .collect();
        assert_eq!(tlds, vec!["related_domain_ai", "related_domain_org"]);
    }

    #[test]
    fn test_untagged_json_shape() {
        let bundle = SignalBundle::new()
            .with("a", 1i64)
            .with("b", "x")
            .with("c", false);
        let json = serde_json::to_string(&bundle).unwrap();
        assert_eq!(json, r#"{"a":1,"b":"x","c":false}"#);

        let back: SignalBundle = serde_json::from_str(&json).unwrap();
        assert_eq!(back, bundle);
    }
}
