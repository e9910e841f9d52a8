//! Type definitions for the appraisal engine
//! Core data structures shared by the parser, scoring engine and storage

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lexical structure of a domain name (TLD excluded)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DomainStructure {
    /// Only ASCII digits
    AllDigits,
    /// Only ASCII letters
    AllLetters,
    /// ASCII letters and digits mixed
    Alphanumeric,
    /// Contains at least one hyphen
    Hyphenated,
    /// Anything else (IDN labels, dots, underscores, ...)
    Other,
}

impl DomainStructure {
    /// Label used by rule tables to match this structure
    pub fn as_str(&self) -> &'static str {
        match self {
            DomainStructure::AllDigits => "all-digits",
            DomainStructure::AllLetters => "all-letters",
            DomainStructure::Alphanumeric => "alphanumeric",
            DomainStructure::Hyphenated => "hyphenated",
            DomainStructure::Other => "other",
        }
    }
}

impl std::fmt::Display for DomainStructure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized identity of one valuation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalDomain {
    /// Input exactly as received
    pub raw_input: String,
    /// Name without TLD, may contain inner dots for multi-level names
    pub name: String,
    /// Final label
    pub tld: String,
    /// Character count of `name`
    pub length: usize,
    pub structure: DomainStructure,
}

impl CanonicalDomain {
    /// Bare host, `name.tld`
    pub fn host(&self) -> String {
        format!("{}.{}", self.name, self.tld)
    }

    /// First label of the name, used as the keyword for related lookups
    pub fn keyword(&self) -> &str {
        self.name.split('.').next().unwrap_or(&self.name)
    }
}

/// Rule table category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleCategory {
    /// TLD, length and structure rules
    Base,
    /// Heuristic rules used in degraded mode
    Other,
}

/// Which base attribute a rule describes, derived from its name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    Suffix,
    Length,
    Structure,
}

impl RuleKind {
    fn marker(&self) -> &'static str {
        match self {
            RuleKind::Suffix => "suffix",
            RuleKind::Length => "length",
            RuleKind::Structure => "structure",
        }
    }
}

/// A static attribute rule supplied by the rule store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeRule {
    pub name: String,
    pub category: RuleCategory,
    /// Multiplicative, always > 0
    pub price_factor: f64,
    /// Additive, any sign
    pub grade_factor: f64,
    pub match_value: String,
}

impl AttributeRule {
    /// Whether the rule name marks it as a rule of `kind`
    pub fn denotes(&self, kind: RuleKind) -> bool {
        self.name.to_lowercase().contains(kind.marker())
    }
}

/// One line item of a valuation breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeDetail {
    pub name: String,
    pub value: String,
    pub description: String,
    pub price_factor: f64,
    pub grade_factor: f64,
}

impl AttributeDetail {
    pub fn new(
        name: impl Into<String>,
        value: impl Into<String>,
        description: impl Into<String>,
        price_factor: f64,
        grade_factor: f64,
    ) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            description: description.into(),
            price_factor,
            grade_factor,
        }
    }
}

/// Final output of one valuation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimationResult {
    /// Input as the caller supplied it
    pub domain: String,
    pub grade: f64,
    pub price: f64,
    pub base_attributes: Vec<AttributeDetail>,
    pub other_attributes: Vec<AttributeDetail>,
    pub estimation_date: DateTime<Utc>,
    /// True when dynamic signals were unavailable and static heuristics were used
    pub degraded: bool,
}

impl EstimationResult {
    /// One-line summary for logs and the CLI
    pub fn summary(&self) -> String {
        format!(
            "{} | Price: {:.2} | Grade: {:.2} | Attributes: {}{}",
            self.domain,
            self.price,
            self.grade,
            self.base_attributes.len() + self.other_attributes.len(),
            if self.degraded { " | DEGRADED" } else { "" }
        )
    }
}

/// Persisted summary of a past valuation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub id: Uuid,
    pub domain: String,
    pub grade: f64,
    pub price: f64,
    pub estimation_date: DateTime<Utc>,
}

impl From<&EstimationResult> for HistoryRecord {
    fn from(result: &EstimationResult) -> Self {
        Self {
            id: Uuid::new_v4(),
            domain: result.domain.clone(),
            grade: result.grade,
            price: result.price,
            estimation_date: result.estimation_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(name: &str) -> AttributeRule {
        AttributeRule {
            name: name.to_string(),
            category: RuleCategory::Base,
            price_factor: 1.0,
            grade_factor: 0.0,
            match_value: String::new(),
        }
    }

    #[test]
    fn test_rule_kind_from_name() {
        assert!(rule("3-char length").denotes(RuleKind::Length));
        assert!(rule("All-Letters Structure").denotes(RuleKind::Structure));
        assert!(rule("com suffix").denotes(RuleKind::Suffix));
        assert!(!rule("com suffix").denotes(RuleKind::Length));
    }

    #[test]
    fn test_structure_labels_serialize_like_rule_values() {
        let json = serde_json::to_string(&DomainStructure::AllDigits).unwrap();
        assert_eq!(json, "\"all-digits\"");
        assert_eq!(DomainStructure::Hyphenated.to_string(), "hyphenated");
    }

    #[test]
    fn test_keyword_is_first_label() {
        let domain = CanonicalDomain {
            raw_input: "shop.example.com".to_string(),
            name: "shop.example".to_string(),
            tld: "com".to_string(),
            length: 12,
            structure: DomainStructure::Other,
        };
        assert_eq!(domain.keyword(), "shop");
        assert_eq!(domain.host(), "shop.example.com");
    }
}
