//! Domain Parser
//!
//! Turns user input such as `https://www.example.com/path` into a
//! [`CanonicalDomain`].

use crate::models::errors::{AppError, AppResult};
use crate::models::types::{CanonicalDomain, DomainStructure};

const SCHEMES: [&str; 2] = ["http://", "https://"];
const WWW: &str = "www.";

/// Parse raw input into a canonical domain.
///
/// Strips a scheme, a leading `www.` and any path, lowercases the host and
/// splits off the final label as the TLD. Fails with `DOMAIN_INVALID_FORMAT`
/// when fewer than two labels remain or either side of the split is empty.
pub fn parse(raw_input: &str) -> AppResult<CanonicalDomain> {
    let host = strip_host(raw_input).to_lowercase();

    let Some((name, tld)) = host.rsplit_once('.') else {
        return Err(AppError::invalid_format(raw_input));
    };
    if name.is_empty() || tld.is_empty() {
        return Err(AppError::invalid_format(raw_input));
    }

    Ok(CanonicalDomain {
        raw_input: raw_input.to_string(),
        name: name.to_string(),
        tld: tld.to_string(),
        length: name.chars().count(),
        structure: classify(name),
    })
}

/// Scheme, `www.` and path removed; case preserved
fn strip_host(raw_input: &str) -> &str {
    let mut rest = raw_input.trim();

    for scheme in SCHEMES {
        if let Some(stripped) = strip_prefix_ignore_case(rest, scheme) {
            rest = stripped;
            break;
        }
    }
    if let Some(stripped) = strip_prefix_ignore_case(rest, WWW) {
        rest = stripped;
    }
    match rest.find('/') {
        Some(idx) => &rest[..idx],
        None => rest,
    }
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix).then(|| &s[prefix.len()..])
}

/// Classify a name; the first matching category wins.
pub fn classify(name: &str) -> DomainStructure {
    if name.is_empty() {
        return DomainStructure::Other;
    }
    if name.chars().all(|c| c.is_ascii_digit()) {
        DomainStructure::AllDigits
    } else if name.chars().all(|c| c.is_ascii_alphabetic()) {
        DomainStructure::AllLetters
    } else if name.chars().all(|c| c.is_ascii_alphanumeric()) {
        DomainStructure::Alphanumeric
    } else if name.contains('-') {
        DomainStructure::Hyphenated
    } else {
        DomainStructure::Other
    }
}
