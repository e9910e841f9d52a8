//! Simulated signal providers
//!
//! Stand-ins for WHOIS, traffic ranking, keyword search, related-domain and
//! social/e-commerce lookups. Values follow simple heuristics (short names
//! and common words score better) plus pseudo-random noise seeded from the
//! host, so the same domain always yields the same bundle.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::SignalProvider;
use crate::models::errors::AppResult;
use crate::models::signals::{keys, SignalBundle, UNREGISTERED};
use crate::models::types::CanonicalDomain;
use crate::utils::constants::{COMMON_TLDS, COMMON_WORDS, REGISTRARS, RELATED_TLDS};

/// FNV-1a, stable across runs and platforms. `DefaultHasher` output may
/// change between Rust releases, which would reshuffle every seed.
fn stable_hash(s: &str) -> u64 {
    s.bytes().fold(0xcbf2_9ce4_8422_2325u64, |hash, b| {
        (hash ^ b as u64).wrapping_mul(0x0100_0000_01b3)
    })
}

/// Per-provider RNG seeded from the host
fn rng_for(domain: &CanonicalDomain, salt: &str) -> StdRng {
    StdRng::seed_from_u64(stable_hash(&domain.host()) ^ stable_hash(salt))
}

fn has_common_word(s: &str) -> bool {
    COMMON_WORDS.iter().any(|w| s.contains(w))
}

/// Registration dates and registrar
pub struct WhoisProvider;

#[async_trait]
impl SignalProvider for WhoisProvider {
    fn name(&self) -> &'static str {
        "whois"
    }

    async fn fetch(&self, domain: &CanonicalDomain) -> AppResult<SignalBundle> {
        let mut rng = rng_for(domain, self.name());
        let seed: usize = rng.gen_range(0..10);

        let today = Utc::now().date_naive();
        let registered_years_ago = 1 + seed as i64;
        let expires_in_years = 1 + (seed % 3) as i64;

        let registered = today - Duration::days(365 * registered_years_ago);
        let expires = today + Duration::days(365 * expires_in_years);

        Ok(SignalBundle::new()
            .with(keys::REGISTER_DATE, registered.format("%Y-%m-%d").to_string())
            .with(keys::EXPIRE_DATE, expires.format("%Y-%m-%d").to_string())
            .with(keys::REGISTRAR, REGISTRARS[seed % REGISTRARS.len()]))
    }
}

/// Global traffic rank, lower is better
pub struct RankProvider;

#[async_trait]
impl SignalProvider for RankProvider {
    fn name(&self) -> &'static str {
        "rank"
    }

    async fn fetch(&self, domain: &CanonicalDomain) -> AppResult<SignalBundle> {
        let mut rng = rng_for(domain, self.name());
        let host = domain.host();
        let host_len = host.chars().count() as i64;

        let mut rank: i64 = 1_000_000;
        if host_len < 10 {
            rank /= 12 - host_len;
        }
        if has_common_word(&host) {
            rank /= 2;
        }
        rank += rng.gen_range(-5_000..5_000);
        if rank < 100 {
            rank = 100 + rng.gen_range(0..900);
        }

        Ok(SignalBundle::new().with(keys::TRAFFIC_RANK, rank))
    }
}

/// Monthly search volume for the name's keyword
pub struct SearchVolumeProvider;

#[async_trait]
impl SignalProvider for SearchVolumeProvider {
    fn name(&self) -> &'static str {
        "search_volume"
    }

    async fn fetch(&self, domain: &CanonicalDomain) -> AppResult<SignalBundle> {
        let mut rng = rng_for(domain, self.name());
        let keyword = domain.keyword();
        let keyword_len = keyword.chars().count() as i64;

        let mut volume: i64 = 1_000;
        if keyword_len < 6 {
            volume *= 7 - keyword_len;
        }
        if has_common_word(keyword) {
            volume *= 3;
        }
        volume += rng.gen_range(-500..500);
        if volume < 100 {
            volume = 100 + rng.gen_range(0..900);
        }

        Ok(SignalBundle::new().with(keys::SEARCH_VOLUME, volume))
    }
}

/// Registration status of the same keyword under other popular TLDs
pub struct RelatedDomainProvider;

#[async_trait]
impl SignalProvider for RelatedDomainProvider {
    fn name(&self) -> &'static str {
        "related_domains"
    }

    async fn fetch(&self, domain: &CanonicalDomain) -> AppResult<SignalBundle> {
        let mut rng = rng_for(domain, self.name());
        let keyword_len = domain.keyword().chars().count();
        let today = Utc::now().date_naive();
        let mut bundle = SignalBundle::new();

        for tld in RELATED_TLDS.iter().filter(|t| **t != domain.tld) {
            let mut registered = if COMMON_TLDS.contains(tld) {
                keyword_len < 6
            } else {
                keyword_len < 4
            };
            if rng.gen_bool(0.5) {
                registered = !registered;
            }

            let status = if registered {
                let years_ago: i64 = rng.gen_range(1..=5);
                let date = today - Duration::days(365 * years_ago);
                format!("registered {}", date.format("%Y.%m.%d"))
            } else {
                UNREGISTERED.to_string()
            };
            bundle.insert(keys::related_domain(tld), status);
        }

        Ok(bundle)
    }
}

/// Community, encyclopedia, media and marketplace counters
pub struct SocialProvider;

#[async_trait]
impl SignalProvider for SocialProvider {
    fn name(&self) -> &'static str {
        "social"
    }

    async fn fetch(&self, domain: &CanonicalDomain) -> AppResult<SignalBundle> {
        let mut rng = rng_for(domain, self.name());
        let len = domain.keyword().chars().count() as i64;

        Ok(SignalBundle::new()
            .with(keys::COMMUNITY_POSTS, 1_000 + len * 500 + rng.gen_range(0..10_000))
            .with(keys::ENCYCLOPEDIA_INDEX, 1_000 + len * 200 + rng.gen_range(0..5_000))
            .with(keys::DICTIONARY_RECORD, len < 6 || rng.gen_bool(0.5))
            .with(keys::SEARCH_INDEX, 500 + len * 100 + rng.gen_range(0..2_000))
            .with(keys::MEDIA_INDEX, 10_000 + len * 1_000 + rng.gen_range(0..100_000))
            .with(keys::SOCIAL_INDEX, 5_000 + len * 500 + rng.gen_range(0..50_000))
            .with(keys::MARKETPLACE_LISTINGS, 100 + len * 50 + rng.gen_range(0..1_000)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::parser::parse;
    use crate::providers::default_providers;

    #[tokio::test]
    async fn test_same_domain_same_bundle() {
        let domain = parse("example.com").unwrap();
        for provider in default_providers() {
            let first = provider.fetch(&domain).await.unwrap();
            let second = provider.fetch(&domain).await.unwrap();
            assert_eq!(first, second, "provider {}", provider.name());
            assert!(!first.is_empty(), "provider {}", provider.name());
        }
    }

    #[tokio::test]
    async fn test_related_domains_skip_own_tld() {
        let domain = parse("example.io").unwrap();
        let bundle = RelatedDomainProvider.fetch(&domain).await.unwrap();

        assert!(!bundle.contains_key(&keys::related_domain("io")));
        assert_eq!(bundle.len(), RELATED_TLDS.len() - 1);
        for (_, status) in bundle.with_prefix(keys::RELATED_DOMAIN_PREFIX) {
            let text = status.to_string();
            assert!(text == UNREGISTERED || text.starts_with("registered "));
        }
    }

    #[tokio::test]
    async fn test_rank_and_volume_floors() {
        let domain = parse("a.io").unwrap();
        let rank = RankProvider.fetch(&domain).await.unwrap();
        let volume = SearchVolumeProvider.fetch(&domain).await.unwrap();

        assert!(rank.get_int(keys::TRAFFIC_RANK).unwrap() >= 100);
        assert!(volume.get_int(keys::SEARCH_VOLUME).unwrap() >= 100);
    }

    #[test]
    fn test_stable_hash_is_fixed() {
        assert_eq!(stable_hash(""), 0xcbf2_9ce4_8422_2325);
        assert_ne!(stable_hash("example.com"), stable_hash("example.net"));
    }
}
