//! Bounded in-memory valuation history

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::RwLock;
use tracing::debug;

use super::HistorySink;
use crate::models::errors::{AppError, AppResult};
use crate::models::types::{EstimationResult, HistoryRecord};
use crate::utils::constants::DEFAULT_HISTORY_LIMIT;

/// Ring buffer of past valuations; the oldest record is dropped when full
pub struct InMemoryHistory {
    records: RwLock<VecDeque<HistoryRecord>>,
    capacity: usize,
}

impl InMemoryHistory {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            records: RwLock::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    /// Newest first. `domain_filter` matches as a case-insensitive substring;
    /// `limit` of zero means the default page size.
    pub fn query(&self, domain_filter: Option<&str>, limit: usize) -> AppResult<Vec<HistoryRecord>> {
        let limit = if limit == 0 { DEFAULT_HISTORY_LIMIT } else { limit };
        let filter = domain_filter
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(str::to_lowercase);

        let records = self
            .records
            .read()
            .map_err(|_| AppError::internal("history lock poisoned"))?;

        Ok(records
            .iter()
            .rev()
            .filter(|r| match &filter {
                Some(f) => r.domain.to_lowercase().contains(f.as_str()),
                None => true,
            })
            .take(limit)
            .cloned()
            .collect())
    }

    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl HistorySink for InMemoryHistory {
    async fn record(&self, result: &EstimationResult) -> AppResult<()> {
        let record = HistoryRecord::from(result);
        let mut records = self
            .records
            .write()
            .map_err(|_| AppError::history_write("history lock poisoned"))?;

        if records.len() >= self.capacity {
            records.pop_front();
        }
        debug!("📝 HISTORY: {} -> {:.2}", record.domain, record.price);
        records.push_back(record);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn result(domain: &str, price: f64) -> EstimationResult {
        EstimationResult {
            domain: domain.to_string(),
            grade: 0.0,
            price,
            base_attributes: vec![],
            other_attributes: vec![],
            estimation_date: Utc::now(),
            degraded: false,
        }
    }

    #[tokio::test]
    async fn test_query_newest_first_with_filter() {
        let history = InMemoryHistory::new(10);
        history.record(&result("alpha.com", 1.0)).await.unwrap();
        history.record(&result("beta.net", 2.0)).await.unwrap();
        history.record(&result("Alpha.io", 3.0)).await.unwrap();

        let all = history.query(None, 0).unwrap();
        let prices: Vec<f64> = all.iter().map(|r| r.price).collect();
        assert_eq!(prices, vec![3.0, 2.0, 1.0]);

        let alpha = history.query(Some("ALPHA"), 0).unwrap();
        assert_eq!(alpha.len(), 2);
        assert_eq!(alpha[0].domain, "Alpha.io");

        assert_eq!(history.query(Some("  "), 1).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_capacity_drops_oldest() {
        let history = InMemoryHistory::new(2);
        for (i, d) in ["a.com", "b.com", "c.com"].iter().enumerate() {
            history.record(&result(d, i as f64)).await.unwrap();
        }

        assert_eq!(history.len(), 2);
        let domains: Vec<String> = history
            .query(None, 10)
            .unwrap()
            .into_iter()
            .map(|r| r.domain)
            .collect();
        assert_eq!(domains, vec!["c.com", "b.com"]);
    }
}
