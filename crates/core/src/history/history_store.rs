//! In-memory history store implementations.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;

use etfdash_market_data::{EtfSymbol, MetricRecord};

use super::{HistoryRecord, MetricHistoryStore};
use crate::errors::{Error, Result};

/// No-op implementation for deployments without persistence.
#[derive(Clone, Default)]
pub struct NoOpMetricHistoryStore;

#[async_trait]
impl MetricHistoryStore for NoOpMetricHistoryStore {
    async fn save(&self, _symbol: EtfSymbol, _record: &MetricRecord) -> Result<()> {
        Ok(())
    }

    async fn list(&self, _symbol: EtfSymbol, _limit: usize) -> Result<Vec<HistoryRecord>> {
        Ok(Vec::new())
    }
}

/// Mock store for testing - keeps rows in memory and can be told to fail.
#[derive(Clone, Default)]
pub struct MockMetricHistoryStore {
    rows: Arc<Mutex<Vec<HistoryRecord>>>,
    fail_on_save: Arc<AtomicBool>,
}

impl MockMetricHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_on_save(&self, fail: bool) {
        self.fail_on_save.store(fail, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap_or_else(|p| p.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl MetricHistoryStore for MockMetricHistoryStore {
    async fn save(&self, symbol: EtfSymbol, record: &MetricRecord) -> Result<()> {
        if self.fail_on_save.load(Ordering::SeqCst) {
            return Err(Error::Repository("Intentional save failure".to_string()));
        }
        let row = HistoryRecord::from_metric(symbol, record, Utc::now());
        let mut rows = self.rows.lock().unwrap_or_else(|p| p.into_inner());
        rows.retain(|r| !(r.symbol == row.symbol && r.date == row.date));
        rows.push(row);
        Ok(())
    }

    async fn list(&self, symbol: EtfSymbol, limit: usize) -> Result<Vec<HistoryRecord>> {
        let mut rows: Vec<HistoryRecord> = self
            .rows
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .iter()
            .filter(|r| r.symbol == symbol)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.date.cmp(&a.date));
        rows.truncate(limit);
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use etfdash_market_data::PartialMetricRecord;

    fn record(symbol: EtfSymbol, day: u32, inflow: f64) -> MetricRecord {
        PartialMetricRecord {
            daily_inflow: Some(inflow),
            last_update_date: NaiveDate::from_ymd_opt(2025, 9, day),
            ..Default::default()
        }
        .into_record(symbol, Utc::now(), "TEST")
    }

    #[tokio::test]
    async fn test_noop_store_accepts_and_returns_nothing() {
        let store = NoOpMetricHistoryStore;
        store.save(EtfSymbol::Btc, &record(EtfSymbol::Btc, 1, 1.0)).await.unwrap();
        assert!(store.list(EtfSymbol::Btc, 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_mock_store_upserts_by_symbol_and_date() {
        let store = MockMetricHistoryStore::new();
        store.save(EtfSymbol::Btc, &record(EtfSymbol::Btc, 10, 1.0)).await.unwrap();
        store.save(EtfSymbol::Btc, &record(EtfSymbol::Btc, 10, 2.0)).await.unwrap();
        store.save(EtfSymbol::Eth, &record(EtfSymbol::Eth, 10, 3.0)).await.unwrap();
        assert_eq!(store.len(), 2);

        let btc = store.list(EtfSymbol::Btc, 10).await.unwrap();
        assert_eq!(btc.len(), 1);
        assert_eq!(btc[0].daily_inflow, 2.0);
    }

    #[tokio::test]
    async fn test_mock_store_lists_most_recent_first_with_limit() {
        let store = MockMetricHistoryStore::new();
        for day in [3, 5, 4] {
            store.save(EtfSymbol::Eth, &record(EtfSymbol::Eth, day, 1.0)).await.unwrap();
        }

        let rows = store.list(EtfSymbol::Eth, 2).await.unwrap();
        let days: Vec<NaiveDate> = rows.iter().map(|r| r.date).collect();
        assert_eq!(
            days,
            vec![
                NaiveDate::from_ymd_opt(2025, 9, 5).unwrap(),
                NaiveDate::from_ymd_opt(2025, 9, 4).unwrap()
            ]
        );
    }

    #[tokio::test]
    async fn test_mock_store_can_fail() {
        let store = MockMetricHistoryStore::new();
        store.set_fail_on_save(true);
        assert!(store.save(EtfSymbol::Btc, &record(EtfSymbol::Btc, 1, 1.0)).await.is_err());
        assert!(store.is_empty());
    }
}
