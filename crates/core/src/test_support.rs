//! Shared fixtures for unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};

use etfdash_market_data::{
    EtfDataProvider, EtfSymbol, HistoryPoint, MarketDataError, MetricRecord, PartialMetricRecord,
};

/// Scripted reply for one symbol.
#[derive(Clone, Debug)]
pub enum Reply {
    Inflow(f64),
    Status(u16),
}

/// Provider whose replies are set per symbol and whose calls are counted.
#[derive(Clone, Default)]
pub struct MockProvider {
    current: Arc<Mutex<HashMap<EtfSymbol, Reply>>>,
    history: Arc<Mutex<HashMap<EtfSymbol, Reply>>>,
    current_calls: Arc<AtomicUsize>,
    history_calls: Arc<AtomicUsize>,
}

impl MockProvider {
    /// Both symbols answer with a positive inflow.
    pub fn healthy() -> Self {
        let provider = Self::default();
        provider.set_current(EtfSymbol::Btc, Reply::Inflow(642_350_000.0));
        provider.set_current(EtfSymbol::Eth, Reply::Inflow(405_550_000.0));
        provider.set_history(EtfSymbol::Btc, Reply::Inflow(1_000_000.0));
        provider.set_history(EtfSymbol::Eth, Reply::Inflow(2_000_000.0));
        provider
    }

    pub fn set_current(&self, symbol: EtfSymbol, reply: Reply) {
        self.current.lock().unwrap().insert(symbol, reply);
    }

    pub fn set_history(&self, symbol: EtfSymbol, reply: Reply) {
        self.history.lock().unwrap().insert(symbol, reply);
    }

    pub fn current_calls(&self) -> usize {
        self.current_calls.load(Ordering::SeqCst)
    }

    pub fn history_calls(&self) -> usize {
        self.history_calls.load(Ordering::SeqCst)
    }

    fn error_for(status: u16) -> MarketDataError {
        if status == 429 {
            MarketDataError::RateLimited {
                provider: "MOCK".to_string(),
            }
        } else {
            MarketDataError::Upstream {
                provider: "MOCK".to_string(),
                status: Some(status),
                message: format!("HTTP error: {}", status),
            }
        }
    }
}

#[async_trait]
impl EtfDataProvider for MockProvider {
    fn id(&self) -> &'static str {
        "MOCK"
    }

    async fn fetch_current(&self, symbol: EtfSymbol) -> Result<MetricRecord, MarketDataError> {
        self.current_calls.fetch_add(1, Ordering::SeqCst);
        let reply = self.current.lock().unwrap().get(&symbol).cloned();
        match reply {
            Some(Reply::Inflow(amount)) => Ok(PartialMetricRecord {
                daily_inflow: Some(amount),
                total_assets: Some(150_000_000_000.0),
                market_ratio: Some(6.62),
                cumulative_inflow: Some(56_000_000_000.0),
                last_update_date: NaiveDate::from_ymd_opt(2025, 9, 12),
            }
            .into_record(symbol, Utc::now(), "MOCK")),
            Some(Reply::Status(status)) => Err(Self::error_for(status)),
            None => Err(Self::error_for(500)),
        }
    }

    async fn fetch_history(
        &self,
        symbol: EtfSymbol,
        _days: u32,
    ) -> Result<Vec<HistoryPoint>, MarketDataError> {
        self.history_calls.fetch_add(1, Ordering::SeqCst);
        let reply = self.history.lock().unwrap().get(&symbol).cloned();
        match reply {
            Some(Reply::Inflow(amount)) => Ok(vec![
                HistoryPoint::from_signed(NaiveDate::from_ymd_opt(2025, 9, 12).unwrap(), amount),
                HistoryPoint::from_signed(NaiveDate::from_ymd_opt(2025, 9, 11).unwrap(), -amount),
            ]),
            Some(Reply::Status(status)) => Err(Self::error_for(status)),
            None => Err(Self::error_for(500)),
        }
    }
}
