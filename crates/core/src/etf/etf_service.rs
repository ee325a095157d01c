use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info, warn};

use etfdash_market_data::{
    fallback_history, EtfDataProvider, EtfSymbol, HistoryPoint, MarketDataError, MetricRecord,
    ProviderHealth, RateGovernor,
};

use super::{EtfServiceTrait, HistorySeries, HistorySource, Snapshot};
use crate::cache::{CacheStore, Fingerprint};
use crate::constants::MAX_HISTORY_DAYS;
use crate::errors::{Error, Result};

/// Values held in the response cache.
#[derive(Debug, Clone)]
enum CachedPayload {
    Current(MetricRecord),
    History(Vec<HistoryPoint>),
}

/// Aggregator over the upstream provider and the response cache.
///
/// On-demand reads are not gated by the rate governor; the governor is only
/// told when the vendor itself answers 429.
pub struct EtfService {
    provider: Arc<dyn EtfDataProvider>,
    governor: Arc<RateGovernor>,
    cache: CacheStore<CachedPayload>,
}

impl EtfService {
    pub fn new(
        provider: Arc<dyn EtfDataProvider>,
        governor: Arc<RateGovernor>,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            provider,
            governor,
            cache: CacheStore::new(cache_ttl),
        }
    }

    fn note_upstream_error(&self, error: &MarketDataError) {
        if error.is_rate_limited() {
            self.governor.force_exhausted();
        }
    }

    fn cached_current(&self, key: &Fingerprint, allow_stale: bool) -> Option<MetricRecord> {
        let hit = if allow_stale {
            self.cache.get_stale(key)
        } else {
            self.cache.get(key)
        };
        match hit {
            Some(CachedPayload::Current(record)) => Some(record),
            _ => None,
        }
    }

    fn cached_history(&self, key: &Fingerprint, allow_stale: bool) -> Option<Vec<HistoryPoint>> {
        let hit = if allow_stale {
            self.cache.get_stale(key)
        } else {
            self.cache.get(key)
        };
        match hit {
            Some(CachedPayload::History(points)) => Some(points),
            _ => None,
        }
    }
}

#[async_trait]
impl EtfServiceTrait for EtfService {
    async fn fetch_current(&self, symbol: EtfSymbol) -> Result<MetricRecord> {
        let key = Fingerprint::Current(symbol);
        if let Some(record) = self.cached_current(&key, false) {
            return Ok(record);
        }

        match self.provider.fetch_current(symbol).await {
            Ok(record) => {
                self.cache.put(key, CachedPayload::Current(record.clone()));
                Ok(record)
            }
            Err(e) => {
                self.note_upstream_error(&e);
                match self.cached_current(&key, true) {
                    Some(stale) => {
                        warn!(
                            "Upstream fetch for {} failed ({}), serving stale cache from {}",
                            symbol, e, stale.fetched_at
                        );
                        Ok(stale)
                    }
                    None => Err(e.into()),
                }
            }
        }
    }

    async fn fetch_all(&self) -> Result<Snapshot> {
        // Both fetches run to completion so a successful one still lands in the cache.
        let (btc, eth) = futures::join!(
            self.fetch_current(EtfSymbol::Btc),
            self.fetch_current(EtfSymbol::Eth)
        );
        let snapshot = Snapshot::from_records(btc?, eth?);
        debug!(
            "Snapshot ready: BTC {} / ETH {} (data date {})",
            snapshot.btc.daily_inflow, snapshot.eth.daily_inflow, snapshot.data_date
        );
        Ok(snapshot)
    }

    async fn fetch_history(&self, symbol: EtfSymbol, days: u32) -> Result<HistorySeries> {
        if days == 0 || days > MAX_HISTORY_DAYS {
            return Err(Error::InvalidInput(format!(
                "days must be between 1 and {}, got {}",
                MAX_HISTORY_DAYS, days
            )));
        }

        let key = Fingerprint::History { symbol, days };
        let series = |source, points| HistorySeries {
            symbol,
            days,
            source,
            points,
        };

        if let Some(points) = self.cached_history(&key, false) {
            return Ok(series(HistorySource::Upstream, points));
        }

        match self.provider.fetch_history(symbol, days).await {
            Ok(points) => {
                info!("Fetched {} day(s) of {} history", points.len(), symbol);
                self.cache.put(key, CachedPayload::History(points.clone()));
                Ok(series(HistorySource::Upstream, points))
            }
            Err(e) => {
                self.note_upstream_error(&e);
                if let Some(stale) = self.cached_history(&key, true) {
                    warn!("History fetch for {} failed ({}), serving stale cache", symbol, e);
                    return Ok(series(HistorySource::Upstream, stale));
                }
                warn!(
                    "History fetch for {} failed ({}), serving built-in series",
                    symbol, e
                );
                let points = fallback_history(symbol, days, Utc::now().date_naive());
                Ok(series(HistorySource::Fallback, points))
            }
        }
    }

    async fn provider_health(&self) -> ProviderHealth {
        self.provider.health_check().await
    }

    fn clear_cache(&self) {
        self.cache.clear();
    }

    fn cache_size(&self) -> usize {
        self.cache.len()
    }

    fn cache_ttl(&self) -> Duration {
        self.cache.ttl()
    }
}
