use std::time::Duration;

use async_trait::async_trait;

use etfdash_market_data::{EtfSymbol, MetricRecord, ProviderHealth};

use super::{HistorySeries, Snapshot};
use crate::errors::Result;

/// Trait for the ETF aggregator used by the scheduler and the HTTP layer.
#[async_trait]
pub trait EtfServiceTrait: Send + Sync {
    /// Current metrics for one symbol: fresh cache, then upstream, then stale cache.
    async fn fetch_current(&self, symbol: EtfSymbol) -> Result<MetricRecord>;

    /// BTC and ETH together; fails as a whole if either symbol fails.
    async fn fetch_all(&self) -> Result<Snapshot>;

    /// Daily history for `days` days, degrading to the built-in series.
    async fn fetch_history(&self, symbol: EtfSymbol, days: u32) -> Result<HistorySeries>;

    async fn provider_health(&self) -> ProviderHealth;

    fn clear_cache(&self);

    fn cache_size(&self) -> usize;

    fn cache_ttl(&self) -> Duration;
}
