use async_trait::async_trait;

use etfdash_market_data::{EtfSymbol, MetricRecord};

use super::HistoryRecord;
use crate::errors::Result;

/// Sink for metric records produced by scheduled refreshes.
///
/// Saving is an upsert: a second save for the same symbol and date replaces
/// the earlier row.
#[async_trait]
pub trait MetricHistoryStore: Send + Sync {
    async fn save(&self, symbol: EtfSymbol, record: &MetricRecord) -> Result<()>;

    /// Up to `limit` rows for `symbol`, most recent date first.
    async fn list(&self, symbol: EtfSymbol, limit: usize) -> Result<Vec<HistoryRecord>>;
}
