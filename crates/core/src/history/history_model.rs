use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use etfdash_market_data::{EtfSymbol, MetricRecord};

/// One persisted row, unique per symbol and vendor as-of date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    pub symbol: EtfSymbol,
    pub date: NaiveDate,
    pub daily_inflow: f64,
    pub total_assets: f64,
    pub market_ratio: f64,
    pub cumulative_inflow: f64,
    pub created_at: DateTime<Utc>,
}

impl HistoryRecord {
    /// Row for `record`, keyed by its vendor as-of date.
    pub fn from_metric(symbol: EtfSymbol, record: &MetricRecord, created_at: DateTime<Utc>) -> Self {
        Self {
            symbol,
            date: record.last_update_date,
            daily_inflow: record.daily_inflow,
            total_assets: record.total_assets,
            market_ratio: record.market_ratio,
            cumulative_inflow: record.cumulative_inflow,
            created_at,
        }
    }
}
