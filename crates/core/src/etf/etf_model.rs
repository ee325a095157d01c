use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;

use etfdash_market_data::{EtfSymbol, HistoryPoint, MetricRecord};

/// Hong Kong time, used for the human-readable timestamp.
const DISPLAY_OFFSET_HOURS: i64 = 8;

/// Combined BTC and ETH metrics from one aggregate fetch.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub btc: MetricRecord,
    pub eth: MetricRecord,
    pub as_of: DateTime<Utc>,
    pub as_of_display: String,
    pub data_date: NaiveDate,
}

impl Snapshot {
    /// Build a snapshot from both records.
    ///
    /// `data_date` prefers a vendor-supplied date, BTC first, and falls back to
    /// the epoch when neither record carried one.
    pub fn from_records(btc: MetricRecord, eth: MetricRecord) -> Self {
        let data_date = [&btc, &eth]
            .into_iter()
            .find(|record| record.date_from_vendor)
            .map(|record| record.last_update_date)
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH.date_naive());
        let as_of = btc.fetched_at;

        Self {
            as_of_display: format_display_time(as_of),
            btc,
            eth,
            as_of,
            data_date,
        }
    }
}

fn format_display_time(at: DateTime<Utc>) -> String {
    let local = at + Duration::hours(DISPLAY_OFFSET_HOURS);
    format!("{} HKT", local.format("%Y/%m/%d %H:%M:%S"))
}

/// Where a history series came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HistorySource {
    Upstream,
    /// Built-in table served because the vendor call failed.
    Fallback,
}

/// Daily flow history for one ETF family, most recent first.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistorySeries {
    pub symbol: EtfSymbol,
    pub days: u32,
    pub source: HistorySource,
    pub points: Vec<HistoryPoint>,
}
