//! Current ETF flow metrics.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::EtfSymbol;

/// Direction of the latest daily flow.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowTrend {
    Up,
    Down,
}

/// One symbol's current metrics as reported by the vendor.
///
/// Every numeric field is sourced independently from the vendor payload.
/// No relationship between them is enforced here.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricRecord {
    pub symbol: EtfSymbol,
    /// Net daily flow in USD; negative values are outflows.
    pub daily_inflow: f64,
    /// Total net assets in USD.
    pub total_assets: f64,
    /// Share of the underlying asset's market cap, in percent.
    pub market_ratio: f64,
    /// Cumulative net flow since launch in USD.
    pub cumulative_inflow: f64,
    /// Vendor as-of date for the figures (not the fetch date).
    pub last_update_date: NaiveDate,
    /// False when `last_update_date` was defaulted from the fetch time.
    pub date_from_vendor: bool,
    /// When the upstream call that produced this record completed.
    pub fetched_at: DateTime<Utc>,
    /// Provider that produced the record.
    pub source: String,
}

impl MetricRecord {
    pub fn trend(&self) -> FlowTrend {
        if self.daily_inflow >= 0.0 {
            FlowTrend::Up
        } else {
            FlowTrend::Down
        }
    }

    pub fn is_inflow(&self) -> bool {
        self.trend() == FlowTrend::Up
    }
}

/// Vendor projection of a [`MetricRecord`] before defaults are applied.
///
/// Providers fill in whatever the payload carried; [`into_record`](Self::into_record)
/// turns the gaps into zeros so a partial payload never fails a request.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PartialMetricRecord {
    pub daily_inflow: Option<f64>,
    pub total_assets: Option<f64>,
    pub market_ratio: Option<f64>,
    pub cumulative_inflow: Option<f64>,
    pub last_update_date: Option<NaiveDate>,
}

impl PartialMetricRecord {
    /// Coerces the partial projection into a full record.
    ///
    /// Missing numeric fields become `0.0`, non-finite values are treated as
    /// missing, and a missing as-of date falls back to the UTC date of `fetched_at`.
    pub fn into_record(
        self,
        symbol: EtfSymbol,
        fetched_at: DateTime<Utc>,
        source: impl Into<String>,
    ) -> MetricRecord {
        let date_from_vendor = self.last_update_date.is_some();
        MetricRecord {
            symbol,
            daily_inflow: finite_or_zero(self.daily_inflow),
            total_assets: finite_or_zero(self.total_assets),
            market_ratio: finite_or_zero(self.market_ratio),
            cumulative_inflow: finite_or_zero(self.cumulative_inflow),
            last_update_date: self
                .last_update_date
                .unwrap_or_else(|| fetched_at.date_naive()),
            date_from_vendor,
            fetched_at,
            source: source.into(),
        }
    }
}

fn finite_or_zero(value: Option<f64>) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(0.0)
}
