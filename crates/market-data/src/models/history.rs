use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Whether a day's net flow went into or out of the funds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowDirection {
    Inflow,
    Outflow,
}

impl FlowDirection {
    /// Direction of a signed flow amount; zero counts as inflow.
    pub fn of(amount: f64) -> Self {
        if amount >= 0.0 {
            Self::Inflow
        } else {
            Self::Outflow
        }
    }
}

/// One day of net flow for an ETF family.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryPoint {
    pub date: NaiveDate,
    /// Absolute flow in USD; the sign lives in `direction`.
    pub inflow_amount: f64,
    pub direction: FlowDirection,
}

impl HistoryPoint {
    /// Builds a point from a signed flow amount.
    pub fn from_signed(date: NaiveDate, amount: f64) -> Self {
        Self {
            date,
            inflow_amount: amount.abs(),
            direction: FlowDirection::of(amount),
        }
    }
}
