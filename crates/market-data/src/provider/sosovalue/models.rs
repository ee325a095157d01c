//! SoSoValue API response models.
//!
//! The vendor wraps metrics as `{"value": ..., "lastUpdateDate": ...}` objects
//! nested under an optional `data` envelope. Values arrive either as JSON numbers
//! or numeric strings, and individual fields are frequently missing. Every field
//! here is therefore optional and deserialized leniently: a field with an
//! unexpected shape is dropped instead of failing the whole payload.

use chrono::{DateTime, NaiveDate};
use log::warn;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::models::{HistoryPoint, PartialMetricRecord};

/// A single vendor metric with its as-of date.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SosoMetricField {
    #[serde(default)]
    pub value: Option<Value>,
    #[serde(default)]
    pub last_update_date: Option<Value>,
}

impl SosoMetricField {
    fn amount(&self) -> Option<f64> {
        self.value.as_ref().and_then(coerce_f64)
    }

    fn date(&self) -> Option<NaiveDate> {
        self.last_update_date.as_ref().and_then(coerce_date)
    }
}

/// Payload of `currentEtfDataMetrics`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SosoCurrentMetrics {
    #[serde(default, deserialize_with = "lenient")]
    pub daily_net_inflow: Option<SosoMetricField>,
    #[serde(default, deserialize_with = "lenient")]
    pub total_net_assets: Option<SosoMetricField>,
    /// Fraction of the underlying market cap (0.0662 means 6.62%).
    #[serde(default, deserialize_with = "lenient")]
    pub total_net_assets_percentage: Option<SosoMetricField>,
    #[serde(default, deserialize_with = "lenient")]
    pub cum_net_inflow: Option<SosoMetricField>,
}

impl SosoCurrentMetrics {
    /// Parses a raw response body, unwrapping the `data` envelope when present.
    pub fn from_response(root: Value) -> Self {
        let payload = unwrap_envelope(root);
        if !payload.is_object() {
            warn!("SoSoValue current metrics payload is not an object, using empty metrics");
            return Self::default();
        }
        serde_json::from_value(payload).unwrap_or_else(|e| {
            warn!("Failed to parse SoSoValue current metrics: {}", e);
            Self::default()
        })
    }

    pub fn into_partial(self) -> PartialMetricRecord {
        let last_update_date = self
            .daily_net_inflow
            .as_ref()
            .and_then(SosoMetricField::date)
            .or_else(|| self.total_net_assets.as_ref().and_then(SosoMetricField::date));

        PartialMetricRecord {
            daily_inflow: self.daily_net_inflow.as_ref().and_then(SosoMetricField::amount),
            total_assets: self.total_net_assets.as_ref().and_then(SosoMetricField::amount),
            market_ratio: self
                .total_net_assets_percentage
                .as_ref()
                .and_then(SosoMetricField::amount)
                .map(|fraction| fraction * 100.0),
            cumulative_inflow: self.cum_net_inflow.as_ref().and_then(SosoMetricField::amount),
            last_update_date,
        }
    }
}

/// One row of `historyEtfDataMetrics`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SosoHistoryItem {
    #[serde(default)]
    pub date: Option<Value>,
    #[serde(default, deserialize_with = "lenient")]
    pub daily_net_inflow: Option<SosoMetricField>,
}

/// Payload of `historyEtfDataMetrics`.
#[derive(Debug, Default, Deserialize)]
pub struct SosoHistory {
    #[serde(default, deserialize_with = "lenient")]
    pub list: Option<Vec<Value>>,
}

impl SosoHistory {
    pub fn from_response(root: Value) -> Self {
        let payload = unwrap_envelope(root);
        serde_json::from_value(payload).unwrap_or_else(|e| {
            warn!("Failed to parse SoSoValue history payload: {}", e);
            Self::default()
        })
    }

    /// Converts rows into points ordered most-recent-first.
    ///
    /// Rows without a `dailyNetInflow` metric are ignored, as are rows whose
    /// date cannot be determined.
    pub fn into_points(self) -> Vec<HistoryPoint> {
        let mut points: Vec<HistoryPoint> = self
            .list
            .unwrap_or_default()
            .into_iter()
            .filter_map(|raw| serde_json::from_value::<SosoHistoryItem>(raw).ok())
            .filter_map(|item| {
                let inflow = item.daily_net_inflow?;
                let date = item
                    .date
                    .as_ref()
                    .and_then(coerce_date)
                    .or_else(|| inflow.date());
                match date {
                    Some(date) => Some(HistoryPoint::from_signed(date, inflow.amount().unwrap_or(0.0))),
                    None => {
                        warn!("Skipping SoSoValue history row without a usable date");
                        None
                    }
                }
            })
            .collect();

        points.sort_by(|a, b| b.date.cmp(&a.date));
        points
    }
}

/// Returns `root.data` when it is present and truthy, otherwise `root`.
fn unwrap_envelope(root: Value) -> Value {
    match root {
        Value::Object(mut map) => match map.remove("data") {
            Some(data) if is_truthy(&data) => data,
            Some(data) => {
                map.insert("data".to_string(), data);
                Value::Object(map)
            }
            None => Value::Object(map),
        },
        other => other,
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Reads a number from a JSON number or numeric string.
pub(crate) fn coerce_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite())
}

/// Reads a calendar date from `YYYY-MM-DD[...]` strings or epoch milliseconds.
pub(crate) fn coerce_date(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            s.get(..10)
                .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
        }
        Value::Number(n) => n
            .as_i64()
            .and_then(DateTime::from_timestamp_millis)
            .map(|dt| dt.date_naive()),
        _ => None,
    }
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}
