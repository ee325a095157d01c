//! Database models for ETF history rows.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;

use etfdash_core::history::HistoryRecord;
use etfdash_market_data::{EtfSymbol, MetricRecord};

use crate::errors::StorageError;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Queryable, Identifiable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::etf_history)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct EtfHistoryDB {
    pub id: i32,
    pub symbol: String,
    pub date: String,
    pub daily_inflow: f64,
    pub total_assets: f64,
    pub market_ratio: f64,
    pub cumulative_inflow: f64,
    pub created_at: String,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::etf_history)]
pub struct NewEtfHistoryDB {
    pub symbol: String,
    pub date: String,
    pub daily_inflow: f64,
    pub total_assets: f64,
    pub market_ratio: f64,
    pub cumulative_inflow: f64,
    pub created_at: String,
}

impl NewEtfHistoryDB {
    pub fn from_metric(symbol: EtfSymbol, record: &MetricRecord, created_at: DateTime<Utc>) -> Self {
        Self {
            symbol: symbol.as_str().to_string(),
            date: record.last_update_date.format(DATE_FORMAT).to_string(),
            daily_inflow: record.daily_inflow,
            total_assets: record.total_assets,
            market_ratio: record.market_ratio,
            cumulative_inflow: record.cumulative_inflow,
            created_at: created_at.to_rfc3339(),
        }
    }
}

impl TryFrom<EtfHistoryDB> for HistoryRecord {
    type Error = StorageError;

    fn try_from(row: EtfHistoryDB) -> Result<Self, Self::Error> {
        let symbol = row
            .symbol
            .parse::<EtfSymbol>()
            .map_err(|e| StorageError::InvalidRow(format!("row {}: {}", row.id, e)))?;
        let date = NaiveDate::parse_from_str(&row.date, DATE_FORMAT).map_err(|e| {
            StorageError::InvalidRow(format!("row {}: bad date '{}': {}", row.id, row.date, e))
        })?;
        let created_at = DateTime::parse_from_rfc3339(&row.created_at)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| {
                StorageError::InvalidRow(format!(
                    "row {}: bad timestamp '{}': {}",
                    row.id, row.created_at, e
                ))
            })?;

        Ok(HistoryRecord {
            symbol,
            date,
            daily_inflow: row.daily_inflow,
            total_assets: row.total_assets,
            market_ratio: row.market_ratio,
            cumulative_inflow: row.cumulative_inflow,
            created_at,
        })
    }
}
