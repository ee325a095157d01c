use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use log::debug;

use etfdash_core::history::{HistoryRecord, MetricHistoryStore};
use etfdash_core::Result;
use etfdash_market_data::{EtfSymbol, MetricRecord};

use super::model::{EtfHistoryDB, NewEtfHistoryDB};
use crate::db::{get_connection, DbPool};
use crate::errors::StorageError;
use crate::schema::etf_history;

/// Diesel-backed [`MetricHistoryStore`].
///
/// Blocking Diesel calls run on Tokio's blocking pool.
pub struct EtfHistoryRepository {
    pool: Arc<DbPool>,
}

impl EtfHistoryRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        EtfHistoryRepository { pool }
    }

    fn save_impl(pool: &DbPool, row: &NewEtfHistoryDB) -> Result<()> {
        let mut conn = get_connection(pool)?;
        diesel::replace_into(etf_history::table)
            .values(row)
            .execute(&mut conn)
            .map_err(StorageError::from)?;
        Ok(())
    }

    fn list_impl(pool: &DbPool, symbol: EtfSymbol, limit: i64) -> Result<Vec<HistoryRecord>> {
        let mut conn = get_connection(pool)?;
        let rows = etf_history::table
            .filter(etf_history::symbol.eq(symbol.as_str()))
            .order(etf_history::date.desc())
            .limit(limit)
            .select(EtfHistoryDB::as_select())
            .load::<EtfHistoryDB>(&mut conn)
            .map_err(StorageError::from)?;

        let records = rows
            .into_iter()
            .map(HistoryRecord::try_from)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(records)
    }
}

async fn run_blocking<T, F>(job: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(job)
        .await
        .map_err(|e| StorageError::Task(e.to_string()))?
}

#[async_trait]
impl MetricHistoryStore for EtfHistoryRepository {
    async fn save(&self, symbol: EtfSymbol, record: &MetricRecord) -> Result<()> {
        let row = NewEtfHistoryDB::from_metric(symbol, record, Utc::now());
        let pool = self.pool.clone();
        debug!("Persisting {} record for {}", symbol, row.date);
        run_blocking(move || Self::save_impl(&pool, &row)).await
    }

    async fn list(&self, symbol: EtfSymbol, limit: usize) -> Result<Vec<HistoryRecord>> {
        let pool = self.pool.clone();
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        run_blocking(move || Self::list_impl(&pool, symbol, limit)).await
    }
}
