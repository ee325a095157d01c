//! ETF data provider trait definitions.
//!
//! This module defines the core `EtfDataProvider` trait implemented by the
//! upstream vendor client. Tests substitute their own implementations.

use async_trait::async_trait;

use crate::errors::MarketDataError;
use crate::models::{EtfSymbol, HistoryPoint, MetricRecord};

use super::health::ProviderHealth;

/// Trait for ETF flow data providers.
///
/// Implementations issue exactly one upstream request per call and never
/// retry. Retry, stale fallback and rate budgeting live in the caller so
/// that failures stay observable there.
#[async_trait]
pub trait EtfDataProvider: Send + Sync {
    /// Unique identifier for this provider.
    ///
    /// Used for logging and stamped into [`MetricRecord::source`].
    fn id(&self) -> &'static str;

    /// Fetch the current metrics for one ETF family.
    ///
    /// # Returns
    ///
    /// A fully populated record on success. Missing vendor fields are
    /// defaulted, not reported as errors. Transport failures, timeouts and
    /// non-2xx statuses return a `MarketDataError`.
    async fn fetch_current(&self, symbol: EtfSymbol) -> Result<MetricRecord, MarketDataError>;

    /// Fetch daily net flows for the last `days` days.
    ///
    /// # Returns
    ///
    /// Points ordered most-recent-first, or a `MarketDataError` on failure.
    async fn fetch_history(
        &self,
        symbol: EtfSymbol,
        days: u32,
    ) -> Result<Vec<HistoryPoint>, MarketDataError>;

    /// Probe the provider's availability.
    ///
    /// Default implementation reports healthy without making a request.
    async fn health_check(&self) -> ProviderHealth {
        ProviderHealth::assumed_healthy()
    }
}
