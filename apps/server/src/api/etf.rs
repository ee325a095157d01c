use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, NaiveDate, Utc};
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};

use etfdash_core::constants::{DEFAULT_HISTORY_DAYS, MAX_HISTORY_DAYS};
use etfdash_core::etf::{HistorySeries, Snapshot};
use etfdash_core::history::HistoryRecord;
use etfdash_core::insight::generate_insight;
use etfdash_core::DashboardStatus;
use etfdash_market_data::{EtfSymbol, FlowTrend, MetricRecord, ProviderHealth};

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

#[derive(Serialize)]
struct Envelope<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'static str>,
    data: T,
}

impl<T> Envelope<T> {
    fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            message: None,
            data,
        })
    }

    fn with_message(message: &'static str, data: T) -> Json<Self> {
        Json(Self {
            success: true,
            message: Some(message),
            data,
        })
    }
}

/// A record with its derived trend, as the dashboard renders it.
#[derive(Serialize)]
struct RecordView {
    #[serde(flatten)]
    record: MetricRecord,
    trend: FlowTrend,
}

impl From<MetricRecord> for RecordView {
    fn from(record: MetricRecord) -> Self {
        Self {
            trend: record.trend(),
            record,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotView {
    btc: RecordView,
    eth: RecordView,
    as_of: DateTime<Utc>,
    as_of_display: String,
    data_date: NaiveDate,
    ai_insight: String,
}

impl From<Snapshot> for SnapshotView {
    fn from(snapshot: Snapshot) -> Self {
        let ai_insight = generate_insight(&snapshot.btc, &snapshot.eth);
        Self {
            btc: snapshot.btc.into(),
            eth: snapshot.eth.into(),
            as_of: snapshot.as_of,
            as_of_display: snapshot.as_of_display,
            data_date: snapshot.data_date,
            ai_insight,
        }
    }
}

/// Per-family payload keyed `btc` / `eth`, whether one or both were requested.
type BySymbol<T> = BTreeMap<&'static str, T>;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusView {
    #[serde(flatten)]
    dashboard: DashboardStatus,
    vendor: ProviderHealth,
    uptime_secs: u64,
    timestamp: DateTime<Utc>,
}

#[derive(Deserialize)]
struct HistoryQuery {
    symbol: Option<String>,
    days: Option<String>,
}

#[derive(Deserialize)]
struct RecordsQuery {
    symbol: Option<String>,
    limit: Option<String>,
}

/// The family a query names, or every family when it names none.
fn requested_symbols(raw: Option<&str>) -> ApiResult<Vec<EtfSymbol>> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(EtfSymbol::ALL.to_vec()),
        Some(s) => Ok(vec![s.parse::<EtfSymbol>()?]),
    }
}

/// Parse a day count or row limit in `1..=MAX_HISTORY_DAYS`.
fn parse_window(name: &str, raw: Option<&str>) -> ApiResult<u32> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(DEFAULT_HISTORY_DAYS);
    };
    match raw.parse::<u32>() {
        Ok(n) if (1..=MAX_HISTORY_DAYS).contains(&n) => Ok(n),
        _ => Err(ApiError::BadRequest(format!(
            "{} must be an integer between 1 and {}, got '{}'",
            name, MAX_HISTORY_DAYS, raw
        ))),
    }
}

async fn get_current(State(state): State<Arc<AppState>>) -> ApiResult<Json<Envelope<SnapshotView>>> {
    let snapshot = state
        .context
        .etf_service()
        .fetch_all()
        .await
        .map_err(ApiError::failed("Failed to fetch ETF data"))?;
    Ok(Envelope::ok(snapshot.into()))
}

async fn refresh(State(state): State<Arc<AppState>>) -> ApiResult<Json<Envelope<SnapshotView>>> {
    let service = state.context.etf_service();
    service.clear_cache();
    let snapshot = service
        .fetch_all()
        .await
        .map_err(ApiError::failed("Failed to refresh ETF data"))?;
    tracing::info!("Manual refresh completed for {}", snapshot.data_date);
    Ok(Envelope::with_message("Data refreshed", snapshot.into()))
}

async fn get_history(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HistoryQuery>,
) -> ApiResult<Json<Envelope<BySymbol<HistorySeries>>>> {
    let symbols = requested_symbols(query.symbol.as_deref())?;
    let days = parse_window("days", query.days.as_deref())?;
    let service = state.context.etf_service();
    let service = &service;

    let series = try_join_all(symbols.into_iter().map(|symbol| async move {
        let series = service.fetch_history(symbol, days).await?;
        Ok::<_, etfdash_core::Error>((symbol.key(), series))
    }))
    .await
    .map_err(ApiError::failed("Failed to fetch ETF history"))?;
    Ok(Envelope::ok(series.into_iter().collect()))
}

async fn get_records(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RecordsQuery>,
) -> ApiResult<Json<Envelope<BySymbol<Vec<HistoryRecord>>>>> {
    let symbols = requested_symbols(query.symbol.as_deref())?;
    let limit = parse_window("limit", query.limit.as_deref())? as usize;
    let store = state.context.history_store();
    let store = &store;

    let rows = try_join_all(symbols.into_iter().map(|symbol| async move {
        let rows = store.list(symbol, limit).await?;
        Ok::<_, etfdash_core::Error>((symbol.key(), rows))
    }))
    .await
    .map_err(ApiError::failed("Failed to read stored records"))?;
    Ok(Envelope::ok(rows.into_iter().collect()))
}

async fn get_status(State(state): State<Arc<AppState>>) -> Json<Envelope<StatusView>> {
    let vendor = state.context.etf_service().provider_health().await;
    if !vendor.is_healthy() {
        tracing::warn!(
            "Vendor health check failed: {}",
            vendor.error.as_deref().unwrap_or("unknown error")
        );
    }
    Envelope::ok(StatusView {
        dashboard: state.context.status(),
        vendor,
        uptime_secs: state.uptime_secs(),
        timestamp: Utc::now(),
    })
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/current", get(get_current))
        .route("/refresh", post(refresh))
        .route("/history", get(get_history))
        .route("/records", get(get_records))
        .route("/status", get(get_status))
}
