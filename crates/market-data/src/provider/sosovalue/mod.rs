//! SoSoValue provider implementation.
//!
//! Fetches US spot ETF flow metrics from the SoSoValue open API.
//!
//! # API Endpoints
//!
//! - Current metrics: `POST {base}/openapi/v2/etf/currentEtfDataMetrics` with `{"type": "us-btc-spot"}`
//! - Daily history: `POST {base}/openapi/v2/etf/historyEtfDataMetrics` with `{"type", "startDate", "endDate"}`
//! - Health: `GET {base}/health`
//!
//! Authentication uses the `x-soso-api-key` header. The provider never retries;
//! retry and fallback policy belongs to the caller.

mod models;

use async_trait::async_trait;
use chrono::{Days, Utc};
use log::{debug, warn};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use std::time::Duration;

use crate::errors::MarketDataError;
use crate::models::{EtfSymbol, HistoryPoint, MetricRecord};
use crate::provider::{EtfDataProvider, ProviderHealth};

pub use models::{SosoCurrentMetrics, SosoHistory};

/// Public SoSoValue API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://openapi.sosovalue.com";

const PROVIDER_ID: &str = "SOSOVALUE";
const API_KEY_HEADER: &str = "x-soso-api-key";
const CURRENT_METRICS_PATH: &str = "/openapi/v2/etf/currentEtfDataMetrics";
const HISTORY_METRICS_PATH: &str = "/openapi/v2/etf/historyEtfDataMetrics";
const HEALTH_PATH: &str = "/health";

/// Default HTTP request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout for the lightweight health probe
const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

/// SoSoValue provider for ETF flow data.
///
/// # Example
///
/// ```ignore
/// let provider = SosoValueProvider::new(DEFAULT_BASE_URL, "your-api-key");
/// let btc = provider.fetch_current(EtfSymbol::Btc).await?;
/// ```
pub struct SosoValueProvider {
    client: Client,
    base_url: String,
    api_key: String,
}

impl SosoValueProvider {
    /// Create a new provider against `base_url` with the given API key.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POST a JSON body and return the parsed JSON response.
    ///
    /// A successful response whose body is not JSON is returned as
    /// `Value::Null` so the normalisation layer can degrade it to zeros.
    async fn post(&self, path: &str, body: Value) -> Result<Value, MarketDataError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("POST {} {}", url, body);

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(Self::map_transport_error)?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(MarketDataError::RateLimited {
                provider: PROVIDER_ID.to_string(),
            });
        }

        if !status.is_success() {
            return Err(MarketDataError::Upstream {
                provider: PROVIDER_ID.to_string(),
                status: Some(status.as_u16()),
                message: format!("HTTP error: {}", status),
            });
        }

        let text = response.text().await.map_err(Self::map_transport_error)?;
        if text.trim().is_empty() {
            return Err(MarketDataError::Upstream {
                provider: PROVIDER_ID.to_string(),
                status: Some(status.as_u16()),
                message: "Empty response body".to_string(),
            });
        }

        Ok(serde_json::from_str(&text).unwrap_or_else(|e| {
            warn!("SoSoValue returned a non-JSON body for {}: {}", path, e);
            Value::Null
        }))
    }

    fn map_transport_error(e: reqwest::Error) -> MarketDataError {
        if e.is_timeout() {
            MarketDataError::Timeout {
                provider: PROVIDER_ID.to_string(),
            }
        } else {
            MarketDataError::Network(e)
        }
    }
}

#[async_trait]
impl EtfDataProvider for SosoValueProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn fetch_current(&self, symbol: EtfSymbol) -> Result<MetricRecord, MarketDataError> {
        let body = self
            .post(CURRENT_METRICS_PATH, json!({ "type": symbol.vendor_type() }))
            .await?;

        let record = SosoCurrentMetrics::from_response(body)
            .into_partial()
            .into_record(symbol, Utc::now(), PROVIDER_ID);

        debug!(
            "SoSoValue {}: daily inflow {} as of {}",
            symbol, record.daily_inflow, record.last_update_date
        );
        Ok(record)
    }

    async fn fetch_history(
        &self,
        symbol: EtfSymbol,
        days: u32,
    ) -> Result<Vec<HistoryPoint>, MarketDataError> {
        let end = Utc::now().date_naive();
        let start = end
            .checked_sub_days(Days::new(u64::from(days)))
            .unwrap_or(end);

        let body = self
            .post(
                HISTORY_METRICS_PATH,
                json!({
                    "type": symbol.vendor_type(),
                    "startDate": start.format("%Y-%m-%d").to_string(),
                    "endDate": end.format("%Y-%m-%d").to_string(),
                }),
            )
            .await?;

        Ok(SosoHistory::from_response(body).into_points())
    }

    async fn health_check(&self) -> ProviderHealth {
        let url = format!("{}{}", self.base_url, HEALTH_PATH);
        match self.client.get(&url).timeout(HEALTH_TIMEOUT).send().await {
            Ok(response) if response.status().is_success() => {
                ProviderHealth::healthy(response.status().as_u16())
            }
            Ok(response) => ProviderHealth::unhealthy(
                Some(response.status().as_u16()),
                format!("HTTP error: {}", response.status()),
            ),
            Err(e) => ProviderHealth::unhealthy(None, e.to_string()),
        }
    }
}
