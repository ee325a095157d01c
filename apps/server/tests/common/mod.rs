#![allow(dead_code)]

use std::sync::atomic::{AtomicU16, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use etfdash_core::settings::DashboardSettings;
use etfdash_market_data::ApiPlan;
use etfdash_server::{api::app_router, build_state, config::Config, AppState};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

/// Scripted stand-in for the SoSoValue API.
#[derive(Default)]
pub struct FakeVendor {
    pub current_calls: AtomicUsize,
    pub history_calls: AtomicUsize,
    /// Non-zero makes every ETH current-metrics call answer with this status.
    pub eth_status: AtomicU16,
    /// Non-zero makes every history call answer with this status.
    pub history_status: AtomicU16,
}

impl FakeVendor {
    pub fn current_calls(&self) -> usize {
        self.current_calls.load(Ordering::SeqCst)
    }

    pub fn history_calls(&self) -> usize {
        self.history_calls.load(Ordering::SeqCst)
    }
}

fn metrics(inflow: &str, date: &str) -> Value {
    json!({
        "code": 0,
        "data": {
            "dailyNetInflow": { "value": inflow, "lastUpdateDate": date },
            "totalNetAssets": { "value": 153178171661.534, "lastUpdateDate": date },
            "totalNetAssetsPercentage": { "value": "0.0662007" },
            "cumNetInflow": { "value": 56832895804.558 }
        }
    })
}

async fn current(State(vendor): State<Arc<FakeVendor>>, Json(body): Json<Value>) -> Response {
    vendor.current_calls.fetch_add(1, Ordering::SeqCst);
    match body["type"].as_str() {
        Some("us-btc-spot") => Json(metrics("642350000", "2025-09-12")).into_response(),
        Some("us-eth-spot") => {
            let status = vendor.eth_status.load(Ordering::SeqCst);
            if status != 0 {
                return StatusCode::from_u16(status)
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
                    .into_response();
            }
            Json(metrics("405550000", "2025-09-12")).into_response()
        }
        _ => StatusCode::BAD_REQUEST.into_response(),
    }
}

async fn history(State(vendor): State<Arc<FakeVendor>>) -> Response {
    vendor.history_calls.fetch_add(1, Ordering::SeqCst);
    let status = vendor.history_status.load(Ordering::SeqCst);
    if status != 0 {
        return StatusCode::from_u16(status)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            .into_response();
    }
    Json(json!({
        "code": 0,
        "data": {
            "list": [
                { "date": "2025-09-11", "dailyNetInflow": { "value": "-350000000" } },
                { "date": "2025-09-12", "dailyNetInflow": { "value": "642350000" } }
            ]
        }
    }))
    .into_response()
}

/// Serve the fake vendor on an ephemeral port and return its base URL.
pub async fn spawn_vendor(vendor: Arc<FakeVendor>) -> String {
    let app = Router::new()
        .route("/openapi/v2/etf/currentEtfDataMetrics", post(current))
        .route("/openapi/v2/etf/historyEtfDataMetrics", post(history))
        .route("/health", get(|| async { "ok" }))
        .with_state(vendor);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

pub struct TestApp {
    pub router: Router,
    pub state: Arc<AppState>,
    pub vendor: Arc<FakeVendor>,
    _tmp: TempDir,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let vendor = Arc::new(FakeVendor::default());
        let base_url = spawn_vendor(vendor.clone()).await;
        let tmp = tempfile::tempdir().unwrap();

        let config = Config {
            listen_addr: "127.0.0.1:0".parse().unwrap(),
            db_path: tmp.path().join("etf.db").to_string_lossy().to_string(),
            cors_allow: vec!["*".to_string()],
            request_timeout: Duration::from_secs(10),
            scheduler_enabled: false,
            dashboard: DashboardSettings {
                base_url,
                api_key: "test-key".to_string(),
                api_plan: ApiPlan::Demo,
                ..Default::default()
            },
        };
        let state = build_state(&config).await.unwrap();
        let router = app_router(state.clone(), &config);

        Self {
            router,
            state,
            vendor,
            _tmp: tmp,
        }
    }

    pub async fn request(&self, method: &str, uri: &str) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request("GET", uri).await
    }
}
