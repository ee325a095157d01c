mod common;

use std::sync::atomic::Ordering;

use axum::http::StatusCode;
use common::TestApp;
use etfdash_core::refresh::RefreshTrigger;

#[tokio::test]
async fn current_within_ttl_calls_vendor_once_per_symbol() {
    let app = TestApp::spawn().await;

    let (status, first) = app.get("/api/etf/current").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["success"], true);
    assert_eq!(first["data"]["btc"]["dailyInflow"], 642_350_000.0);
    assert_eq!(first["data"]["btc"]["trend"], "up");
    assert_eq!(first["data"]["eth"]["symbol"], "ETH");
    assert_eq!(first["data"]["dataDate"], "2025-09-12");
    assert!(first["data"]["aiInsight"]
        .as_str()
        .unwrap()
        .contains("net inflow"));

    let (status, second) = app.get("/api/etf/current").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["data"]["btc"], first["data"]["btc"]);

    assert_eq!(app.vendor.current_calls(), 2);
}

#[tokio::test]
async fn current_fails_when_one_symbol_fails_without_cache() {
    let app = TestApp::spawn().await;
    app.vendor.eth_status.store(500, Ordering::SeqCst);

    let (status, body) = app.get("/api/etf/current").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Failed to fetch ETF data");
    assert!(body["message"].as_str().unwrap().contains("500"));

    // BTC succeeded and stays cached on its own
    assert_eq!(app.state.context.status().cache_size, 1);
}

#[tokio::test]
async fn refresh_bypasses_fresh_cache() {
    let app = TestApp::spawn().await;

    app.get("/api/etf/current").await;
    let (status, body) = app.request("POST", "/api/etf/refresh").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Data refreshed");
    assert_eq!(app.vendor.current_calls(), 4);
}

#[tokio::test]
async fn history_for_one_symbol_from_vendor() {
    let app = TestApp::spawn().await;

    let (status, body) = app.get("/api/etf/history?symbol=btc&days=7").await;
    assert_eq!(status, StatusCode::OK);
    let data = body["data"].as_object().unwrap();
    assert_eq!(data.len(), 1);
    let btc = &data["btc"];
    assert_eq!(btc["symbol"], "BTC");
    assert_eq!(btc["days"], 7);
    assert_eq!(btc["source"], "upstream");
    let points = btc["points"].as_array().unwrap();
    assert_eq!(points.len(), 2);
    assert_eq!(points[0]["date"], "2025-09-12");
    assert_eq!(points[1]["direction"], "outflow");

    app.get("/api/etf/history?symbol=btc&days=7").await;
    assert_eq!(app.vendor.history_calls(), 1);
}

#[tokio::test]
async fn history_degrades_to_fallback_series() {
    let app = TestApp::spawn().await;
    app.vendor.history_status.store(503, Ordering::SeqCst);

    let (status, body) = app.get("/api/etf/history").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["btc"]["source"], "fallback");
    assert_eq!(body["data"]["eth"]["source"], "fallback");
    assert!(!body["data"]["eth"]["points"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn bad_input_is_rejected() {
    let app = TestApp::spawn().await;

    let (status, body) = app.get("/api/etf/history?symbol=doge").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (status, body) = app.get("/api/etf/history?days=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("days"));

    let (status, _) = app.get("/api/etf/records?limit=many").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(app.vendor.history_calls(), 0);
}

#[tokio::test]
async fn records_lists_rows_saved_by_refresh_cycle() {
    let app = TestApp::spawn().await;

    let (_, empty) = app.get("/api/etf/records?symbol=btc").await;
    assert_eq!(empty["data"].as_object().unwrap().len(), 1);
    assert!(empty["data"]["btc"].as_array().unwrap().is_empty());

    let outcome = app
        .state
        .context
        .scheduler()
        .refresh_now(RefreshTrigger::Manual)
        .await;
    assert!(outcome.is_completed());

    let (status, body) = app.get("/api/etf/records").await;
    assert_eq!(status, StatusCode::OK);
    let btc = body["data"]["btc"].as_array().unwrap();
    assert_eq!(btc.len(), 1);
    assert_eq!(btc[0]["date"], "2025-09-12");
    assert_eq!(btc[0]["dailyInflow"], 642_350_000.0);
    assert_eq!(body["data"]["eth"].as_array().unwrap().len(), 1);

    let (_, eth_only) = app.get("/api/etf/records?symbol=ETH&limit=5").await;
    let data = eth_only["data"].as_object().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data["eth"][0]["symbol"], "ETH");
}

#[tokio::test]
async fn status_reports_cache_governor_and_vendor() {
    let app = TestApp::spawn().await;
    app.get("/api/etf/current").await;

    let (status, body) = app.get("/api/etf/status").await;
    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["vendor"]["status"], "healthy");
    assert_eq!(data["cacheSize"], 2);
    assert_eq!(data["cacheTtlSecs"], 300);
    assert_eq!(data["rateGovernor"]["plan"], "DEMO");
    assert_eq!(data["rateGovernor"]["ceiling"], 20);
    assert_eq!(data["scheduler"]["state"], "stopped");
    assert!(data["uptimeSecs"].is_u64());
}
