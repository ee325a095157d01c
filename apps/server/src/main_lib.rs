use std::sync::Arc;
use std::time::Instant;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use etfdash_core::DashboardContext;
use etfdash_storage_sqlite::{db, EtfHistoryRepository};

use crate::config::Config;

pub struct AppState {
    pub context: DashboardContext,
    pub started_at: Instant,
}

impl AppState {
    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

/// Install the global subscriber. `log` records from the library crates are
/// bridged in through the subscriber's `tracing-log` integration.
pub fn init_tracing() {
    let log_format = std::env::var("ETF_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let pool = db::open(&config.db_path)?;
    tracing::info!("Database path in use: {}", config.db_path);

    let history_store = Arc::new(EtfHistoryRepository::new(pool));
    let context = DashboardContext::from_settings(config.dashboard.clone(), history_store)?;
    tracing::info!(
        "Dashboard ready: plan {}, cache TTL {}s, update interval {} min",
        config.dashboard.api_plan,
        config.dashboard.cache_ttl_secs,
        config.dashboard.data_update_interval_minutes
    );

    Ok(Arc::new(AppState {
        context,
        started_at: Instant::now(),
    }))
}
