use std::{net::SocketAddr, time::Duration};

use anyhow::{anyhow, Context};
use etfdash_core::settings::DashboardSettings;
use etfdash_market_data::ApiPlan;

pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub scheduler_enabled: bool,
    pub dashboard: DashboardSettings,
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T>(key: &str, default: &str) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = env_or(key, default);
    raw.trim()
        .parse::<T>()
        .map_err(|e| anyhow!("Invalid {} '{}': {}", key, raw, e))
}

fn parse_bool(key: &str, default: bool) -> anyhow::Result<bool> {
    match std::env::var(key) {
        Err(_) => Ok(default),
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(anyhow!("Invalid {} '{}': expected true or false", key, raw)),
        },
    }
}

impl Config {
    /// Load configuration from the process environment and an optional `.env` file.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let defaults = DashboardSettings::default();
        let listen_addr: SocketAddr = parse_env("ETF_LISTEN_ADDR", "0.0.0.0:3001")?;
        let db_path = env_or("ETF_DB_PATH", "./data/etf-dashboard.db");
        let cors_allow = env_or("ETF_CORS_ALLOW_ORIGINS", "*")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = parse_env("ETF_REQUEST_TIMEOUT_MS", "30000")?;
        let scheduler_enabled = parse_bool("ETF_SCHEDULER_ENABLED", true)?;

        let api_plan: ApiPlan = parse_env("API_PLAN", defaults.api_plan.as_str())?;
        let cache_ttl_secs: u64 =
            parse_env("CACHE_TTL", &defaults.cache_ttl_secs.to_string())?;
        let data_update_interval_minutes: u32 = parse_env(
            "DATA_UPDATE_INTERVAL",
            &defaults.data_update_interval_minutes.to_string(),
        )?;

        let dashboard = DashboardSettings {
            base_url: env_or("SOSO_BASE_URL", &defaults.base_url),
            api_key: env_or("SOSO_API_KEY", ""),
            cache_ttl_secs,
            api_plan,
            data_update_interval_minutes,
        };
        dashboard
            .validate()
            .context("Invalid dashboard configuration")?;

        Ok(Self {
            listen_addr,
            db_path,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            scheduler_enabled,
            dashboard,
        })
    }
}
