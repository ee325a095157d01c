use std::time::Duration;

use serde::Serialize;

use etfdash_market_data::provider::sosovalue::DEFAULT_BASE_URL;
use etfdash_market_data::ApiPlan;

use crate::constants::{DEFAULT_CACHE_TTL_SECS, DEFAULT_UPDATE_INTERVAL_MINUTES};
use crate::errors::{Error, Result};

/// Runtime settings for the dashboard core.
///
/// The server builds this from the environment; tests build it directly.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSettings {
    pub base_url: String,
    #[serde(skip_serializing)]
    pub api_key: String,
    pub cache_ttl_secs: u64,
    pub api_plan: ApiPlan,
    pub data_update_interval_minutes: u32,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            api_plan: ApiPlan::default(),
            data_update_interval_minutes: DEFAULT_UPDATE_INTERVAL_MINUTES,
        }
    }
}

impl DashboardSettings {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Reject values the services cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(Error::InvalidConfigValue(
                "base URL must not be empty".to_string(),
            ));
        }
        if self.data_update_interval_minutes == 0 {
            return Err(Error::InvalidConfigValue(
                "data update interval must be at least one minute".to_string(),
            ));
        }
        Ok(())
    }
}
