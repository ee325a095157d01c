//! Process-level context that owns the dashboard services.
//!
//! Built once at startup and shared by reference with the scheduler and the
//! HTTP layer.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;

use etfdash_market_data::{EtfDataProvider, GovernorState, RateGovernor, SosoValueProvider};

use crate::errors::Result;
use crate::etf::{EtfService, EtfServiceTrait};
use crate::history::MetricHistoryStore;
use crate::market_hours::{MarketHoursPolicy, SessionClassification};
use crate::refresh::{RefreshRunner, RefreshScheduler, SchedulerStatus};
use crate::settings::DashboardSettings;

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStatus {
    pub cache_size: usize,
    pub cache_ttl_secs: u64,
    pub rate_governor: GovernorState,
    pub scheduler: SchedulerStatus,
    pub market_session: SessionClassification,
}

pub struct DashboardContext {
    settings: DashboardSettings,
    governor: Arc<RateGovernor>,
    etf_service: Arc<dyn EtfServiceTrait>,
    history_store: Arc<dyn MetricHistoryStore>,
    scheduler: Arc<RefreshScheduler>,
    policy: MarketHoursPolicy,
}

impl DashboardContext {
    /// Wire the services around the SoSoValue provider.
    pub fn from_settings(
        settings: DashboardSettings,
        history_store: Arc<dyn MetricHistoryStore>,
    ) -> Result<Self> {
        let provider = Arc::new(SosoValueProvider::new(
            settings.base_url.clone(),
            settings.api_key.clone(),
        ));
        Self::new(settings, provider, history_store)
    }

    pub fn new(
        settings: DashboardSettings,
        provider: Arc<dyn EtfDataProvider>,
        history_store: Arc<dyn MetricHistoryStore>,
    ) -> Result<Self> {
        settings.validate()?;

        let policy = MarketHoursPolicy::default();
        let governor = Arc::new(RateGovernor::new(settings.api_plan));
        let etf_service: Arc<dyn EtfServiceTrait> = Arc::new(EtfService::new(
            provider,
            governor.clone(),
            settings.cache_ttl(),
        ));
        let runner = Arc::new(RefreshRunner::new(
            etf_service.clone(),
            governor.clone(),
            history_store.clone(),
        ));
        let scheduler = Arc::new(RefreshScheduler::new(
            runner,
            policy,
            settings.data_update_interval_minutes,
        ));

        Ok(Self {
            settings,
            governor,
            etf_service,
            history_store,
            scheduler,
            policy,
        })
    }

    pub fn settings(&self) -> &DashboardSettings {
        &self.settings
    }

    pub fn governor(&self) -> Arc<RateGovernor> {
        self.governor.clone()
    }

    pub fn etf_service(&self) -> Arc<dyn EtfServiceTrait> {
        self.etf_service.clone()
    }

    pub fn history_store(&self) -> Arc<dyn MetricHistoryStore> {
        self.history_store.clone()
    }

    pub fn scheduler(&self) -> Arc<RefreshScheduler> {
        self.scheduler.clone()
    }

    pub fn status(&self) -> DashboardStatus {
        DashboardStatus {
            cache_size: self.etf_service.cache_size(),
            cache_ttl_secs: self.etf_service.cache_ttl().as_secs(),
            rate_governor: self.governor.state(),
            scheduler: self.scheduler.status(),
            market_session: self.policy.classify(Utc::now()),
        }
    }
}
