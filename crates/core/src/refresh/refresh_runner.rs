//! One refresh cycle and the daily reset.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use log::{debug, error, info, warn};

use etfdash_market_data::{EtfSymbol, RateGovernor};

use super::{LastRun, RefreshOutcome, RefreshTrigger};
use crate::constants::REFRESH_COST;
use crate::etf::EtfServiceTrait;
use crate::history::MetricHistoryStore;

/// Runs refresh cycles on behalf of the scheduler and manual callers.
pub struct RefreshRunner {
    etf_service: Arc<dyn EtfServiceTrait>,
    governor: Arc<RateGovernor>,
    history_store: Arc<dyn MetricHistoryStore>,
    last_run: Mutex<Option<LastRun>>,
}

impl RefreshRunner {
    pub fn new(
        etf_service: Arc<dyn EtfServiceTrait>,
        governor: Arc<RateGovernor>,
        history_store: Arc<dyn MetricHistoryStore>,
    ) -> Self {
        Self {
            etf_service,
            governor,
            history_store,
            last_run: Mutex::new(None),
        }
    }

    fn lock_last_run(&self) -> MutexGuard<'_, Option<LastRun>> {
        self.last_run.lock().unwrap_or_else(|poisoned| {
            warn!("Refresh status mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    pub fn last_run(&self) -> Option<LastRun> {
        self.lock_last_run().clone()
    }

    /// Run one refresh cycle.
    ///
    /// A denied rate permit skips the cycle before the cache or the vendor is
    /// touched. Otherwise the cache is cleared, both symbols are fetched and
    /// the records are persisted; persistence errors are logged only.
    pub async fn run(&self, trigger: RefreshTrigger) -> RefreshOutcome {
        let outcome = self.run_cycle(trigger).await;
        *self.lock_last_run() = Some(LastRun {
            trigger,
            at: Utc::now(),
            outcome: outcome.clone(),
        });
        outcome
    }

    async fn run_cycle(&self, trigger: RefreshTrigger) -> RefreshOutcome {
        if !self.governor.try_acquire(REFRESH_COST).is_granted() {
            let state = self.governor.state();
            debug!(
                "Skipping {} refresh: rate budget spent ({}/{})",
                trigger, state.used, state.ceiling
            );
            return RefreshOutcome::Skipped {
                reason: "rate limited".to_string(),
            };
        }

        info!(
            "Refresh started ({}), {} unit(s) left this minute",
            trigger,
            self.governor.remaining()
        );
        self.etf_service.clear_cache();

        let snapshot = match self.etf_service.fetch_all().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                error!("Refresh ({}) failed: {}", trigger, e);
                return RefreshOutcome::Failed {
                    message: e.to_string(),
                };
            }
        };

        let (btc_saved, eth_saved) = futures::join!(
            self.history_store.save(EtfSymbol::Btc, &snapshot.btc),
            self.history_store.save(EtfSymbol::Eth, &snapshot.eth)
        );
        let mut unsaved_records = 0;
        for (symbol, saved) in [(EtfSymbol::Btc, btc_saved), (EtfSymbol::Eth, eth_saved)] {
            if let Err(e) = saved {
                warn!("Failed to persist {} record: {}", symbol, e);
                unsaved_records += 1;
            }
        }

        info!(
            "Refresh ({}) completed: BTC {:.0} / ETH {:.0} for {}",
            trigger, snapshot.btc.daily_inflow, snapshot.eth.daily_inflow, snapshot.data_date
        );
        RefreshOutcome::Completed {
            data_date: snapshot.data_date,
            unsaved_records,
        }
    }

    /// Clear the cache and restore the full rate budget.
    pub fn daily_reset(&self) {
        self.etf_service.clear_cache();
        self.governor.reset();
        info!("Daily reset completed: cache cleared, rate budget restored");
    }
}
