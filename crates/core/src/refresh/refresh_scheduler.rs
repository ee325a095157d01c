use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, DurationRound, TimeDelta, Utc};
use log::{debug, info, warn};
use tokio::task::JoinHandle;

use super::{
    JobKind, RefreshOutcome, RefreshRunner, RefreshTrigger, SchedulerState, SchedulerStatus,
};
use crate::market_hours::MarketHoursPolicy;

struct RegisteredJob {
    kind: JobKind,
    handle: JoinHandle<()>,
}

/// Owns the background refresh jobs.
///
/// `start` and `stop` are idempotent: a second call logs a warning and does
/// nothing, so there is never more than one registration per job.
pub struct RefreshScheduler {
    runner: Arc<RefreshRunner>,
    policy: MarketHoursPolicy,
    update_interval_minutes: u32,
    jobs: Mutex<Vec<RegisteredJob>>,
}

impl RefreshScheduler {
    pub fn new(
        runner: Arc<RefreshRunner>,
        policy: MarketHoursPolicy,
        update_interval_minutes: u32,
    ) -> Self {
        Self {
            runner,
            policy,
            update_interval_minutes,
            jobs: Mutex::new(Vec::new()),
        }
    }

    fn lock_jobs(&self) -> MutexGuard<'_, Vec<RegisteredJob>> {
        self.jobs.lock().unwrap_or_else(|poisoned| {
            warn!("Scheduler mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Register every job. Must be called from within a Tokio runtime.
    ///
    /// Returns false when the scheduler was already running.
    pub fn start(&self) -> bool {
        let mut jobs = self.lock_jobs();
        if !jobs.is_empty() {
            warn!("Refresh scheduler already running");
            return false;
        }

        for kind in JobKind::ALL {
            let handle = tokio::spawn(run_job(kind, self.runner.clone(), self.policy));
            jobs.push(RegisteredJob { kind, handle });
        }
        info!(
            "Refresh scheduler started with {} jobs (market-hours cadence, peak windows, daily reset)",
            jobs.len()
        );
        true
    }

    /// Abort every registered job. Returns false when nothing was running.
    pub fn stop(&self) -> bool {
        let mut jobs = self.lock_jobs();
        if jobs.is_empty() {
            warn!("Refresh scheduler not running");
            return false;
        }

        for job in jobs.drain(..) {
            job.handle.abort();
            debug!("Deregistered {} job", job.kind);
        }
        info!("Refresh scheduler stopped");
        true
    }

    pub fn state(&self) -> SchedulerState {
        if self.lock_jobs().is_empty() {
            SchedulerState::Stopped
        } else {
            SchedulerState::Running
        }
    }

    pub fn registered_jobs(&self) -> Vec<JobKind> {
        self.lock_jobs().iter().map(|job| job.kind).collect()
    }

    pub fn status(&self) -> SchedulerStatus {
        let registered_jobs = self.registered_jobs();
        SchedulerStatus {
            state: if registered_jobs.is_empty() {
                SchedulerState::Stopped
            } else {
                SchedulerState::Running
            },
            registered_jobs,
            update_interval_minutes: self.update_interval_minutes,
            last_run: self.runner.last_run(),
        }
    }

    /// Run one refresh cycle now, subject to the same rate gate as scheduled ticks.
    pub async fn refresh_now(&self, trigger: RefreshTrigger) -> RefreshOutcome {
        self.runner.run(trigger).await
    }
}

impl Drop for RefreshScheduler {
    fn drop(&mut self) {
        for job in self.lock_jobs().drain(..) {
            job.handle.abort();
        }
    }
}

/// Start of the minute following `now`.
fn next_minute_boundary(now: DateTime<Utc>) -> DateTime<Utc> {
    let minute = TimeDelta::minutes(1);
    now.duration_trunc(minute).unwrap_or(now) + minute
}

/// Remembers the last minute a job fired so a wall-clock step back cannot
/// fire it twice for the same minute.
#[derive(Debug, Default)]
struct TickGuard {
    last_fired: Option<DateTime<Utc>>,
}

impl TickGuard {
    /// True when `tick_at` is later than every tick admitted so far.
    fn admit(&mut self, tick_at: DateTime<Utc>) -> bool {
        if self.last_fired.is_some_and(|last| tick_at <= last) {
            return false;
        }
        self.last_fired = Some(tick_at);
        true
    }
}

/// Run `kind` for the minute starting at `tick_at` when the policy says it is due.
async fn fire(
    kind: JobKind,
    runner: &RefreshRunner,
    policy: &MarketHoursPolicy,
    tick_at: DateTime<Utc>,
) -> bool {
    if !kind.is_due(policy, tick_at) {
        return false;
    }

    match kind {
        JobKind::PolicyTick => {
            runner.run(RefreshTrigger::Policy).await;
        }
        JobKind::OpenPeak => {
            runner.run(RefreshTrigger::OpenPeak).await;
        }
        JobKind::ClosePeak => {
            runner.run(RefreshTrigger::ClosePeak).await;
        }
        JobKind::DailyReset => runner.daily_reset(),
    }
    true
}

async fn run_job(kind: JobKind, runner: Arc<RefreshRunner>, policy: MarketHoursPolicy) {
    debug!("{} job registered", kind);
    let mut guard = TickGuard::default();
    loop {
        let now = Utc::now();
        let tick_at = next_minute_boundary(now);
        let wait = (tick_at - now).to_std().unwrap_or_default();
        tokio::time::sleep(wait).await;

        if !guard.admit(tick_at) {
            debug!("{} job already fired for {}, skipping", kind, tick_at);
            continue;
        }
        fire(kind, &runner, &policy, tick_at).await;
    }
}
