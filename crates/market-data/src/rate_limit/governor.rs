//! Fixed-window rate governor for the upstream vendor.
//!
//! Counts cost units spent inside the current 60-second bucket against the
//! plan ceiling. The bucket resets once it is older than the window, which is
//! a reset clock rather than a sliding window.

use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use serde::Serialize;

use super::ApiPlan;

/// Length of one rate bucket.
const WINDOW: Duration = Duration::from_secs(60);

/// Outcome of [`RateGovernor::try_acquire`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Permit {
    Granted,
    Denied,
}

impl Permit {
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted)
    }
}

/// Calls counted inside one bucket.
#[derive(Debug)]
struct RateWindow {
    /// Cost units consumed in this bucket.
    count: u32,
    /// When the bucket started.
    started_at: Instant,
}

impl RateWindow {
    fn new() -> Self {
        Self {
            count: 0,
            started_at: Instant::now(),
        }
    }

    /// Start a fresh bucket if the current one has aged past the window.
    fn roll(&mut self, window: Duration) {
        if self.started_at.elapsed() > window {
            self.count = 0;
            self.started_at = Instant::now();
        }
    }
}

/// Point-in-time view of the governor for status reporting.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GovernorState {
    pub plan: ApiPlan,
    pub used: u32,
    pub ceiling: u32,
    pub remaining: u32,
    pub window_age_secs: u64,
    pub exhausted: bool,
}

/// Per-minute call budget shared by every refresh path.
pub struct RateGovernor {
    plan: ApiPlan,
    ceiling: u32,
    window_len: Duration,
    window: Mutex<RateWindow>,
}

impl RateGovernor {
    /// Create a governor using the plan's per-minute ceiling.
    pub fn new(plan: ApiPlan) -> Self {
        Self {
            plan,
            ceiling: plan.limits().per_minute,
            window_len: WINDOW,
            window: Mutex::new(RateWindow::new()),
        }
    }

    /// Lock the window mutex, recovering from poison if necessary.
    ///
    /// A poisoned counter can at worst admit or skip one extra refresh.
    fn lock_window(&self) -> MutexGuard<'_, RateWindow> {
        self.window.lock().unwrap_or_else(|poisoned| {
            warn!("Rate governor mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    pub fn plan(&self) -> ApiPlan {
        self.plan
    }

    pub fn ceiling(&self) -> u32 {
        self.ceiling
    }

    /// Try to spend `cost` units from the current bucket.
    ///
    /// Granted only if the spend keeps the bucket at or under the ceiling;
    /// a denial leaves the counter untouched.
    pub fn try_acquire(&self, cost: u32) -> Permit {
        let mut window = self.lock_window();
        window.roll(self.window_len);

        match window.count.checked_add(cost) {
            Some(next) if next <= self.ceiling => {
                window.count = next;
                debug!(
                    "Rate governor: granted {} unit(s) ({}/{})",
                    cost, window.count, self.ceiling
                );
                Permit::Granted
            }
            _ => {
                debug!(
                    "Rate governor: denied {} unit(s) ({}/{} used)",
                    cost, window.count, self.ceiling
                );
                Permit::Denied
            }
        }
    }

    /// Mark the current bucket as spent after the vendor answered 429.
    ///
    /// The vendor's signal wins over the local estimate until the bucket rolls.
    pub fn force_exhausted(&self) {
        let mut window = self.lock_window();
        window.roll(self.window_len);
        window.count = self.ceiling;
        warn!(
            "Rate governor: vendor rate limit hit, budget exhausted for the rest of the window ({}/{})",
            window.count, self.ceiling
        );
    }

    /// Start a fresh bucket immediately.
    pub fn reset(&self) {
        let mut window = self.lock_window();
        *window = RateWindow::new();
        info!("Rate governor: window reset");
    }

    /// Units remaining in the current bucket.
    pub fn remaining(&self) -> u32 {
        let mut window = self.lock_window();
        window.roll(self.window_len);
        self.ceiling.saturating_sub(window.count)
    }

    pub fn state(&self) -> GovernorState {
        let mut window = self.lock_window();
        window.roll(self.window_len);
        let remaining = self.ceiling.saturating_sub(window.count);
        GovernorState {
            plan: self.plan,
            used: window.count,
            ceiling: self.ceiling,
            remaining,
            window_age_secs: window.started_at.elapsed().as_secs(),
            exhausted: remaining == 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Push the bucket start back so the next call sees it as expired.
    fn age_window(governor: &RateGovernor, by: Duration) {
        let mut window = governor.lock_window();
        window.started_at = Instant::now() - by;
    }

    #[test]
    fn test_ceiling_grants_then_denies() {
        let governor = RateGovernor::new(ApiPlan::Demo);

        for _ in 0..20 {
            assert_eq!(governor.try_acquire(1), Permit::Granted);
        }

        assert_eq!(governor.try_acquire(1), Permit::Denied);
        assert_eq!(governor.remaining(), 0);
    }

    #[test]
    fn test_denial_leaves_counter_unchanged() {
        let governor = RateGovernor::new(ApiPlan::Demo);
        for _ in 0..9 {
            assert!(governor.try_acquire(2).is_granted());
        }
        assert_eq!(governor.state().used, 18);

        // 18 + 4 would overshoot the ceiling of 20
        assert_eq!(governor.try_acquire(4), Permit::Denied);
        assert_eq!(governor.state().used, 18);

        assert_eq!(governor.try_acquire(2), Permit::Granted);
        assert_eq!(governor.state().used, 20);
    }

    #[test]
    fn test_bucket_resets_after_window() {
        let governor = RateGovernor::new(ApiPlan::Demo);
        for _ in 0..20 {
            governor.try_acquire(1);
        }
        assert_eq!(governor.try_acquire(1), Permit::Denied);

        age_window(&governor, Duration::from_secs(61));

        assert_eq!(governor.try_acquire(1), Permit::Granted);
        assert_eq!(governor.state().used, 1);
    }

    #[test]
    fn test_bucket_does_not_reset_inside_window() {
        let governor = RateGovernor::new(ApiPlan::Demo);
        for _ in 0..20 {
            governor.try_acquire(1);
        }

        age_window(&governor, Duration::from_secs(59));

        assert_eq!(governor.try_acquire(1), Permit::Denied);
    }

    #[test]
    fn test_force_exhausted_blocks_rest_of_window() {
        let governor = RateGovernor::new(ApiPlan::Pro);
        assert!(governor.try_acquire(2).is_granted());

        governor.force_exhausted();

        let state = governor.state();
        assert!(state.exhausted);
        assert_eq!(state.used, 60);
        assert_eq!(governor.try_acquire(1), Permit::Denied);

        age_window(&governor, Duration::from_secs(61));
        assert_eq!(governor.try_acquire(2), Permit::Granted);
    }

    #[test]
    fn test_reset_restores_full_budget() {
        let governor = RateGovernor::new(ApiPlan::Demo);
        governor.force_exhausted();
        assert_eq!(governor.remaining(), 0);

        governor.reset();

        assert_eq!(governor.remaining(), 20);
        assert!(governor.try_acquire(2).is_granted());
    }

    #[test]
    fn test_state_reports_plan() {
        let governor = RateGovernor::new(ApiPlan::Pro);
        governor.try_acquire(3);

        let state = governor.state();
        assert_eq!(state.plan, ApiPlan::Pro);
        assert_eq!(state.ceiling, 60);
        assert_eq!(state.used, 3);
        assert_eq!(state.remaining, 57);
        assert!(!state.exhausted);
    }
}
