//! Refresh module - scheduled and manual refresh cycles.
//!
//! The scheduler owns four cooperative jobs that wake on minute boundaries:
//! the policy tick, the open and close peak tickers, and the daily reset.
//! Every refresh goes through the same runner, which gates on the rate
//! governor before touching the cache or the vendor.

mod refresh_model;
mod refresh_runner;
mod refresh_scheduler;

pub use refresh_model::{
    JobKind, LastRun, RefreshOutcome, RefreshTrigger, SchedulerState, SchedulerStatus,
};
pub use refresh_runner::RefreshRunner;
pub use refresh_scheduler::RefreshScheduler;
