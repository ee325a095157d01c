use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::market_hours::{MarketHoursPolicy, PeakWindow};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SchedulerState {
    Stopped,
    Running,
}

/// Background jobs registered by [`RefreshScheduler::start`](super::RefreshScheduler::start).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum JobKind {
    PolicyTick,
    OpenPeak,
    ClosePeak,
    DailyReset,
}

impl JobKind {
    pub const ALL: [JobKind; 4] = [
        JobKind::PolicyTick,
        JobKind::OpenPeak,
        JobKind::ClosePeak,
        JobKind::DailyReset,
    ];

    /// Whether this job fires for the minute starting at `at`.
    pub fn is_due(&self, policy: &MarketHoursPolicy, at: DateTime<Utc>) -> bool {
        match self {
            Self::PolicyTick => policy.is_policy_due(at),
            Self::OpenPeak => policy.is_peak_due(PeakWindow::Open, at),
            Self::ClosePeak => policy.is_peak_due(PeakWindow::Close, at),
            Self::DailyReset => policy.is_daily_reset_due(at),
        }
    }
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PolicyTick => write!(f, "policy-tick"),
            Self::OpenPeak => write!(f, "open-peak"),
            Self::ClosePeak => write!(f, "close-peak"),
            Self::DailyReset => write!(f, "daily-reset"),
        }
    }
}

/// What started a refresh cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RefreshTrigger {
    Policy,
    OpenPeak,
    ClosePeak,
    Manual,
}

impl fmt::Display for RefreshTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Policy => write!(f, "policy"),
            Self::OpenPeak => write!(f, "open peak"),
            Self::ClosePeak => write!(f, "close peak"),
            Self::Manual => write!(f, "manual"),
        }
    }
}

/// Result of one refresh cycle.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum RefreshOutcome {
    Completed {
        #[serde(rename = "dataDate")]
        data_date: NaiveDate,
        /// Records that failed to persist; the refresh itself still counts.
        #[serde(rename = "unsavedRecords")]
        unsaved_records: usize,
    },
    /// The rate budget could not cover the cycle; nothing was touched.
    Skipped { reason: String },
    Failed { message: String },
}

impl RefreshOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped { .. })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LastRun {
    pub trigger: RefreshTrigger,
    pub at: DateTime<Utc>,
    pub outcome: RefreshOutcome,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulerStatus {
    pub state: SchedulerState,
    pub registered_jobs: Vec<JobKind>,
    pub update_interval_minutes: u32,
    pub last_run: Option<LastRun>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn et(d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 9, d, h, min, 0).unwrap() + Duration::hours(5)
    }

    #[test]
    fn test_job_due_times() {
        let policy = MarketHoursPolicy::default();
        // Wednesday 09:30 exchange time: regular session, open peak window
        let at = et(10, 9, 30);
        assert!(JobKind::PolicyTick.is_due(&policy, at));
        assert!(JobKind::OpenPeak.is_due(&policy, at));
        assert!(!JobKind::ClosePeak.is_due(&policy, at));
        assert!(!JobKind::DailyReset.is_due(&policy, at));

        assert!(JobKind::DailyReset.is_due(&policy, et(10, 17, 0)));
        assert!(JobKind::ClosePeak.is_due(&policy, et(10, 15, 2)));
    }

    #[test]
    fn test_outcome_serializes_with_status_tag() {
        let outcome = RefreshOutcome::Skipped {
            reason: "rate limited".to_string(),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "skipped");
        assert_eq!(json["reason"], "rate limited");

        let outcome = RefreshOutcome::Completed {
            data_date: NaiveDate::from_ymd_opt(2025, 9, 12).unwrap(),
            unsaved_records: 0,
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "completed");
        assert_eq!(json["dataDate"], "2025-09-12");
    }
}
