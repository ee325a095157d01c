//! Exchange-hours policy.
//!
//! Local time is derived with a fixed UTC offset. Daylight saving time is not
//! applied, so during DST every boundary lands one hour late in real New York
//! time.

use chrono::{DateTime, Datelike, Duration, NaiveDateTime, Timelike, Utc, Weekday};

use super::{MarketPhase, PeakWindow, SessionClassification};

/// US Eastern standard time, UTC-5.
const DEFAULT_EXCHANGE_OFFSET_SECS: i64 = -5 * 3600;

const EXTENDED_OPEN: u32 = 7 * 60;
const REGULAR_OPEN: u32 = 9 * 60 + 30;
const REGULAR_CLOSE: u32 = 16 * 60;
const EXTENDED_CLOSE: u32 = 20 * 60;

/// Exchange-local hour when the cache and rate budget are reset each day.
const DAILY_RESET_HOUR: u32 = 17;

/// Pure functions of wall-clock time; holds no state besides the offset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MarketHoursPolicy {
    offset_secs: i64,
}

impl Default for MarketHoursPolicy {
    fn default() -> Self {
        Self::with_offset_secs(DEFAULT_EXCHANGE_OFFSET_SECS)
    }
}

impl MarketHoursPolicy {
    pub fn with_offset_secs(offset_secs: i64) -> Self {
        Self { offset_secs }
    }

    /// Wall-clock time at the exchange.
    pub fn exchange_time(&self, now: DateTime<Utc>) -> NaiveDateTime {
        (now + Duration::seconds(self.offset_secs)).naive_utc()
    }

    pub fn is_trading_day(&self, now: DateTime<Utc>) -> bool {
        !matches!(
            self.exchange_time(now).weekday(),
            Weekday::Sat | Weekday::Sun
        )
    }

    pub fn classify(&self, now: DateTime<Utc>) -> SessionClassification {
        if !self.is_trading_day(now) {
            return MarketPhase::Closed.into();
        }

        let local = self.exchange_time(now);
        let minute_of_day = local.hour() * 60 + local.minute();

        let phase = if (REGULAR_OPEN..REGULAR_CLOSE).contains(&minute_of_day) {
            MarketPhase::Regular
        } else if (EXTENDED_OPEN..REGULAR_OPEN).contains(&minute_of_day)
            || (REGULAR_CLOSE..EXTENDED_CLOSE).contains(&minute_of_day)
        {
            MarketPhase::Extended
        } else {
            MarketPhase::Closed
        };
        phase.into()
    }

    /// Whether the per-minute policy tick should refresh at `now`.
    pub fn is_policy_due(&self, now: DateTime<Utc>) -> bool {
        let interval = self.classify(now).interval_minutes;
        self.exchange_time(now).minute() % interval == 0
    }

    /// Whether a peak ticker fires at `now`: trading day, inside the window, even minute.
    pub fn is_peak_due(&self, window: PeakWindow, now: DateTime<Utc>) -> bool {
        if !self.is_trading_day(now) {
            return false;
        }
        let local = self.exchange_time(now);
        let (first, last) = window.hours();
        (first..=last).contains(&local.hour()) && local.minute() % 2 == 0
    }

    pub fn is_daily_reset_due(&self, now: DateTime<Utc>) -> bool {
        let local = self.exchange_time(now);
        local.hour() == DAILY_RESET_HOUR && local.minute() == 0
    }
}
