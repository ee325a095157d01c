/// Seconds a cached vendor response stays fresh
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;

/// Nominal refresh cadence reported in scheduler status
pub const DEFAULT_UPDATE_INTERVAL_MINUTES: u32 = 5;

/// Default history window requested by the dashboard
pub const DEFAULT_HISTORY_DAYS: u32 = 30;

/// Longest history window accepted from callers
pub const MAX_HISTORY_DAYS: u32 = 365;

/// Rate units one refresh consumes (one call per ETF family)
pub const REFRESH_COST: u32 = 2;
