//! Market hours module - session classification that drives refresh cadence.

mod market_hours_model;
mod market_hours_policy;

pub use market_hours_model::{MarketPhase, PeakWindow, SessionClassification};
pub use market_hours_policy::MarketHoursPolicy;
