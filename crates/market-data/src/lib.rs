//! ETF Dashboard Market Data Crate
//!
//! This crate talks to the upstream ETF flow vendor and defines the records
//! the rest of the dashboard works with.
//!
//! # Overview
//!
//! The market data crate provides:
//! - Strongly typed ETF families ([`EtfSymbol`]) and records ([`MetricRecord`], [`HistoryPoint`])
//! - Defensive normalisation of partial vendor payloads ([`PartialMetricRecord`])
//! - The [`EtfDataProvider`] trait and the SoSoValue client
//! - A built-in fallback history series for degraded mode
//! - A fixed-window [`RateGovernor`] sized by the vendor [`ApiPlan`]
//!
//! # Architecture
//!
//! ```text
//! +------------------+     +------------------+
//! |   RateGovernor   |     | EtfDataProvider  |  (SoSoValue)
//! +------------------+     +------------------+
//!          ^                        |
//!          | gate                   v
//!   (scheduler in core)    +--------------------+
//!                          | PartialMetricRecord|  (vendor projection)
//!                          +--------------------+
//!                                   |
//!                                   v
//!                          +------------------+
//!                          |   MetricRecord   |
//!                          +------------------+
//! ```

pub mod errors;
pub mod models;
pub mod provider;
pub mod rate_limit;

pub use errors::MarketDataError;

// Re-export all public types from models
pub use models::{
    EtfSymbol, FlowDirection, FlowTrend, HistoryPoint, MetricRecord, PartialMetricRecord,
};

// Re-export provider types
pub use provider::fallback::fallback_history;
pub use provider::sosovalue::SosoValueProvider;
pub use provider::{EtfDataProvider, HealthState, ProviderHealth};

// Re-export rate limiting types
pub use rate_limit::{ApiPlan, GovernorState, Permit, PlanLimits, RateGovernor};
