//! ETF data provider abstractions and implementations.
//!
//! This module contains:
//! - The `EtfDataProvider` trait the aggregator depends on
//! - Provider health reporting
//! - The SoSoValue client
//! - A built-in fallback history series for degraded mode

mod health;
mod traits;

pub mod fallback;
pub mod sosovalue;

// Re-exports
pub use health::{HealthState, ProviderHealth};
pub use traits::EtfDataProvider;
