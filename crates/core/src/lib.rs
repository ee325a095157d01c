//! ETF Dashboard Core - caching, scheduling and aggregation services.
//!
//! This crate sits between the vendor client in `etfdash-market-data` and the
//! HTTP server. It is database-agnostic and defines the history-store trait
//! implemented by the `storage-sqlite` crate.

pub mod cache;
pub mod constants;
pub mod context;
pub mod errors;
pub mod etf;
pub mod history;
pub mod insight;
pub mod market_hours;
pub mod refresh;
pub mod settings;

#[cfg(test)]
mod test_support;

pub use context::{DashboardContext, DashboardStatus};

// Re-export error types
pub use errors::Error;
pub use errors::Result;
