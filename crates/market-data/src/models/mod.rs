//! Market data models
//!
//! This module contains the core data types for ETF flow data:
//! - `types` - The supported ETF families (EtfSymbol)
//! - `metric` - Current metrics (MetricRecord) and its partial vendor projection
//! - `history` - Daily flow points (HistoryPoint, FlowDirection)

mod history;
mod metric;
mod types;

pub use history::{FlowDirection, HistoryPoint};
pub use metric::{FlowTrend, MetricRecord, PartialMetricRecord};
pub use types::EtfSymbol;
