//! ETF module - the aggregator that serves dashboard snapshots and history.

mod etf_model;
mod etf_service;
mod etf_traits;


pub use etf_model::{HistorySeries, HistorySource, Snapshot};
pub use etf_service::EtfService;
pub use etf_traits::EtfServiceTrait;
