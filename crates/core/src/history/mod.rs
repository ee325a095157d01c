//! History module - persisted daily metric rows written by scheduled refreshes.

mod history_model;
mod history_store;
mod history_traits;

pub use history_model::HistoryRecord;
pub use history_store::{MockMetricHistoryStore, NoOpMetricHistoryStore};
pub use history_traits::MetricHistoryStore;
