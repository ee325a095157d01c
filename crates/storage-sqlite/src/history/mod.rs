//! SQLite storage implementation for persisted ETF metrics.

mod model;
mod repository;

pub use model::{EtfHistoryDB, NewEtfHistoryDB};
pub use repository::EtfHistoryRepository;
