//! SQLite storage implementation for the ETF dashboard.
//!
//! This crate is the only place where Diesel dependencies exist. It provides
//! connection pooling, embedded migrations and the Diesel-backed
//! implementation of the history-store trait defined in `etfdash-core`.
//!
//! ```text
//!   core (MetricHistoryStore)
//!            │
//!            ▼
//!   storage-sqlite (this crate)
//!            │
//!            ▼
//!        SQLite DB
//! ```

pub mod db;
pub mod errors;
pub mod history;
pub mod schema;

// Re-export database utilities
pub use db::{create_pool, get_connection, init, open, run_migrations, DbConnection, DbPool};

pub use errors::StorageError;
pub use history::EtfHistoryRepository;
