//! Cache module - TTL cache keyed by request fingerprint.

mod cache_store;
mod fingerprint;

pub use cache_store::CacheStore;
pub use fingerprint::Fingerprint;
