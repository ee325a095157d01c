//! Insight module - short market commentary rendered from a snapshot.

mod insight_template;

pub use insight_template::generate_insight;
