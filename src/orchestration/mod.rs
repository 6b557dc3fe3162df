//! Batch orchestration: deduplicated fetching and per-position resolution.

pub mod aggregator;

pub use aggregator::Aggregator;
