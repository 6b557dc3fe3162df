//! Error taxonomy for the aggregation pipeline.
//!
//! The split encodes the degrade-vs-abort policy in types: a
//! [`PositionError`] affects exactly one position, which the aggregator
//! replaces with the empty template; an [`AggregationError`] rejects the
//! whole batch.

use crate::datasource::DataSourceError;
use thiserror::Error;

/// A failure scoped to a single position. Never aborts the batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PositionError {
    #[error("malformed position input: {0}")]
    MalformedInput(&'static str),
    #[error("no market entry for pool {0}")]
    MissingMarket(String),
    #[error("degenerate arithmetic: {0}")]
    Degenerate(&'static str),
}

/// A failure that rejects the whole aggregation call.
///
/// Pool and market fetches are fatal; token fetches never surface here
/// because they degrade to placeholder metadata at the fetch boundary.
#[derive(Debug, Error)]
pub enum AggregationError {
    #[error(transparent)]
    Upstream(#[from] DataSourceError),
}
