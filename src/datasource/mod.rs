//! Data source abstraction over the upstream position/pool/market/token API.

use crate::domain::{Market, Pool, RawPosition, TokenMeta};
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

pub mod mock;
pub mod tuna;

pub use mock::MockSource;
pub use tuna::TunaApiSource;

/// Read-only access to the four upstream entity endpoints.
///
/// Implementations own retry/backoff; callers own caching and dedup.
#[async_trait]
pub trait DataSource: Send + Sync + fmt::Debug {
    /// Fetch one pool's current state by address.
    async fn fetch_pool(&self, address: &str) -> Result<Pool, DataSourceError>;

    /// Fetch the full market dataset (one entry per lending pool).
    async fn fetch_markets(&self) -> Result<Vec<Market>, DataSourceError>;

    /// Fetch metadata for one token mint.
    async fn fetch_token(&self, mint: &str) -> Result<TokenMeta, DataSourceError>;

    /// Fetch a wallet's raw positions. Always live, never cached.
    async fn fetch_positions(&self, wallet: &str) -> Result<Vec<RawPosition>, DataSourceError>;
}

/// Error type for data source operations.
#[derive(Debug, Clone, Error)]
pub enum DataSourceError {
    /// Network error (connection timeout, DNS failure).
    #[error("Network error: {0}")]
    NetworkError(String),
    /// Non-2xx HTTP response.
    #[error("HTTP error {status}: {message}")]
    HttpError { status: u16, message: String },
    /// Invalid JSON or a malformed response body.
    #[error("Parse error: {0}")]
    ParseError(String),
    /// Rate limit exceeded.
    #[error("Rate limited")]
    RateLimited,
}
