//! Mock data source for testing without network calls.
//!
//! Records per-entity fetch counts so dedup invariants are directly
//! assertable, and supports per-key failure injection for exercising the
//! abort-vs-degrade policies.

use super::{DataSource, DataSourceError};
use crate::domain::{Market, Pool, RawPosition, TokenMeta};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Mock data source that serves predefined fixtures.
#[derive(Debug, Default)]
pub struct MockSource {
    pools: HashMap<String, Pool>,
    markets: Vec<Market>,
    tokens: HashMap<String, TokenMeta>,
    positions: HashMap<String, Vec<RawPosition>>,
    failing_pools: HashSet<String>,
    failing_tokens: HashSet<String>,
    fail_markets: bool,
    pool_fetches: Mutex<Vec<String>>,
    token_fetches: Mutex<Vec<String>>,
    market_fetches: AtomicUsize,
}

impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pool(mut self, pool: Pool) -> Self {
        self.pools.insert(pool.address.clone(), pool);
        self
    }

    pub fn with_market(mut self, market: Market) -> Self {
        self.markets.push(market);
        self
    }

    pub fn with_token(mut self, token: TokenMeta) -> Self {
        self.tokens.insert(token.mint.clone(), token);
        self
    }

    pub fn with_positions(mut self, wallet: &str, positions: Vec<RawPosition>) -> Self {
        self.positions.insert(wallet.to_string(), positions);
        self
    }

    /// Make every fetch of the given pool address fail with a 503.
    pub fn failing_pool(mut self, address: &str) -> Self {
        self.failing_pools.insert(address.to_string());
        self
    }

    /// Make every fetch of the given mint fail with a 503.
    pub fn failing_token(mut self, mint: &str) -> Self {
        self.failing_tokens.insert(mint.to_string());
        self
    }

    /// Make the market dataset fetch fail with a 503.
    pub fn failing_markets(mut self) -> Self {
        self.fail_markets = true;
        self
    }

    /// Total pool fetches issued, across all addresses.
    pub fn pool_fetch_count(&self) -> usize {
        self.pool_fetches.lock().unwrap().len()
    }

    /// Pool fetches issued for one address.
    pub fn pool_fetch_count_for(&self, address: &str) -> usize {
        self.pool_fetches
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.as_str() == address)
            .count()
    }

    /// Total token metadata fetches issued, across all mints.
    pub fn token_fetch_count(&self) -> usize {
        self.token_fetches.lock().unwrap().len()
    }

    /// Market dataset fetches issued.
    pub fn market_fetch_count(&self) -> usize {
        self.market_fetches.load(Ordering::SeqCst)
    }

    fn unavailable() -> DataSourceError {
        DataSourceError::HttpError {
            status: 503,
            message: "Injected failure".to_string(),
        }
    }

    fn not_found(what: &str) -> DataSourceError {
        DataSourceError::HttpError {
            status: 404,
            message: format!("No fixture for {}", what),
        }
    }
}

#[async_trait]
impl DataSource for MockSource {
    async fn fetch_pool(&self, address: &str) -> Result<Pool, DataSourceError> {
        self.pool_fetches.lock().unwrap().push(address.to_string());
        if self.failing_pools.contains(address) {
            return Err(Self::unavailable());
        }
        self.pools
            .get(address)
            .cloned()
            .ok_or_else(|| Self::not_found(address))
    }

    async fn fetch_markets(&self) -> Result<Vec<Market>, DataSourceError> {
        self.market_fetches.fetch_add(1, Ordering::SeqCst);
        if self.fail_markets {
            return Err(Self::unavailable());
        }
        Ok(self.markets.clone())
    }

    async fn fetch_token(&self, mint: &str) -> Result<TokenMeta, DataSourceError> {
        self.token_fetches.lock().unwrap().push(mint.to_string());
        if self.failing_tokens.contains(mint) {
            return Err(Self::unavailable());
        }
        self.tokens
            .get(mint)
            .cloned()
            .ok_or_else(|| Self::not_found(mint))
    }

    async fn fetch_positions(&self, wallet: &str) -> Result<Vec<RawPosition>, DataSourceError> {
        Ok(self.positions.get(wallet).cloned().unwrap_or_default())
    }
}
