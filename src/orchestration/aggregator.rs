//! The aggregation orchestrator.
//!
//! Given a batch of raw positions it fetches each distinct pool and token
//! mint exactly once (concurrently), resolves every position against the
//! market dataset, and runs the formula engine. Failure policy: a pool or
//! market fetch failure rejects the whole batch; everything scoped to a
//! single position degrades that position to the empty template.

use crate::cache::TtlCache;
use crate::config::Config;
use crate::datasource::{DataSource, DataSourceError};
use crate::domain::{
    AggregatedPosition, Market, Pool, ProcessedPosition, RawPosition, TokenMeta,
};
use crate::engine::process_position;
use crate::error::{AggregationError, PositionError};
use chrono::Utc;
use futures::future::{join_all, try_join_all};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tracing::{info, warn};

pub struct Aggregator {
    source: Arc<dyn DataSource>,
    pools: TtlCache<String, Pool>,
    markets: TtlCache<(), Vec<Market>>,
    tokens: TtlCache<String, TokenMeta>,
}

impl Aggregator {
    /// Caches are constructed here, once, with the configured TTLs; their
    /// lifetime is the aggregator's.
    pub fn new(source: Arc<dyn DataSource>, config: &Config) -> Self {
        Aggregator {
            source,
            pools: TtlCache::new(config.pool_ttl),
            markets: TtlCache::new(config.market_ttl),
            tokens: TtlCache::new(config.token_ttl),
        }
    }

    /// Fetch a wallet's raw positions, always live (no cache).
    pub async fn positions_for(
        &self,
        wallet: &str,
    ) -> Result<Vec<RawPosition>, AggregationError> {
        Ok(self.source.fetch_positions(wallet).await?)
    }

    /// Fetch, age and aggregate a wallet's positions in one call.
    pub async fn aggregate_wallet(
        &self,
        wallet: &str,
    ) -> Result<Vec<AggregatedPosition>, AggregationError> {
        let positions = self.positions_for(wallet).await?;
        let now = Utc::now();
        let ages = positions
            .iter()
            .map(|p| {
                let age = (now - p.opened_at).num_seconds().max(0) as u64;
                (p.address.clone(), age)
            })
            .collect();
        self.aggregate(&positions, &ages).await
    }

    /// Aggregate a batch of raw positions.
    ///
    /// `ages` maps position address to age in seconds; absent addresses get
    /// age 0 rather than failing the batch.
    pub async fn aggregate(
        &self,
        positions: &[RawPosition],
        ages: &HashMap<String, u64>,
    ) -> Result<Vec<AggregatedPosition>, AggregationError> {
        let markets = self.markets().await?;

        let pool_addresses: BTreeSet<&str> =
            positions.iter().map(|p| p.pool.as_str()).collect();
        let fetched = try_join_all(pool_addresses.iter().map(|a| self.pool(a))).await?;
        let pools: HashMap<String, Pool> = fetched
            .into_iter()
            .map(|p| (p.address.clone(), p))
            .collect();

        let mints: BTreeSet<&str> = pools
            .values()
            .flat_map(|p| [p.token_a_mint.as_str(), p.token_b_mint.as_str()])
            .collect();
        let tokens: HashMap<String, TokenMeta> = join_all(mints.iter().map(|m| self.token(m)))
            .await
            .into_iter()
            .map(|t| (t.mint.clone(), t))
            .collect();

        info!(
            "Aggregating {} positions across {} pools / {} mints",
            positions.len(),
            pools.len(),
            mints.len()
        );

        Ok(positions
            .iter()
            .map(|raw| self.resolve_one(raw, &markets, &pools, &tokens, ages))
            .collect())
    }

    fn resolve_one(
        &self,
        raw: &RawPosition,
        markets: &[Market],
        pools: &HashMap<String, Pool>,
        tokens: &HashMap<String, TokenMeta>,
        ages: &HashMap<String, u64>,
    ) -> AggregatedPosition {
        let (pair, metrics) = match compute_one(raw, markets, pools, tokens) {
            Ok(resolved) => resolved,
            Err(e) => {
                warn!("Degrading position {} to empty template: {}", raw.address, e);
                let pair = pair_label(raw, pools, tokens).unwrap_or_default();
                (pair, ProcessedPosition::empty())
            }
        };
        AggregatedPosition {
            address: raw.address.clone(),
            pair,
            state: raw.state.clone(),
            age_secs: ages.get(&raw.address).copied().unwrap_or(0),
            metrics,
        }
    }

    async fn pool(&self, address: &str) -> Result<Pool, DataSourceError> {
        if let Some(pool) = self.pools.get(&address.to_string()) {
            return Ok(pool);
        }
        let pool = self.source.fetch_pool(address).await?;
        self.pools.insert(address.to_string(), pool.clone());
        Ok(pool)
    }

    async fn markets(&self) -> Result<Vec<Market>, DataSourceError> {
        if let Some(markets) = self.markets.get(&()) {
            return Ok(markets);
        }
        let markets = self.source.fetch_markets().await?;
        self.markets.insert((), markets.clone());
        Ok(markets)
    }

    /// Token metadata never fails the batch: a fetch error degrades to the
    /// truncated-mint placeholder. Placeholders are not cached, so the next
    /// aggregation retries the real fetch.
    async fn token(&self, mint: &str) -> TokenMeta {
        if let Some(token) = self.tokens.get(&mint.to_string()) {
            return token;
        }
        match self.source.fetch_token(mint).await {
            Ok(token) => {
                self.tokens.insert(mint.to_string(), token.clone());
                token
            }
            Err(e) => {
                warn!("Token fetch for {} failed ({}), using placeholder", mint, e);
                TokenMeta::placeholder(mint)
            }
        }
    }
}

fn compute_one(
    raw: &RawPosition,
    markets: &[Market],
    pools: &HashMap<String, Pool>,
    tokens: &HashMap<String, TokenMeta>,
) -> Result<(String, ProcessedPosition), PositionError> {
    let pool = pools
        .get(&raw.pool)
        .ok_or(PositionError::MalformedInput("unknown pool reference"))?;
    // Realistic market datasets are small; a linear scan beats an index.
    let market = markets
        .iter()
        .find(|m| m.pool == pool.address)
        .ok_or_else(|| PositionError::MissingMarket(pool.address.clone()))?;
    let token_a = resolve_token(tokens, &pool.token_a_mint);
    let token_b = resolve_token(tokens, &pool.token_b_mint);

    let metrics = process_position(raw, pool, market, &token_a, &token_b)?;
    Ok((format!("{}/{}", token_a.symbol, token_b.symbol), metrics))
}

fn resolve_token(tokens: &HashMap<String, TokenMeta>, mint: &str) -> TokenMeta {
    tokens
        .get(mint)
        .cloned()
        .unwrap_or_else(|| TokenMeta::placeholder(mint))
}

fn pair_label(
    raw: &RawPosition,
    pools: &HashMap<String, Pool>,
    tokens: &HashMap<String, TokenMeta>,
) -> Option<String> {
    let pool = pools.get(&raw.pool)?;
    let token_a = resolve_token(tokens, &pool.token_a_mint);
    let token_b = resolve_token(tokens, &pool.token_b_mint);
    Some(format!("{}/{}", token_a.symbol, token_b.symbol))
}
