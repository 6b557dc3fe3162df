//! Pipeline-level codec behavior: aggregate → encode → decode.

use chrono::TimeZone;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tunaview::codec::{decode, encode};
use tunaview::domain::{Market, Pool, RawAmounts, RawPnl, RawPosition, TokenMeta};
use tunaview::{Aggregator, Config, MockSource};

fn test_config() -> Config {
    Config {
        api_url: "http://example.invalid".to_string(),
        pool_ttl: Duration::from_secs(30),
        market_ttl: Duration::from_secs(3600),
        token_ttl: Duration::from_secs(86400),
    }
}

fn source() -> MockSource {
    MockSource::new()
        .with_pool(Pool {
            address: "pool1".to_string(),
            // ~150 USDC per SOL after the 10^(9-6) decimal adjustment.
            tick_current_index: -18_971,
            token_a_mint: "mintSOL".to_string(),
            token_b_mint: "mintUSDC".to_string(),
        })
        .with_market(Market {
            pool: "pool1".to_string(),
            liquidation_threshold: 880_000,
        })
        .with_token(TokenMeta {
            mint: "mintSOL".to_string(),
            symbol: "SOL".to_string(),
            decimals: 9,
        })
        .with_token(TokenMeta {
            mint: "mintUSDC".to_string(),
            symbol: "USDC".to_string(),
            decimals: 6,
        })
}

fn make_position(state: &str) -> RawPosition {
    RawPosition {
        address: "pos1".to_string(),
        pool: "pool1".to_string(),
        state: state.to_string(),
        total: RawAmounts {
            a: 10_000_000_000,
            b: 1_500_000_000,
            usd: 3005.0,
        },
        current_loan: RawAmounts {
            a: 0,
            b: 750_000_000,
            usd: 750.0,
        },
        loan_funds: RawAmounts {
            a: 0,
            b: 740_000_000,
            usd: 740.0,
        },
        yield_: RawAmounts {
            a: 12_000_000,
            b: 1_800_000,
            usd: 3.6,
        },
        compounded: RawAmounts::default(),
        leftovers_usd: 0.42,
        deposited_collateral_usd: 2255.0,
        pnl: RawPnl {
            usd: -37.89,
            bps: -126,
        },
        token_pnl: Default::default(),
        tick_lower_index: -20_000,
        tick_upper_index: -18_000,
        tick_stop_loss_index: tunaview::domain::MIN_TICK_INDEX,
        tick_take_profit_index: tunaview::domain::MAX_TICK_INDEX,
        entry_sqrt_price: 0,
        liquidity: 800_000_000_000,
        opened_at: chrono::Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
    }
}

async fn aggregate_one(state: &str) -> tunaview::AggregatedPosition {
    let aggregator = Aggregator::new(Arc::new(source()), &test_config());
    let mut ages = HashMap::new();
    ages.insert("pos1".to_string(), 900u64);
    let mut result = aggregator
        .aggregate(&[make_position(state)], &ages)
        .await
        .unwrap();
    result.remove(0)
}

#[tokio::test]
async fn round_trip_preserves_metrics_within_granularity() {
    let aggregated = aggregate_one("open").await;
    let decoded = decode(&encode(&aggregated));
    let m = &aggregated.metrics;

    assert!((decoded.leverage.unwrap() - m.leverage).abs() <= 0.01);
    assert!((decoded.size_usd.unwrap() - m.size_usd).abs() <= 0.01);
    assert!((decoded.pnl_usd.unwrap() - m.pnl.usd).abs() <= 0.01);
    assert!((decoded.current_price.unwrap() - m.current_price).abs() <= 1e-6);
    assert!((decoded.range_lower.unwrap() - m.range_prices.lower).abs() <= 1e-6);
    assert!((decoded.range_upper.unwrap() - m.range_prices.upper).abs() <= 1e-6);
    assert!((decoded.interest_usd.unwrap() - m.interest.usd).abs() <= 0.01);
    assert_eq!(decoded.pnl_bps, Some(m.pnl.bps));
    assert_eq!(decoded.age_secs, 900);
    assert_eq!(decoded.pair, "SOL/USDC");
    // Unset take-profit stays null through the round trip.
    assert_eq!(decoded.take_profit_price, None);
}

#[tokio::test]
async fn open_position_inside_range_displays_in_range() {
    let aggregated = aggregate_one("open").await;
    let decoded = decode(&encode(&aggregated));
    // Current tick -18971 sits inside [-20000, -18000].
    assert_eq!(decoded.display_status, "In range");
}

#[tokio::test]
async fn open_position_outside_range_displays_out_of_range() {
    let mut raw = make_position("open");
    raw.tick_lower_index = -16_000;
    raw.tick_upper_index = -14_000;

    let aggregator = Aggregator::new(Arc::new(source()), &test_config());
    let result = aggregator
        .aggregate(&[raw], &HashMap::new())
        .await
        .unwrap();
    let decoded = decode(&encode(&result[0]));
    assert_eq!(decoded.display_status, "Out of range");
}

#[tokio::test]
async fn terminal_states_display_without_price_context() {
    for (state, expected) in [
        ("closed", "Closed"),
        ("liquidated", "Liquidated"),
        ("closed_by_limit_order", "Limit Closed"),
        ("migrating", "Migrating"),
    ] {
        let aggregated = aggregate_one(state).await;
        let decoded = decode(&encode(&aggregated));
        assert_eq!(decoded.display_status, expected, "state {}", state);
    }
}

#[tokio::test]
async fn encoded_batch_serializes_as_json_array() {
    let aggregated = aggregate_one("open").await;
    let encoded = vec![encode(&aggregated)];
    let json = serde_json::to_value(&encoded).unwrap();

    let array = json.as_array().unwrap();
    assert_eq!(array.len(), 1);
    assert_eq!(array[0]["addr"], "pos1");
    assert_eq!(array[0]["st"], "open");
    assert!(array[0]["lev"].is_i64());
}
