//! Compact wire codec between the aggregator and the display layer.
//!
//! Encoding renames fields to short keys and stores scaled integers: USD
//! amounts at cent precision (×100), prices at micro-unit precision
//! (×1 000 000), leverage at centi-leverage precision (×100), native token
//! amounts at micro-token precision (×1 000 000). Basis-points fields pass
//! through unscaled. Non-finite values (the "infinite" take-profit sentinel)
//! and absent fields encode as null. Decoding inverts each factor exactly and
//! never fails; it additionally derives a display status from the lifecycle
//! state and the price range.

use crate::domain::AggregatedPosition;
use serde::{Deserialize, Serialize};

const USD_SCALE: f64 = 100.0;
const PRICE_SCALE: f64 = 1_000_000.0;
const LEVERAGE_SCALE: f64 = 100.0;
const AMOUNT_SCALE: f64 = 1_000_000.0;

/// Wire form of one aggregated position: short keys, scaled integers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EncodedPosition {
    pub addr: String,
    pub pair: String,
    /// Raw lifecycle state string.
    pub st: String,
    #[serde(default)]
    pub age: u64,
    #[serde(default)]
    pub lev: Option<i64>,
    #[serde(default)]
    pub sz: Option<i64>,
    #[serde(default)]
    pub cola: Option<i64>,
    #[serde(default)]
    pub colb: Option<i64>,
    #[serde(default)]
    pub colu: Option<i64>,
    #[serde(default)]
    pub dbta: Option<i64>,
    #[serde(default)]
    pub dbtb: Option<i64>,
    #[serde(default)]
    pub dbtu: Option<i64>,
    #[serde(default)]
    pub inta: Option<i64>,
    #[serde(default)]
    pub intb: Option<i64>,
    #[serde(default)]
    pub intu: Option<i64>,
    #[serde(default)]
    pub ep: Option<i64>,
    #[serde(default)]
    pub cp: Option<i64>,
    #[serde(default)]
    pub rl: Option<i64>,
    #[serde(default)]
    pub ru: Option<i64>,
    #[serde(default)]
    pub ll: Option<i64>,
    #[serde(default)]
    pub lu: Option<i64>,
    #[serde(default)]
    pub sl: Option<i64>,
    #[serde(default)]
    pub tp: Option<i64>,
    #[serde(default)]
    pub ylda: Option<i64>,
    #[serde(default)]
    pub yldb: Option<i64>,
    #[serde(default)]
    pub yldu: Option<i64>,
    #[serde(default)]
    pub cmpa: Option<i64>,
    #[serde(default)]
    pub cmpb: Option<i64>,
    #[serde(default)]
    pub cmpu: Option<i64>,
    #[serde(default)]
    pub pnlu: Option<i64>,
    #[serde(default)]
    pub pnlbps: Option<i32>,
    #[serde(default)]
    pub tpnla: Option<i64>,
    #[serde(default)]
    pub tpnlbps: Option<i32>,
}

/// Display-ready form restored from an [`EncodedPosition`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodedPosition {
    pub address: String,
    pub pair: String,
    pub state: String,
    pub age_secs: u64,
    pub display_status: String,
    pub leverage: Option<f64>,
    pub size_usd: Option<f64>,
    pub collateral_a: Option<f64>,
    pub collateral_b: Option<f64>,
    pub collateral_usd: Option<f64>,
    pub debt_a: Option<f64>,
    pub debt_b: Option<f64>,
    pub debt_usd: Option<f64>,
    pub interest_a: Option<f64>,
    pub interest_b: Option<f64>,
    pub interest_usd: Option<f64>,
    pub entry_price: Option<f64>,
    pub current_price: Option<f64>,
    pub range_lower: Option<f64>,
    pub range_upper: Option<f64>,
    pub liquidation_lower: Option<f64>,
    pub liquidation_upper: Option<f64>,
    pub stop_loss_price: Option<f64>,
    pub take_profit_price: Option<f64>,
    pub yield_a: Option<f64>,
    pub yield_b: Option<f64>,
    pub yield_usd: Option<f64>,
    pub compounded_a: Option<f64>,
    pub compounded_b: Option<f64>,
    pub compounded_usd: Option<f64>,
    pub pnl_usd: Option<f64>,
    pub pnl_bps: Option<i32>,
    pub token_pnl_amount: Option<f64>,
    pub token_pnl_bps: Option<i32>,
}

// Magnitudes at or beyond 2^63 would saturate the `as i64` cast and decode
// to a wrong value; treat them like the non-finite sentinels.
const MAX_ENCODABLE: f64 = i64::MAX as f64;

fn scale(value: f64, factor: f64) -> Option<i64> {
    let scaled = (value * factor).round();
    if scaled.is_finite() && scaled.abs() < MAX_ENCODABLE {
        Some(scaled as i64)
    } else {
        None
    }
}

fn unscale(value: Option<i64>, factor: f64) -> Option<f64> {
    value.map(|v| v as f64 / factor)
}

/// Encode one aggregated position into its compact wire form.
pub fn encode(position: &AggregatedPosition) -> EncodedPosition {
    let m = &position.metrics;
    EncodedPosition {
        addr: position.address.clone(),
        pair: position.pair.clone(),
        st: position.state.clone(),
        age: position.age_secs,
        lev: scale(m.leverage, LEVERAGE_SCALE),
        sz: scale(m.size_usd, USD_SCALE),
        cola: scale(m.collateral.a, AMOUNT_SCALE),
        colb: scale(m.collateral.b, AMOUNT_SCALE),
        colu: scale(m.collateral.usd, USD_SCALE),
        dbta: scale(m.debt.a, AMOUNT_SCALE),
        dbtb: scale(m.debt.b, AMOUNT_SCALE),
        dbtu: scale(m.debt.usd, USD_SCALE),
        inta: scale(m.interest.a, AMOUNT_SCALE),
        intb: scale(m.interest.b, AMOUNT_SCALE),
        intu: scale(m.interest.usd, USD_SCALE),
        ep: scale(m.entry_price, PRICE_SCALE),
        cp: scale(m.current_price, PRICE_SCALE),
        rl: scale(m.range_prices.lower, PRICE_SCALE),
        ru: scale(m.range_prices.upper, PRICE_SCALE),
        ll: scale(m.liquidation_prices.lower, PRICE_SCALE),
        lu: scale(m.liquidation_prices.upper, PRICE_SCALE),
        sl: scale(m.limit_order_prices.lower, PRICE_SCALE),
        tp: scale(m.limit_order_prices.upper, PRICE_SCALE),
        ylda: scale(m.yield_.a, AMOUNT_SCALE),
        yldb: scale(m.yield_.b, AMOUNT_SCALE),
        yldu: scale(m.yield_.usd, USD_SCALE),
        cmpa: scale(m.compounded.a, AMOUNT_SCALE),
        cmpb: scale(m.compounded.b, AMOUNT_SCALE),
        cmpu: scale(m.compounded.usd, USD_SCALE),
        pnlu: scale(m.pnl.usd, USD_SCALE),
        pnlbps: Some(m.pnl.bps),
        tpnla: scale(m.token_pnl.amount, AMOUNT_SCALE),
        tpnlbps: Some(m.token_pnl.bps),
    }
}

/// Decode a compact position back into display-ready values.
///
/// Never fails: absent or null fields decode to `None`, and the display
/// status falls back to the unknown-range branch when prices are missing.
pub fn decode(encoded: &EncodedPosition) -> DecodedPosition {
    let current_price = unscale(encoded.cp, PRICE_SCALE);
    let range_lower = unscale(encoded.rl, PRICE_SCALE);
    let range_upper = unscale(encoded.ru, PRICE_SCALE);

    DecodedPosition {
        address: encoded.addr.clone(),
        pair: encoded.pair.clone(),
        state: encoded.st.clone(),
        age_secs: encoded.age,
        display_status: calculate_status(&encoded.st, current_price, range_lower, range_upper),
        leverage: unscale(encoded.lev, LEVERAGE_SCALE),
        size_usd: unscale(encoded.sz, USD_SCALE),
        collateral_a: unscale(encoded.cola, AMOUNT_SCALE),
        collateral_b: unscale(encoded.colb, AMOUNT_SCALE),
        collateral_usd: unscale(encoded.colu, USD_SCALE),
        debt_a: unscale(encoded.dbta, AMOUNT_SCALE),
        debt_b: unscale(encoded.dbtb, AMOUNT_SCALE),
        debt_usd: unscale(encoded.dbtu, USD_SCALE),
        interest_a: unscale(encoded.inta, AMOUNT_SCALE),
        interest_b: unscale(encoded.intb, AMOUNT_SCALE),
        interest_usd: unscale(encoded.intu, USD_SCALE),
        entry_price: unscale(encoded.ep, PRICE_SCALE),
        current_price,
        range_lower,
        range_upper,
        liquidation_lower: unscale(encoded.ll, PRICE_SCALE),
        liquidation_upper: unscale(encoded.lu, PRICE_SCALE),
        stop_loss_price: unscale(encoded.sl, PRICE_SCALE),
        take_profit_price: unscale(encoded.tp, PRICE_SCALE),
        yield_a: unscale(encoded.ylda, AMOUNT_SCALE),
        yield_b: unscale(encoded.yldb, AMOUNT_SCALE),
        yield_usd: unscale(encoded.yldu, USD_SCALE),
        compounded_a: unscale(encoded.cmpa, AMOUNT_SCALE),
        compounded_b: unscale(encoded.cmpb, AMOUNT_SCALE),
        compounded_usd: unscale(encoded.cmpu, USD_SCALE),
        pnl_usd: unscale(encoded.pnlu, USD_SCALE),
        pnl_bps: encoded.pnlbps,
        token_pnl_amount: unscale(encoded.tpnla, AMOUNT_SCALE),
        token_pnl_bps: encoded.tpnlbps,
    }
}

/// Derive the display status from the lifecycle state and price range.
pub fn calculate_status(
    state: &str,
    current_price: Option<f64>,
    range_lower: Option<f64>,
    range_upper: Option<f64>,
) -> String {
    match state {
        "closed" => "Closed".to_string(),
        "liquidated" => "Liquidated".to_string(),
        "closed_by_limit_order" => "Limit Closed".to_string(),
        "open" => match (current_price, range_lower, range_upper) {
            (Some(price), Some(lower), Some(upper)) => {
                if lower <= price && price <= upper {
                    "In range".to_string()
                } else {
                    "Out of range".to_string()
                }
            }
            _ => "Open (Unknown Range)".to_string(),
        },
        other => capitalize(other),
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
