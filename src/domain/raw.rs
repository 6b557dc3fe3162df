//! Wire-level types for the upstream position API.
//!
//! These mirror the JSON the data provider returns (camelCase, `{ "data": … }`
//! envelope). Optional fields carry serde defaults so a sparse payload
//! deserializes cleanly and is validated once here, at the fetch boundary,
//! instead of ad hoc inside the formula engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tick index marking an unset lower limit order (full-range lower bound).
pub const MIN_TICK_INDEX: i32 = -443_636;

/// Tick index marking an unset upper limit order (full-range upper bound).
pub const MAX_TICK_INDEX: i32 = 443_636;

fn unset_lower_tick() -> i32 {
    MIN_TICK_INDEX
}

fn unset_upper_tick() -> i32 {
    MAX_TICK_INDEX
}

/// Q64.64 quantities exceed what a JSON number can carry, so the provider
/// sends them as decimal strings; small values may still arrive as numbers.
mod u128_wire {
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Wire {
        Num(u64),
        Str(String),
    }

    pub fn serialize<S: Serializer>(value: &u128, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u128, D::Error> {
        match Wire::deserialize(deserializer)? {
            Wire::Num(n) => Ok(u128::from(n)),
            Wire::Str(s) => s.parse::<u128>().map_err(serde::de::Error::custom),
        }
    }
}

/// A pair of integer token amounts (native units, pre-decimal-scaling) plus
/// the provider's USD valuation of the pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RawAmounts {
    #[serde(default)]
    pub a: u64,
    #[serde(default)]
    pub b: u64,
    #[serde(default)]
    pub usd: f64,
}

/// Position-level PnL as reported by the provider: USD plus basis points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPnl {
    #[serde(default)]
    pub usd: f64,
    #[serde(default)]
    pub bps: i32,
}

/// PnL denominated in one token's native units, plus basis points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTokenPnl {
    #[serde(default)]
    pub amount: i64,
    #[serde(default)]
    pub bps: i32,
}

/// On-chain snapshot of a leveraged liquidity position.
///
/// All token amounts are integers in native units; dividing by the owning
/// token's `10^decimals` is the formula engine's job. `entry_sqrt_price` is a
/// Q64.64 fixed-point value, zero when unset. Stop-loss / take-profit ticks
/// default to the extreme tick sentinels when the order is not set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPosition {
    pub address: String,
    pub pool: String,
    pub state: String,
    #[serde(default)]
    pub total: RawAmounts,
    /// Current loan balance per token (the position's debt).
    #[serde(default)]
    pub current_loan: RawAmounts,
    /// Loan funds originally drawn, excluding accrued interest.
    #[serde(default)]
    pub loan_funds: RawAmounts,
    #[serde(default, rename = "yield")]
    pub yield_: RawAmounts,
    #[serde(default)]
    pub compounded: RawAmounts,
    /// Residual USD value not attributable to either token side.
    #[serde(default)]
    pub leftovers_usd: f64,
    #[serde(default)]
    pub deposited_collateral_usd: f64,
    #[serde(default)]
    pub pnl: RawPnl,
    #[serde(default)]
    pub token_pnl: RawTokenPnl,
    pub tick_lower_index: i32,
    pub tick_upper_index: i32,
    #[serde(default = "unset_lower_tick")]
    pub tick_stop_loss_index: i32,
    #[serde(default = "unset_upper_tick")]
    pub tick_take_profit_index: i32,
    #[serde(default, with = "u128_wire")]
    pub entry_sqrt_price: u128,
    #[serde(default, with = "u128_wire")]
    pub liquidity: u128,
    pub opened_at: DateTime<Utc>,
}

/// Concentrated-liquidity pool state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pool {
    pub address: String,
    pub tick_current_index: i32,
    pub token_a_mint: String,
    pub token_b_mint: String,
}

/// Lending-market risk parameters for one pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Market {
    /// Address of the pool this market lends against.
    pub pool: String,
    /// Liquidation threshold in parts-per-million of position value.
    pub liquidation_threshold: u32,
}

impl Market {
    /// Liquidation threshold as a fraction in [0, 1].
    pub fn threshold_fraction(&self) -> f64 {
        f64::from(self.liquidation_threshold) / 1_000_000.0
    }
}

/// Token mint metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenMeta {
    pub mint: String,
    pub symbol: String,
    pub decimals: u8,
}

impl TokenMeta {
    /// Fallback metadata used when the token fetch fails: a truncated mint
    /// stands in for the symbol and decimals default to 9.
    pub fn placeholder(mint: &str) -> Self {
        let symbol = if mint.len() > 9 {
            format!("{}…{}", &mint[..4], &mint[mint.len() - 4..])
        } else {
            mint.to_string()
        };
        TokenMeta {
            mint: mint.to_string(),
            symbol,
            decimals: 9,
        }
    }
}
