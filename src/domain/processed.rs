//! Display-ready position metrics produced by the formula engine.

use serde::{Deserialize, Serialize};

/// A per-token value pair in human units plus the USD sum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SideAmounts {
    pub a: f64,
    pub b: f64,
    pub usd: f64,
}

/// An ordered pair of prices (quote token per base token).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub lower: f64,
    pub upper: f64,
}

/// PnL in USD plus the provider's basis-points ratio.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PnlBreakdown {
    pub usd: f64,
    pub bps: i32,
}

/// PnL denominated in one token's human units, plus basis points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenPnlBreakdown {
    pub amount: f64,
    pub bps: i32,
}

/// Derived financial metrics for one position.
///
/// Produced fresh per aggregation call and never mutated afterwards. All
/// native amounts are in human units (raw amount divided by the owning
/// token's `10^decimals`); prices are quote (token B) per base (token A).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedPosition {
    /// Always within [1, 100].
    pub leverage: f64,
    pub size_usd: f64,
    pub collateral: SideAmounts,
    pub debt: SideAmounts,
    /// Current loan minus originally drawn funds. May be negative.
    pub interest: SideAmounts,
    pub entry_price: f64,
    pub current_price: f64,
    pub range_prices: PriceRange,
    pub liquidation_prices: PriceRange,
    /// Stop-loss (lower, 0 when unset) and take-profit (upper, +∞ when unset).
    pub limit_order_prices: PriceRange,
    #[serde(rename = "yield")]
    pub yield_: SideAmounts,
    pub compounded: SideAmounts,
    pub pnl: PnlBreakdown,
    pub token_pnl: TokenPnlBreakdown,
}

impl ProcessedPosition {
    /// The neutral all-zero template substituted whenever a position cannot
    /// be computed safely. Leverage is 1 (unlevered), everything else zero.
    pub fn empty() -> Self {
        ProcessedPosition {
            leverage: 1.0,
            size_usd: 0.0,
            collateral: SideAmounts::default(),
            debt: SideAmounts::default(),
            interest: SideAmounts::default(),
            entry_price: 0.0,
            current_price: 0.0,
            range_prices: PriceRange::default(),
            liquidation_prices: PriceRange::default(),
            limit_order_prices: PriceRange::default(),
            yield_: SideAmounts::default(),
            compounded: SideAmounts::default(),
            pnl: PnlBreakdown::default(),
            token_pnl: TokenPnlBreakdown::default(),
        }
    }
}

/// One fully resolved batch entry: engine output merged with the labels the
/// display layer keys on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedPosition {
    pub address: String,
    /// "SymbolA/SymbolB" of the pool's two tokens.
    pub pair: String,
    /// Raw lifecycle state string from the provider, passed through.
    pub state: String,
    pub age_secs: u64,
    pub metrics: ProcessedPosition,
}
