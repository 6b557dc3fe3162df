//! Position economics: leverage, liquidation thresholds, and derived values.
//!
//! Everything here is pure and I/O-free. Degenerate inputs degrade the
//! affected sub-result to zero (or leverage 1) per the documented guards;
//! genuinely unusable inputs surface as a [`PositionError`] so the caller
//! decides whether to substitute the empty template.

use super::math;
use crate::domain::{
    Market, PnlBreakdown, Pool, PriceRange, ProcessedPosition, RawPosition, SideAmounts,
    TokenMeta, TokenPnlBreakdown,
};
use crate::error::PositionError;

/// Leverage of a levered LP position, in quote-token terms.
///
/// `leverage = totalValue / (totalValue − debtValue)` with
/// `totalValue = totalA·price + totalB` and `debtValue = debtA·price + debtB`.
/// Guards: non-finite or non-positive price → 1; non-positive total value →
/// 1; debt at or above total → capped at 100. The result is always in
/// [1, 100].
pub fn calculate_leverage(price: f64, total_a: f64, total_b: f64, debt_a: f64, debt_b: f64) -> f64 {
    if !price.is_finite() || price <= 0.0 {
        return 1.0;
    }
    let total_value = total_a * price + total_b;
    if total_value <= 0.0 {
        return 1.0;
    }
    let debt_value = debt_a * price + debt_b;
    if debt_value >= total_value {
        return 100.0;
    }
    (total_value / (total_value - debt_value)).clamp(1.0, 100.0)
}

/// Inputs to the liquidation-price solver, all in human units.
#[derive(Debug, Clone, Copy)]
pub struct LiquidationInputs {
    pub leverage: f64,
    pub debt_a: f64,
    pub debt_b: f64,
    pub liquidity: f64,
    pub lower_price: f64,
    pub upper_price: f64,
    /// Liquidation threshold as a fraction in [0, 1].
    pub threshold: f64,
}

/// Solve for the prices at which the position becomes liquidatable.
///
/// The liquidation condition is quadratic in `x = √price`:
/// `a·x² + b·x + c = 0` with
/// `a = debtA + threshold·liquidity/√upperPrice`,
/// `b = −2·threshold·liquidity`,
/// `c = debtB + threshold·liquidity·√lowerPrice`.
/// Each real positive root squares into a liquidation price. An unlevered
/// position, an inverted or empty range, a zero leading coefficient, or a
/// negative discriminant all yield `{0, 0}`.
pub fn compute_liquidation_prices(inputs: &LiquidationInputs) -> PriceRange {
    if inputs.leverage <= 1.0 {
        return PriceRange::default();
    }
    if !(inputs.lower_price < inputs.upper_price) || inputs.liquidity <= 0.0 {
        return PriceRange::default();
    }

    let tl = inputs.threshold * inputs.liquidity;
    let a = inputs.debt_a + tl / inputs.upper_price.sqrt();
    let b = -2.0 * tl;
    let c = inputs.debt_b + tl * inputs.lower_price.sqrt();

    if a == 0.0 {
        return PriceRange::default();
    }
    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return PriceRange::default();
    }

    let root = discriminant.sqrt();
    let x_lower = (-b - root) / (2.0 * a);
    let x_upper = (-b + root) / (2.0 * a);

    PriceRange {
        lower: square_positive(x_lower),
        upper: square_positive(x_upper),
    }
}

fn square_positive(x: f64) -> f64 {
    if x > 0.0 {
        x * x
    } else {
        0.0
    }
}

/// Compute every derived metric for one position.
///
/// Pure: the four inputs fully determine the output. Errors mean the caller
/// should fall back to [`ProcessedPosition::empty`].
pub fn process_position(
    raw: &RawPosition,
    pool: &Pool,
    market: &Market,
    token_a: &TokenMeta,
    token_b: &TokenMeta,
) -> Result<ProcessedPosition, PositionError> {
    if raw.pool != pool.address {
        return Err(PositionError::MalformedInput("position/pool address mismatch"));
    }
    for usd in [
        raw.total.usd,
        raw.current_loan.usd,
        raw.loan_funds.usd,
        raw.yield_.usd,
        raw.compounded.usd,
        raw.leftovers_usd,
        raw.deposited_collateral_usd,
        raw.pnl.usd,
    ] {
        if !usd.is_finite() {
            return Err(PositionError::MalformedInput("non-finite USD field"));
        }
    }

    let da = token_a.decimals;
    let db = token_b.decimals;

    let total_a = math::scale_amount(raw.total.a, da);
    let total_b = math::scale_amount(raw.total.b, db);
    let debt_a = math::scale_amount(raw.current_loan.a, da);
    let debt_b = math::scale_amount(raw.current_loan.b, db);
    let loan_funds_a = math::scale_amount(raw.loan_funds.a, da);
    let loan_funds_b = math::scale_amount(raw.loan_funds.b, db);
    for amount in [total_a, total_b, debt_a, debt_b] {
        if !amount.is_finite() {
            return Err(PositionError::Degenerate("non-finite scaled amount"));
        }
    }

    let current_price = math::tick_to_price(pool.tick_current_index, da, db);
    let entry_price = math::sqrt_price_to_price(raw.entry_sqrt_price, da, db);
    let range_prices = PriceRange {
        lower: math::tick_to_price(raw.tick_lower_index, da, db),
        upper: math::tick_to_price(raw.tick_upper_index, da, db),
    };
    let limit_order_prices = PriceRange {
        lower: math::tick_to_price(raw.tick_stop_loss_index, da, db),
        upper: math::tick_to_price(raw.tick_take_profit_index, da, db),
    };

    let leverage = calculate_leverage(current_price, total_a, total_b, debt_a, debt_b);
    let liquidation_prices = compute_liquidation_prices(&LiquidationInputs {
        leverage,
        debt_a,
        debt_b,
        liquidity: math::scale_liquidity(raw.liquidity, da, db),
        lower_price: range_prices.lower,
        upper_price: range_prices.upper,
        threshold: market.threshold_fraction(),
    });

    Ok(ProcessedPosition {
        leverage,
        size_usd: raw.total.usd + raw.leftovers_usd,
        collateral: SideAmounts {
            a: total_a - debt_a,
            b: total_b - debt_b,
            usd: raw.deposited_collateral_usd,
        },
        debt: SideAmounts {
            a: debt_a,
            b: debt_b,
            usd: raw.current_loan.usd,
        },
        // Accrued interest: current loan minus originally drawn funds.
        // Deliberately not floored at zero.
        interest: SideAmounts {
            a: debt_a - loan_funds_a,
            b: debt_b - loan_funds_b,
            usd: raw.current_loan.usd - raw.loan_funds.usd,
        },
        entry_price,
        current_price,
        range_prices,
        liquidation_prices,
        limit_order_prices,
        yield_: SideAmounts {
            a: math::scale_amount(raw.yield_.a, da),
            b: math::scale_amount(raw.yield_.b, db),
            usd: raw.yield_.usd,
        },
        compounded: SideAmounts {
            a: math::scale_amount(raw.compounded.a, da),
            b: math::scale_amount(raw.compounded.b, db),
            usd: raw.compounded.usd,
        },
        pnl: PnlBreakdown {
            usd: raw.pnl.usd,
            bps: raw.pnl.bps,
        },
        token_pnl: TokenPnlBreakdown {
            amount: math::scale_amount_signed(raw.token_pnl.amount, da),
            bps: raw.token_pnl.bps,
        },
    })
}
