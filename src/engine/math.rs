//! Price and amount conversions for concentrated-liquidity positions.
//!
//! All conversions here produce human-scale `f64` values: raw integer
//! amounts divided by the owning token's `10^decimals`, and prices in quote
//! (token B) per base (token A) terms.

use crate::domain::{MAX_TICK_INDEX, MIN_TICK_INDEX};

/// Base of the tick price ladder: each tick is a 0.01% price step.
const TICK_BASE: f64 = 1.0001;

/// Scale factor of Q64.64 fixed-point sqrt prices.
const Q64: f64 = 18_446_744_073_709_551_616.0; // 2^64

/// Convert a raw integer token amount to human units.
pub fn scale_amount(raw: u64, decimals: u8) -> f64 {
    raw as f64 / 10f64.powi(i32::from(decimals))
}

/// Convert a raw signed token amount (PnL, interest deltas) to human units.
pub fn scale_amount_signed(raw: i64, decimals: u8) -> f64 {
    raw as f64 / 10f64.powi(i32::from(decimals))
}

/// Adjustment from raw (per-lamport) prices to human prices.
fn decimal_adjustment(decimals_a: u8, decimals_b: u8) -> f64 {
    10f64.powi(i32::from(decimals_a) - i32::from(decimals_b))
}

/// Convert a tick index to a human price.
///
/// The extreme tick sentinels mean "unset": the lower sentinel maps to price
/// 0 and the upper sentinel to +∞ rather than to a real price.
pub fn tick_to_price(tick: i32, decimals_a: u8, decimals_b: u8) -> f64 {
    if tick <= MIN_TICK_INDEX {
        return 0.0;
    }
    if tick >= MAX_TICK_INDEX {
        return f64::INFINITY;
    }
    TICK_BASE.powi(tick) * decimal_adjustment(decimals_a, decimals_b)
}

/// Convert a Q64.64 fixed-point sqrt price to a human price. Zero means the
/// value was never recorded and maps to price 0.
pub fn sqrt_price_to_price(sqrt_price: u128, decimals_a: u8, decimals_b: u8) -> f64 {
    if sqrt_price == 0 {
        return 0.0;
    }
    let sqrt = sqrt_price as f64 / Q64;
    sqrt * sqrt * decimal_adjustment(decimals_a, decimals_b)
}

/// Convert raw liquidity (units of √(lamportsA·lamportsB)) to human scale.
pub fn scale_liquidity(liquidity: u128, decimals_a: u8, decimals_b: u8) -> f64 {
    let exponent = f64::from(u16::from(decimals_a) + u16::from(decimals_b)) / 2.0;
    liquidity as f64 / 10f64.powf(exponent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_amount_uses_own_decimals() {
        assert_eq!(scale_amount(5_000_000_000, 9), 5.0);
        assert_eq!(scale_amount(1_500_000, 6), 1.5);
        assert_eq!(scale_amount(0, 6), 0.0);
    }

    #[test]
    fn test_scale_amount_signed_negative() {
        assert_eq!(scale_amount_signed(-2_500_000, 6), -2.5);
    }

    #[test]
    fn test_tick_zero_is_pure_decimal_adjustment() {
        // 1.0001^0 = 1, so only the decimals differ: 10^(9-6) = 1000.
        assert_eq!(tick_to_price(0, 9, 6), 1000.0);
        assert_eq!(tick_to_price(0, 6, 6), 1.0);
    }

    #[test]
    fn test_tick_to_price_monotonic() {
        let low = tick_to_price(-1000, 6, 6);
        let mid = tick_to_price(0, 6, 6);
        let high = tick_to_price(1000, 6, 6);
        assert!(low < mid && mid < high);
        assert!((high - 1.0001f64.powi(1000)).abs() < 1e-9);
    }

    #[test]
    fn test_tick_sentinels() {
        assert_eq!(tick_to_price(MIN_TICK_INDEX, 9, 6), 0.0);
        assert_eq!(tick_to_price(MAX_TICK_INDEX, 9, 6), f64::INFINITY);
        assert_eq!(tick_to_price(MIN_TICK_INDEX - 5, 9, 6), 0.0);
        assert_eq!(tick_to_price(MAX_TICK_INDEX + 5, 9, 6), f64::INFINITY);
    }

    #[test]
    fn test_sqrt_price_identity() {
        // sqrt price of exactly 1.0 in Q64.64 with equal decimals.
        assert_eq!(sqrt_price_to_price(1u128 << 64, 6, 6), 1.0);
    }

    #[test]
    fn test_sqrt_price_zero_is_unset() {
        assert_eq!(sqrt_price_to_price(0, 9, 6), 0.0);
    }

    #[test]
    fn test_sqrt_price_squares() {
        // sqrt = 2.0 → price 4.0, then decimal adjust by 10^(9-6).
        let sqrt_price = 2u128 << 64;
        assert_eq!(sqrt_price_to_price(sqrt_price, 9, 6), 4000.0);
    }

    #[test]
    fn test_scale_liquidity_mixed_decimals() {
        // 9 + 6 decimals → divide by 10^7.5.
        let scaled = scale_liquidity(10u128.pow(10), 9, 6);
        assert!((scaled - 10f64.powf(2.5)).abs() < 1e-9);
    }
}
