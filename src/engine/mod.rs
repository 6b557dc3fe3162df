//! Pure formula engine: no I/O, no shared state.

pub mod formulas;
pub mod math;

pub use formulas::{
    calculate_leverage, compute_liquidation_prices, process_position, LiquidationInputs,
};
pub use math::{scale_amount, sqrt_price_to_price, tick_to_price};
