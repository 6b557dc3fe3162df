//! Domain types: upstream wire shapes and engine output.

pub mod processed;
pub mod raw;

pub use processed::{
    AggregatedPosition, PnlBreakdown, PriceRange, ProcessedPosition, SideAmounts,
    TokenPnlBreakdown,
};
pub use raw::{
    Market, Pool, RawAmounts, RawPnl, RawPosition, RawTokenPnl, TokenMeta, MAX_TICK_INDEX,
    MIN_TICK_INDEX,
};
