//! 거래소 커넥터.

pub mod coinsph;

pub use coinsph::{CoinsPhClient, CoinsPhConfig, CoinsPhOptions, TickerEndpoint};
