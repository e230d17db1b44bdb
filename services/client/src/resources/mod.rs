pub mod auth;
pub mod backtest;
pub mod symbols;
mod wire;

pub use backtest::RecordQuery;
pub use symbols::Watchlist;
