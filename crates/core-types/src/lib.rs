//! # Parity Core Types
//!
//! The shared, date-indexed data structures used by every other crate in the
//! workspace, together with the pure transforms that turn raw closing prices
//! into an aligned table of log returns.
//!
//! Undefined observations are stored as `f64::NAN` and propagate through every
//! transform the same way a missing price would.

pub mod enums;
pub mod error;
pub mod series;
pub mod table;

// Re-export the core types to provide a clean public API.
pub use enums::Frequency;
pub use error::CoreError;
pub use series::{PortfolioReturnSeries, PriceSeries, ReturnSeries, Series};
pub use table::{PriceTable, ReturnTable, Table, WeightTable};

/// Natural-log return between two prices, undefined when either price is
/// undefined or not strictly positive.
pub fn log_return(previous: f64, current: f64) -> f64 {
    if previous > 0.0 && current > 0.0 {
        current.ln() - previous.ln()
    } else {
        f64::NAN
    }
}

/// Log returns of a price column; the first entry is always undefined.
pub(crate) fn log_return_column(prices: &[f64]) -> Vec<f64> {
    let mut returns = Vec::with_capacity(prices.len());
    if !prices.is_empty() {
        returns.push(f64::NAN);
    }
    returns.extend(prices.windows(2).map(|w| log_return(w[0], w[1])));
    returns
}
