//! # Parity Risk Allocation
//!
//! This crate turns a table of instrument returns into portfolio weights and
//! combines the two into a single portfolio return series.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** Pure computation over `core-types` tables; no I/O.
//! - **No Look-Ahead:** Every `WeightingScheme` returns weights that are already
//!   lagged, so row `t` only depends on returns observed strictly before `t`.
//!
//! ## Public API
//!
//! - `WeightingScheme`: The trait every weighting rule implements.
//! - `InverseVolatility`: Rolling inverse-volatility ("risk parity") weights.
//! - `portfolio_returns`: Weighted combination of returns and lagged weights.

pub mod error;
pub mod inverse_vol;
pub mod portfolio;

pub use error::RiskError;
pub use inverse_vol::InverseVolatility;
pub use portfolio::portfolio_returns;

use core_types::{ReturnTable, WeightTable};

/// A rule that allocates portfolio weight across the columns of a return table.
pub trait WeightingScheme: Send + Sync {
    /// A short, human-readable name for logs and reports.
    fn name(&self) -> &str;

    /// Computes weights with the same shape as `returns`.
    ///
    /// Row `t` of the result must depend only on rows `0..t` of `returns`.
    /// Rows whose weights cannot be computed are entirely undefined.
    fn weights(&self, returns: &ReturnTable) -> Result<WeightTable, RiskError>;
}
