//! # Parity Analytics Engine
//!
//! This crate provides the tools for evaluating the performance of a return
//! series: annualized moments, the cumulative equity curve with its drawdowns,
//! and the Sharpe, Sortino and Calmar ratios.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of data
//!   sources, consoles or files. It depends only on `core-types` (Layer 0).
//! - **Stateless Calculation:** The `AnalyticsEngine` is a stateless calculator. It
//!   takes a return series as input and produces an `Evaluation` as output.
//! - **Explicit Undefined Values:** Statistics that cannot be computed are `None`,
//!   never a substituted default.
//!
//! ## Public API
//!
//! - `AnalyticsEngine`: The main struct that contains the evaluation logic.
//! - `PerformanceReport`, `EquityCurve`, `Evaluation`: The result types.
//! - `moments` and `rolling`: The underlying sample statistics.
//! - `AnalyticsError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod error;
pub mod moments;
pub mod report;
pub mod rolling;

// Re-export the key components to create a clean, public-facing API.
pub use engine::AnalyticsEngine;
pub use error::AnalyticsError;
pub use report::{EquityCurve, Evaluation, PerformanceReport};
pub use rolling::{rolling_annualized_mean, rolling_mean, rolling_std};
