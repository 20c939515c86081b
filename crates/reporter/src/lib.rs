//! # Parity Reporter
//!
//! The presentation layer. Nothing here computes a statistic; every function
//! renders a structure produced by `analytics` or `risk`.
//!
//! - [`report_lines`] / [`print_report`]: the performance report as `name: value` lines
//!   and a `comfy-table` summary.
//! - [`weights_table`]: the most recent rows of a weight table.
//! - [`write_drawdown_chart`] / [`write_rolling_mean_chart`]: standalone HTML charts.

pub mod chart;
pub mod console;
pub mod error;

pub use chart::{write_drawdown_chart, write_rolling_mean_chart};
pub use console::{
    format_value, print_report, report_lines, report_lines_with_precision, summary_table,
    weights_table, DEFAULT_PRECISION,
};
pub use error::ReportError;
