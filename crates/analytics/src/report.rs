use crate::error::AnalyticsError;
use chrono::NaiveDate;
use core_types::Series;
use serde::{Deserialize, Serialize};

/// Summary statistics of a return series.
///
/// This struct is the output of the `AnalyticsEngine` and the input of every
/// presentation layer. A `None` marks a statistic that is undefined for the
/// given series (too few observations, or a zero denominator).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceReport {
    /// Number of defined return observations the statistics were computed from.
    pub periods: usize,
    pub periods_per_year: f64,

    // I. Distribution
    pub annualized_mean_return: Option<f64>,
    pub annualized_volatility: Option<f64>,
    pub skewness: Option<f64>,
    pub kurtosis: Option<f64>, // Excess kurtosis

    // II. Drawdown
    pub max_drawdown: Option<f64>,

    // III. Risk-adjusted ratios
    pub sharpe_ratio: Option<f64>,
    pub downside_volatility: Option<f64>,
    pub sortino_ratio: Option<f64>,
    pub calmar_ratio: Option<f64>,
}

impl PerformanceReport {
    /// Creates an empty report where every statistic is undefined.
    pub fn new(periods_per_year: f64) -> Self {
        Self {
            periods: 0,
            periods_per_year,
            annualized_mean_return: None,
            annualized_volatility: None,
            skewness: None,
            kurtosis: None,
            max_drawdown: None,
            sharpe_ratio: None,
            downside_volatility: None,
            sortino_ratio: None,
            calmar_ratio: None,
        }
    }

    /// The statistics in reporting order, paired with their names.
    pub fn metrics(&self) -> [(&'static str, Option<f64>); 8] {
        [
            ("annualized_mean_return", self.annualized_mean_return),
            ("annualized_volatility", self.annualized_volatility),
            ("skewness", self.skewness),
            ("kurtosis", self.kurtosis),
            ("max_drawdown", self.max_drawdown),
            ("sharpe_ratio", self.sharpe_ratio),
            ("sortino_ratio", self.sortino_ratio),
            ("calmar_ratio", self.calmar_ratio),
        ]
    }
}

/// Growth of one unit invested, with its running peak and drawdown, per date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityCurve {
    pub index: Vec<NaiveDate>,
    pub cumulative: Vec<f64>,
    pub running_max: Vec<f64>,
    /// `(running_max - cumulative) / running_max`, always in `[0, 1)`.
    pub drawdown: Vec<f64>,
}

impl EquityCurve {
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// The growth-of-one curve as a series named `name`.
    pub fn cumulative_series(&self, name: impl Into<String>) -> Result<Series, AnalyticsError> {
        Ok(Series::new(name, self.index.clone(), self.cumulative.clone())?)
    }
}

/// The full result of evaluating a return series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub report: PerformanceReport,
    pub curve: EquityCurve,
}
