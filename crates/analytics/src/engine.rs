use crate::error::AnalyticsError;
use crate::moments;
use crate::report::{EquityCurve, Evaluation, PerformanceReport};
use core_types::{Frequency, ReturnSeries};

/// A stateless calculator for deriving performance metrics from a log-return series.
#[derive(Debug, Default)]
pub struct AnalyticsEngine {}

impl AnalyticsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// The main entry point for evaluating a return series.
    ///
    /// # Arguments
    ///
    /// * `returns` - Log returns, one per period. Undefined entries are skipped.
    /// * `freq` - The sampling frequency, used to annualize.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `Evaluation` or an `AnalyticsError`.
    pub fn evaluate(
        &self,
        returns: &ReturnSeries,
        freq: Frequency,
    ) -> Result<Evaluation, AnalyticsError> {
        self.evaluate_with_periods(returns, freq.periods_per_year())
    }

    /// Same as [`AnalyticsEngine::evaluate`] with an explicit number of periods per year.
    pub fn evaluate_with_periods(
        &self,
        returns: &ReturnSeries,
        periods_per_year: f64,
    ) -> Result<Evaluation, AnalyticsError> {
        if !periods_per_year.is_finite() || periods_per_year <= 0.0 {
            return Err(AnalyticsError::InvalidParameter(format!(
                "periods per year must be positive, got {}",
                periods_per_year
            )));
        }
        let defined = returns.defined_count();
        if defined == 0 {
            return Err(AnalyticsError::NotEnoughData(format!(
                "series '{}' has no defined returns",
                returns.name
            )));
        }

        let mut report = PerformanceReport::new(periods_per_year);
        report.periods = defined;

        self.calculate_distribution(returns.values(), &mut report);
        let curve = self.calculate_drawdown(returns, &mut report);
        self.calculate_ratios(returns.values(), &mut report);

        tracing::debug!(
            series = %returns.name,
            periods = report.periods,
            "Evaluated return series."
        );
        Ok(Evaluation { report, curve })
    }

    /// Mean return scaled to a yearly figure; `None` without defined returns.
    pub fn annualized_mean_return(&self, returns: &ReturnSeries, freq: Frequency) -> Option<f64> {
        moments::mean(returns.values()).map(|m| m * freq.periods_per_year())
    }

    /// Annualized mean and volatility plus the higher moments.
    fn calculate_distribution(&self, values: &[f64], report: &mut PerformanceReport) {
        let f = report.periods_per_year;
        report.annualized_mean_return = moments::mean(values).map(|m| m * f);
        report.annualized_volatility = moments::std_dev(values).map(|s| s * f.sqrt());
        report.skewness = moments::skewness(values);
        report.kurtosis = moments::kurtosis(values);
    }

    /// Builds the equity curve from the cumulative log return and records the maximum drawdown.
    fn calculate_drawdown(
        &self,
        returns: &ReturnSeries,
        report: &mut PerformanceReport,
    ) -> EquityCurve {
        let n = returns.len();
        let mut cumulative = Vec::with_capacity(n);
        let mut running_max = Vec::with_capacity(n);
        let mut drawdown = Vec::with_capacity(n);

        let mut log_sum = 0.0_f64;
        let mut peak = f64::NAN;
        let mut max_drawdown: Option<f64> = None;

        for &r in returns.values() {
            if r.is_nan() {
                cumulative.push(f64::NAN);
                running_max.push(f64::NAN);
                drawdown.push(f64::NAN);
                continue;
            }

            log_sum += r;
            let equity = log_sum.exp();
            // `f64::max` ignores a NaN operand, so the first defined value seeds the peak.
            peak = peak.max(equity);
            let dd = (peak - equity) / peak;

            cumulative.push(equity);
            running_max.push(peak);
            drawdown.push(dd);
            max_drawdown = Some(max_drawdown.map_or(dd, |m| m.max(dd)));
        }

        report.max_drawdown = max_drawdown;

        EquityCurve {
            index: returns.index().to_vec(),
            cumulative,
            running_max,
            drawdown,
        }
    }

    /// Calculates Sharpe, Sortino and Calmar ratios from the already computed statistics.
    fn calculate_ratios(&self, values: &[f64], report: &mut PerformanceReport) {
        let negatives: Vec<f64> = values.iter().copied().filter(|r| *r < 0.0).collect();
        report.downside_volatility =
            moments::std_dev(&negatives).map(|s| s * report.periods_per_year.sqrt());

        let mean = report.annualized_mean_return;
        report.sharpe_ratio = ratio(mean, report.annualized_volatility);
        report.sortino_ratio = ratio(mean, report.downside_volatility);
        report.calmar_ratio = ratio(mean, report.max_drawdown);
    }
}

/// Divides two statistics; undefined when either is undefined or the denominator is zero.
fn ratio(numerator: Option<f64>, denominator: Option<f64>) -> Option<f64> {
    match (numerator, denominator) {
        (Some(n), Some(d)) if d != 0.0 && d.is_finite() && n.is_finite() => Some(n / d),
        _ => None,
    }
}
