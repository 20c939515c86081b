use crate::error::RiskError;
use core_types::{PortfolioReturnSeries, ReturnTable, Series, WeightTable};

/// Combines instrument returns with already-lagged weights into portfolio returns.
///
/// Each row contributes `Σ_j returns[t][j] * weights[t][j]`. Rows where any
/// product is undefined (the weight warm-up period, missing returns) are dropped.
pub fn portfolio_returns(
    returns: &ReturnTable,
    weights: &WeightTable,
) -> Result<PortfolioReturnSeries, RiskError> {
    if !returns.same_shape(weights) {
        return Err(RiskError::ShapeMismatch(format!(
            "returns are {}x{}, weights are {}x{}",
            returns.nrows(),
            returns.ncols(),
            weights.nrows(),
            weights.ncols()
        )));
    }

    let mut observations = Vec::with_capacity(returns.nrows());
    for (t, date) in returns.index().iter().enumerate() {
        let products: Vec<f64> = (0..returns.ncols())
            .map(|j| returns.get(t, j) * weights.get(t, j))
            .collect();
        if products.is_empty() || products.iter().any(|p| p.is_nan()) {
            continue;
        }
        observations.push((*date, products.iter().sum::<f64>()));
    }

    let dropped = returns.nrows() - observations.len();
    tracing::debug!(
        rows = observations.len(),
        dropped,
        "Combined weighted returns into portfolio returns."
    );
    Ok(Series::from_observations("portfolio", observations))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{InverseVolatility, WeightingScheme};
    use approx::assert_relative_eq;
    use chrono::{Days, NaiveDate};
    use core_types::Table;

    fn dates(n: u64) -> Vec<NaiveDate> {
        let start = NaiveDate::from_ymd_opt(2022, 3, 31).unwrap();
        (0..n).map(|i| start + Days::new(i)).collect()
    }

    #[test]
    fn weighted_sum_uses_weight_row_of_the_same_date() {
        let names = vec!["A".to_string(), "B".to_string()];
        let returns = Table::new(
            dates(3),
            names.clone(),
            vec![vec![0.01, 0.02, -0.03], vec![0.04, -0.01, 0.02]],
        )
        .unwrap();
        let weights = Table::new(
            dates(3),
            names,
            vec![vec![f64::NAN, 0.5, 0.25], vec![f64::NAN, 0.5, 0.75]],
        )
        .unwrap();

        let portfolio = portfolio_returns(&returns, &weights).unwrap();
        assert_eq!(portfolio.name, "portfolio");
        assert_eq!(portfolio.index(), &dates(3)[1..]);
        assert_relative_eq!(portfolio.values()[0], 0.5 * 0.02 + 0.5 * -0.01, epsilon = 1e-12);
        assert_relative_eq!(portfolio.values()[1], 0.25 * -0.03 + 0.75 * 0.02, epsilon = 1e-12);
    }

    #[test]
    fn inverse_volatility_portfolio_starts_after_warm_up() {
        let returns = Table::new(
            dates(4),
            vec!["A".to_string(), "B".to_string()],
            vec![vec![0.01, -0.02, 0.03, 0.01], vec![0.02, 0.01, -0.01, 0.02]],
        )
        .unwrap();
        let weights = InverseVolatility::new(2).unwrap().weights(&returns).unwrap();
        let portfolio = portfolio_returns(&returns, &weights).unwrap();

        assert_eq!(portfolio.len(), 2);
        assert_relative_eq!(portfolio.values()[0], 0.25 * 0.03 + 0.75 * -0.01, epsilon = 1e-12);
    }

    #[test]
    fn mismatched_tables_are_rejected() {
        let returns = Table::new(dates(2), vec!["A".to_string()], vec![vec![0.1, 0.2]]).unwrap();
        let weights = Table::new(dates(3), vec!["A".to_string()], vec![vec![1.0; 3]]).unwrap();
        assert!(matches!(
            portfolio_returns(&returns, &weights),
            Err(RiskError::ShapeMismatch(_))
        ));
    }
}
