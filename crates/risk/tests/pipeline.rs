use analytics::AnalyticsEngine;
use approx::assert_relative_eq;
use chrono::{Datelike, Days, NaiveDate, Weekday};
use core_types::{Frequency, Series, Table};
use risk::{portfolio_returns, InverseVolatility, WeightingScheme};

/// Business-day closes following a deterministic oscillating log-return path.
fn synthetic_prices(name: &str, start: NaiveDate, days: u64, scale: f64, phase: f64) -> Series {
    let mut log_price = 100f64.ln();
    let observations = (0..days)
        .map(|i| start + Days::new(i))
        .filter(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
        .enumerate()
        .map(|(k, date)| {
            log_price += scale * ((k as f64) * 0.37 + phase).sin() + 0.0002;
            (date, log_price.exp())
        })
        .collect();
    Series::from_observations(name, observations)
}

#[test]
fn monthly_risk_parity_pipeline() {
    let start = NaiveDate::from_ymd_opt(2018, 1, 1).unwrap();
    let equities = synthetic_prices("ES=F", start, 1460, 0.012, 0.0);
    let bonds = synthetic_prices("ZN=F", start, 1460, 0.003, 1.0);
    // Gold starts trading four months later than the other two.
    let gold = synthetic_prices(
        "GC=F",
        NaiveDate::from_ymd_opt(2018, 5, 1).unwrap(),
        1340,
        0.008,
        2.0,
    );

    let prices = Table::align(&[equities, bonds, gold])
        .unwrap()
        .resample_last(Frequency::Monthly)
        .forward_fill()
        .drop_undefined_rows();
    assert_eq!(prices.index()[0], NaiveDate::from_ymd_opt(2018, 5, 31).unwrap());

    let returns = prices.log_returns();
    let window = 12;
    let weights = InverseVolatility::new(window).unwrap().weights(&returns).unwrap();

    let first_defined = (0..weights.nrows())
        .find(|&t| weights.row_is_defined(t))
        .unwrap();
    // One undefined leading return, a full window, then the one-period lag.
    assert_eq!(first_defined, window + 1);
    for t in first_defined..weights.nrows() {
        assert_relative_eq!(weights.row(t).iter().sum::<f64>(), 1.0, epsilon = 1e-9);
    }

    let portfolio = portfolio_returns(&returns, &weights).unwrap();
    assert_eq!(portfolio.len(), returns.nrows() - first_defined);
    assert_eq!(portfolio.index()[0], returns.index()[first_defined]);

    let evaluation = AnalyticsEngine::new()
        .evaluate(&portfolio, Frequency::Monthly)
        .unwrap();
    let report = evaluation.report;
    assert_eq!(report.periods, portfolio.len());
    assert!(report.annualized_volatility.unwrap() > 0.0);
    let max_dd = report.max_drawdown.unwrap();
    assert!((0.0..=1.0).contains(&max_dd));
    assert_eq!(evaluation.curve.len(), portfolio.len());
}
