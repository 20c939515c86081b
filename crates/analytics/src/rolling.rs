use crate::error::AnalyticsError;
use core_types::{Frequency, ReturnSeries, Series};
use statrs::statistics::Statistics;

/// Applies `stat` to every trailing window of `window` observations.
///
/// The first `window - 1` outputs are undefined, as is any window that contains
/// an undefined observation.
fn rolling_apply<F>(values: &[f64], window: usize, stat: F) -> Result<Vec<f64>, AnalyticsError>
where
    F: Fn(&[f64]) -> f64,
{
    if window == 0 {
        return Err(AnalyticsError::InvalidParameter(
            "rolling window must be at least 1".to_string(),
        ));
    }

    let mut out = vec![f64::NAN; values.len()];
    for end in window..=values.len() {
        let slice = &values[end - window..end];
        if slice.iter().all(|v| !v.is_nan()) {
            out[end - 1] = stat(slice);
        }
    }
    Ok(out)
}

/// Trailing mean over `window` observations.
pub fn rolling_mean(values: &[f64], window: usize) -> Result<Vec<f64>, AnalyticsError> {
    rolling_apply(values, window, |w| w.iter().mean())
}

/// Trailing sample standard deviation over `window` observations.
///
/// A window of one observation has no sample deviation and stays undefined.
pub fn rolling_std(values: &[f64], window: usize) -> Result<Vec<f64>, AnalyticsError> {
    rolling_apply(values, window, |w| {
        if w.len() < 2 { f64::NAN } else { w.iter().std_dev() }
    })
}

/// Trailing mean return scaled to a yearly figure.
pub fn rolling_annualized_mean(
    returns: &ReturnSeries,
    window: usize,
    freq: Frequency,
) -> Result<Series, AnalyticsError> {
    let scale = freq.periods_per_year();
    let values = rolling_mean(returns.values(), window)?
        .into_iter()
        .map(|m| m * scale)
        .collect();
    let mut rolled = returns.with_values(values)?;
    rolled.name = format!("{} rolling {}", returns.name, window);
    Ok(rolled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    #[test]
    fn prefix_is_undefined_until_window_fills() {
        let values = [1.0, 2.0, 3.0, 4.0];
        let means = rolling_mean(&values, 3).unwrap();
        assert!(means[0].is_nan() && means[1].is_nan());
        assert_relative_eq!(means[2], 2.0);
        assert_relative_eq!(means[3], 3.0);
    }

    #[test]
    fn window_larger_than_history_is_all_undefined() {
        let stds = rolling_std(&[0.1, 0.2], 5).unwrap();
        assert!(stds.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn undefined_value_poisons_every_window_containing_it() {
        let values = [f64::NAN, 0.01, -0.02, 0.03];
        let stds = rolling_std(&values, 2).unwrap();
        assert!(stds[0].is_nan() && stds[1].is_nan());
        assert_relative_eq!(stds[2], (0.03f64 * 0.03 / 2.0).sqrt(), epsilon = 1e-12);
        assert!(!stds[3].is_nan());
    }

    #[test]
    fn zero_window_is_rejected() {
        assert!(matches!(
            rolling_mean(&[1.0], 0),
            Err(AnalyticsError::InvalidParameter(_))
        ));
    }

    #[test]
    fn annualized_mean_scales_by_frequency() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let index = (0..3).map(|i| start + chrono::Days::new(i)).collect();
        let returns = Series::new("ES=F", index, vec![0.01, 0.02, 0.03]).unwrap();

        let rolled = rolling_annualized_mean(&returns, 2, Frequency::Monthly).unwrap();
        assert!(rolled.values()[0].is_nan());
        assert_relative_eq!(rolled.values()[1], 0.015 * 12.0, epsilon = 1e-12);
        assert_relative_eq!(rolled.values()[2], 0.025 * 12.0, epsilon = 1e-12);
        assert_eq!(rolled.index(), returns.index());
    }
}
