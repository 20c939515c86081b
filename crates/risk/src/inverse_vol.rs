use crate::error::RiskError;
use crate::WeightingScheme;
use analytics::rolling_std;
use core_types::{ReturnTable, WeightTable};
use serde::{Deserialize, Serialize};

/// Rolling inverse-volatility weights.
///
/// Each instrument is weighted in proportion to the reciprocal of the sample
/// standard deviation of its last `window` returns. The computed weights are
/// shifted one period later before they are returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InverseVolatility {
    window: usize,
}

impl InverseVolatility {
    /// Creates a new `InverseVolatility` scheme over a trailing window of `window` periods.
    pub fn new(window: usize) -> Result<Self, RiskError> {
        if window == 0 {
            return Err(RiskError::InvalidParameters(
                "window must be at least 1 period".to_string(),
            ));
        }
        Ok(Self { window })
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// Weights computed from data through each row, before the one-period lag.
    fn unlagged_weights(&self, returns: &ReturnTable) -> Result<WeightTable, RiskError> {
        // 1. Inverse of the trailing volatility, per instrument.
        let inverse_vol = (0..returns.ncols())
            .map(|j| -> Result<Vec<f64>, RiskError> {
                let vol = rolling_std(returns.column_values(j), self.window)?;
                Ok(vol.into_iter().map(invert).collect())
            })
            .collect::<Result<Vec<_>, _>>()?;

        // 2. Normalize each row so it sums to one.
        let mut weights = vec![vec![f64::NAN; returns.nrows()]; returns.ncols()];
        for t in 0..returns.nrows() {
            let row: Vec<f64> = inverse_vol.iter().map(|column| column[t]).collect();
            if row.is_empty() || row.iter().any(|v| v.is_nan()) {
                continue;
            }
            let total: f64 = row.iter().sum();
            for (j, value) in row.iter().enumerate() {
                weights[j][t] = value / total;
            }
        }

        Ok(returns.with_data(weights)?)
    }
}

/// `1 / vol`, undefined for a zero or undefined volatility.
fn invert(vol: f64) -> f64 {
    if vol > 0.0 && vol.is_finite() {
        1.0 / vol
    } else {
        f64::NAN
    }
}

impl WeightingScheme for InverseVolatility {
    fn name(&self) -> &str {
        "inverse-volatility"
    }

    fn weights(&self, returns: &ReturnTable) -> Result<WeightTable, RiskError> {
        let weights = self.unlagged_weights(returns)?.shift(1);

        let defined_rows = (0..weights.nrows())
            .filter(|&t| weights.row_is_defined(t))
            .count();
        tracing::debug!(
            window = self.window,
            rows = weights.nrows(),
            defined_rows,
            "Computed inverse-volatility weights."
        );
        if defined_rows == 0 && !returns.is_empty() {
            tracing::warn!(
                window = self.window,
                rows = returns.nrows(),
                "No row has enough history for a full set of weights."
            );
        }
        Ok(weights)
    }
}
