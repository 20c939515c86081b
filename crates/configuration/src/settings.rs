use crate::error::ConfigError;
use core_types::Frequency;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The root configuration structure for the entire application.
///
/// Every section falls back to its defaults, so an empty or missing
/// configuration file yields a usable `Config`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data: DataSettings,
    pub risk_parity: RiskParitySettings,
    pub evaluation: EvaluationSettings,
    pub report: ReportSettings,
}

impl Config {
    /// Periods per year used to annualize, either explicit or implied by the data frequency.
    pub fn periods_per_year(&self) -> f64 {
        self.evaluation
            .periods_per_year
            .unwrap_or_else(|| self.data.frequency.periods_per_year())
    }

    /// Checks the values that deserialization alone cannot rule out.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.data.symbols.is_empty() {
            return Err(ConfigError::ValidationError(
                "data.symbols must name at least one instrument".to_string(),
            ));
        }
        if let Some(symbol) = self.data.symbols.iter().find(|s| s.trim().is_empty()) {
            return Err(ConfigError::ValidationError(format!(
                "data.symbols contains a blank entry: '{}'",
                symbol
            )));
        }
        if self.risk_parity.window == 0 {
            return Err(ConfigError::ValidationError(
                "risk_parity.window must be at least 1".to_string(),
            ));
        }
        if let Some(periods) = self.evaluation.periods_per_year {
            if !periods.is_finite() || periods <= 0.0 {
                return Err(ConfigError::ValidationError(format!(
                    "evaluation.periods_per_year must be positive, got {}",
                    periods
                )));
            }
        }
        Ok(())
    }
}

/// Where price histories come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    /// The public Yahoo Finance chart endpoint.
    #[default]
    Yahoo,
    /// `<SYMBOL>.csv` files in `csv_dir`.
    Csv,
}

/// Which instruments to load, from where, and at what sampling frequency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    /// Instrument identifiers, e.g. "ES=F" for the S&P 500 E-mini future.
    pub symbols: Vec<String>,
    pub source: DataSource,
    /// Directory holding the price files when `source = "csv"`.
    pub csv_dir: PathBuf,
    pub base_url: String,
    /// Frequency the prices are resampled to before computing returns.
    pub frequency: Frequency,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            symbols: ["ES=F", "ZN=F", "GC=F", "DX=F"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            source: DataSource::Yahoo,
            csv_dir: PathBuf::from("data"),
            base_url: "https://query2.finance.yahoo.com".to_string(),
            frequency: Frequency::Monthly,
        }
    }
}

/// Parameters for the inverse-volatility weighting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskParitySettings {
    /// Trailing window, in periods of `data.frequency`, for the rolling volatility.
    pub window: usize,
}

impl Default for RiskParitySettings {
    fn default() -> Self {
        Self { window: 36 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationSettings {
    pub periods_per_year: Option<f64>,
}

/// Presentation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    /// Where the drawdown chart of the risk-parity portfolio is written.
    pub chart_path: PathBuf,
    /// Decimal places used when printing statistics.
    pub precision: usize,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            chart_path: PathBuf::from("plots/risk_parity_returns.html"),
            precision: 4,
        }
    }
}
