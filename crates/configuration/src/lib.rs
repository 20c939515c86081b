//! # Parity Configuration
//!
//! Strongly-typed settings for the risk-parity toolkit.
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! `PARITY_`-prefixed environment variables (`PARITY_RISK_PARITY__WINDOW=24`).
//! Command-line flags are applied on top by the binary.

use crate::error::ConfigError;
use crate::settings::Config;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{DataSettings, DataSource, EvaluationSettings, ReportSettings, RiskParitySettings};

/// Loads the application configuration from `path` and the environment.
///
/// A missing file is not an error: every section has defaults. The result is
/// validated before it is returned.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix("PARITY")
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("data.symbols")
                .try_parsing(true),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    tracing::debug!(path = %path.display(), symbols = ?config.data.symbols, "Loaded configuration.");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::Frequency;
    use std::io::Write;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn file_values_override_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[data]
symbols = ["ES=F", "ZN=F"]
source = "csv"
frequency = "weekly"

[risk_parity]
window = 52

[report]
precision = 2
"#
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.data.symbols, vec!["ES=F", "ZN=F"]);
        assert_eq!(config.data.source, DataSource::Csv);
        assert_eq!(config.data.frequency, Frequency::Weekly);
        assert_eq!(config.risk_parity.window, 52);
        assert_eq!(config.report.precision, 2);
        // Untouched keys keep their defaults.
        assert_eq!(config.data.base_url, "https://query2.finance.yahoo.com");
        assert_eq!(config.periods_per_year(), 52.0);
    }

    #[test]
    fn invalid_file_values_are_rejected() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[risk_parity]\nwindow = 0").unwrap();
        assert!(matches!(
            load_config(file.path()),
            Err(ConfigError::ValidationError(_))
        ));
    }
}
