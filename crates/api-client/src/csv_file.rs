use crate::error::ApiError;
use crate::PriceProvider;
use async_trait::async_trait;
use chrono::NaiveDate;
use core_types::{PriceSeries, Series};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// One row of a price file. Column names from spreadsheet exports are accepted too.
#[derive(Debug, Deserialize)]
struct PriceRecord {
    #[serde(alias = "Date")]
    date: NaiveDate,
    #[serde(alias = "Adj Close")]
    price: Option<f64>,
}

/// Reads `<SYMBOL>.csv` files with `date,price` columns from a directory.
#[derive(Debug, Clone)]
pub struct CsvPriceProvider {
    dir: PathBuf,
}

impl CsvPriceProvider {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn path_for(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{}.csv", symbol))
    }
}

#[async_trait]
impl PriceProvider for CsvPriceProvider {
    fn name(&self) -> &str {
        "csv"
    }

    async fn fetch_prices(&self, symbol: &str) -> Result<PriceSeries, ApiError> {
        let path = self.path_for(symbol);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ApiError::DataUnavailable(symbol.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        let mut reader = csv::Reader::from_reader(bytes.as_slice());
        let mut observations = Vec::new();
        for result in reader.deserialize() {
            let record: PriceRecord = result?;
            observations.push((record.date, record.price.unwrap_or(f64::NAN)));
        }

        let series = Series::from_observations(symbol, observations);
        if series.defined_count() == 0 {
            return Err(ApiError::DataUnavailable(symbol.to_string()));
        }
        tracing::debug!(symbol, path = %path.display(), rows = series.len(), "Read price file.");
        Ok(series)
    }
}
