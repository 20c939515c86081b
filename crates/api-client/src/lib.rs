use crate::error::ApiError;
use async_trait::async_trait;
use core_types::{PriceSeries, PriceTable, Table};

mod csv_file;
pub mod error;
pub mod responses;
mod yahoo;

// --- Public API ---
pub use csv_file::CsvPriceProvider;
pub use responses::{ChartError, ChartResponse};
pub use yahoo::{parse_chart, YahooClient};

/// The abstract interface for a source of historical prices.
/// The pipelines only see this trait, so the live HTTP source and offline
/// files (or a mock in tests) can be swapped freely.
#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// A short label for logs.
    fn name(&self) -> &str;

    /// Fetches the full available history of daily closing prices for `symbol`.
    ///
    /// The returned series is named after `symbol`. A source with no data for the
    /// instrument returns `ApiError::DataUnavailable`.
    async fn fetch_prices(&self, symbol: &str) -> Result<PriceSeries, ApiError>;
}

/// Fetches every symbol in turn and aligns the histories on the union of their dates.
pub async fn fetch_price_table(
    provider: &dyn PriceProvider,
    symbols: &[String],
) -> Result<PriceTable, ApiError> {
    fetch_price_table_with(provider, symbols, |_| {}).await
}

/// Like [`fetch_price_table`], calling `on_fetched` after each instrument arrives.
pub async fn fetch_price_table_with<F>(
    provider: &dyn PriceProvider,
    symbols: &[String],
    mut on_fetched: F,
) -> Result<PriceTable, ApiError>
where
    F: FnMut(&PriceSeries),
{
    let mut series = Vec::with_capacity(symbols.len());
    for symbol in symbols {
        let prices = provider.fetch_prices(symbol).await?;
        if prices.defined_count() == 0 {
            return Err(ApiError::DataUnavailable(symbol.clone()));
        }
        tracing::info!(
            provider = provider.name(),
            symbol = %symbol,
            observations = prices.len(),
            "Fetched price history."
        );
        on_fetched(&prices);
        series.push(prices);
    }
    Ok(Table::align(&series)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Days, NaiveDate};
    use core_types::Series;
    use std::collections::HashMap;

    struct MockProvider {
        histories: HashMap<String, Vec<(NaiveDate, f64)>>,
    }

    #[async_trait]
    impl PriceProvider for MockProvider {
        fn name(&self) -> &str {
            "mock"
        }

        async fn fetch_prices(&self, symbol: &str) -> Result<PriceSeries, ApiError> {
            self.histories
                .get(symbol)
                .map(|obs| Series::from_observations(symbol, obs.clone()))
                .ok_or_else(|| ApiError::DataUnavailable(symbol.to_string()))
        }
    }

    fn day(offset: u64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap() + Days::new(offset)
    }

    fn provider() -> MockProvider {
        let mut histories = HashMap::new();
        histories.insert("A".to_string(), vec![(day(0), 10.0), (day(1), 11.0), (day(2), 12.0)]);
        histories.insert("B".to_string(), vec![(day(1), 50.0), (day(3), 51.0)]);
        histories.insert("EMPTY".to_string(), vec![(day(0), f64::NAN)]);
        MockProvider { histories }
    }

    #[tokio::test]
    async fn aligns_histories_on_the_union_of_dates() {
        let symbols = vec!["A".to_string(), "B".to_string()];
        let mut seen = Vec::new();
        let table = fetch_price_table_with(&provider(), &symbols, |s| seen.push(s.name.clone()))
            .await
            .unwrap();

        assert_eq!(seen, symbols);
        assert_eq!(table.columns(), symbols.as_slice());
        assert_eq!(table.index(), &[day(0), day(1), day(2), day(3)]);
        assert!(table.get(0, 1).is_nan());
        assert_eq!(table.get(1, 1), 50.0);
        assert!(table.get(3, 0).is_nan());
    }

    #[tokio::test]
    async fn unknown_or_empty_symbol_fails_the_whole_fetch() {
        let missing = fetch_price_table(&provider(), &["A".to_string(), "ZZ".to_string()]).await;
        assert!(matches!(missing, Err(ApiError::DataUnavailable(s)) if s == "ZZ"));

        let empty = fetch_price_table(&provider(), &["EMPTY".to_string()]).await;
        assert!(matches!(empty, Err(ApiError::DataUnavailable(s)) if s == "EMPTY"));
    }
}
