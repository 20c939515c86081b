use crate::error::ApiError;
use crate::responses::ChartResponse;
use crate::PriceProvider;
use async_trait::async_trait;
use chrono::Utc;
use core_types::{PriceSeries, Series};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};

/// The chart endpoint rejects requests without a browser-like agent.
const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Daily price histories from the public Yahoo Finance chart API.
#[derive(Clone)]
pub struct YahooClient {
    client: reqwest::Client,
    base_url: String,
}

impl YahooClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));

        Ok(Self {
            client: reqwest::Client::builder().default_headers(headers).build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn chart_url(&self, symbol: &str) -> String {
        format!("{}/v8/finance/chart/{}", self.base_url, symbol)
    }
}

#[async_trait]
impl PriceProvider for YahooClient {
    fn name(&self) -> &str {
        "yahoo"
    }

    async fn fetch_prices(&self, symbol: &str) -> Result<PriceSeries, ApiError> {
        let now = Utc::now().timestamp().to_string();
        let response = self
            .client
            .get(self.chart_url(symbol))
            .query(&[
                ("period1", "0"),
                ("period2", now.as_str()),
                ("interval", "1d"),
                ("includeAdjustedClose", "true"),
            ])
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;

        let parsed = serde_json::from_str::<ChartResponse>(&text);
        match parsed {
            Ok(chart) => parse_chart(symbol, chart),
            Err(e) if status.is_success() => Err(ApiError::Deserialization(e.to_string())),
            Err(_) => Err(ApiError::ApiError(format!("HTTP {}: {}", status, text))),
        }
    }
}

/// Converts a chart response into the price series of `symbol`.
pub fn parse_chart(symbol: &str, response: ChartResponse) -> Result<PriceSeries, ApiError> {
    if let Some(error) = response.chart.error {
        return if error.code == "Not Found" {
            Err(ApiError::DataUnavailable(symbol.to_string()))
        } else {
            Err(ApiError::ApiError(format!("{}: {}", error.code, error.description)))
        };
    }

    let result = response
        .chart
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or_else(|| ApiError::DataUnavailable(symbol.to_string()))?;

    let observations = result.observations();
    let bars = result.timestamp.len();
    let priced = result.price_column().map_or(0, |column| column.len()).min(bars);
    if priced < bars {
        tracing::warn!(symbol, dropped = bars - priced, "Dropped bars missing from the price column.");
    }
    if observations.len() < priced {
        tracing::warn!(
            symbol,
            dropped = priced - observations.len(),
            "Dropped bars with an out-of-range timestamp."
        );
    }
    let series = Series::from_observations(symbol, observations);
    if series.defined_count() == 0 {
        return Err(ApiError::DataUnavailable(symbol.to_string()));
    }

    tracing::debug!(
        symbol,
        currency = result.meta.currency.as_deref().unwrap_or("?"),
        bars = series.len(),
        "Parsed chart response."
    );
    Ok(series)
}
