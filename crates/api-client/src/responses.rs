use chrono::{DateTime, NaiveDate};
use serde::Deserialize;

// Using `#[serde(rename_all = "camelCase")]` to map Yahoo's camelCase keys onto snake_case fields.

/// The envelope of `GET /v8/finance/chart/{symbol}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChartResponse {
    pub chart: Chart,
}

/// Exactly one of `result` and `error` is populated.
#[derive(Debug, Clone, Deserialize)]
pub struct Chart {
    pub result: Option<Vec<ChartResult>>,
    pub error: Option<ChartError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartResult {
    pub meta: ChartMeta,
    /// Seconds since the epoch, one per bar. Absent when the range holds no bars.
    #[serde(default)]
    pub timestamp: Vec<i64>,
    pub indicators: Indicators,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartMeta {
    pub currency: Option<String>,
    /// Offset of the exchange time zone from UTC, in seconds.
    #[serde(default)]
    pub gmtoffset: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Indicators {
    #[serde(default)]
    pub quote: Vec<Quote>,
    #[serde(default)]
    pub adjclose: Vec<AdjClose>,
}

/// Raw OHLC columns; `null` marks a bar without a print.
#[derive(Debug, Clone, Deserialize)]
pub struct Quote {
    #[serde(default)]
    pub close: Vec<Option<f64>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdjClose {
    #[serde(default)]
    pub adjclose: Vec<Option<f64>>,
}

/// Represents an error response from the Yahoo chart API.
#[derive(Debug, Clone, Deserialize)]
pub struct ChartError {
    pub code: String,
    pub description: String,
}

impl ChartResult {
    /// The adjusted closes when the response carries a full column of them, raw closes otherwise.
    pub fn price_column(&self) -> Option<&[Option<f64>]> {
        let adjusted = self
            .indicators
            .adjclose
            .first()
            .map(|a| a.adjclose.as_slice())
            .filter(|column| column.len() == self.timestamp.len());
        adjusted.or_else(|| self.indicators.quote.first().map(|q| q.close.as_slice()))
    }

    /// Closing prices keyed by exchange-local trading date.
    ///
    /// Bars past the end of the price column, or with an unrepresentable
    /// timestamp, are left out. Missing prints become `NaN`.
    pub fn observations(&self) -> Vec<(NaiveDate, f64)> {
        let Some(closes) = self.price_column() else {
            return Vec::new();
        };

        self.timestamp
            .iter()
            .zip(closes)
            .filter_map(|(ts, close)| {
                let local = DateTime::from_timestamp(ts + self.meta.gmtoffset, 0)?;
                Some((local.date_naive(), close.unwrap_or(f64::NAN)))
            })
            .collect()
    }
}
