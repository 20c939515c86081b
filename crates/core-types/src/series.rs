use crate::error::CoreError;
use crate::log_return_column;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A named, date-indexed sequence of observations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub name: String,
    pub(crate) index: Vec<NaiveDate>,
    pub(crate) values: Vec<f64>,
}

/// Adjusted closing prices of one instrument.
pub type PriceSeries = Series;
/// Log returns of one instrument; the first entry is undefined.
pub type ReturnSeries = Series;
/// Weighted portfolio log returns.
pub type PortfolioReturnSeries = Series;

impl Series {
    /// Builds a series, rejecting mismatched lengths and unordered or duplicate dates.
    pub fn new(
        name: impl Into<String>,
        index: Vec<NaiveDate>,
        values: Vec<f64>,
    ) -> Result<Self, CoreError> {
        let name = name.into();
        if index.len() != values.len() {
            return Err(CoreError::LengthMismatch {
                context: format!("series '{}'", name),
                expected: index.len(),
                actual: values.len(),
            });
        }
        check_strictly_increasing(&index)?;
        Ok(Self { name, index, values })
    }

    /// Builds a series from unordered `(date, value)` observations.
    ///
    /// Observations are sorted by date; when a date repeats, the last observation wins.
    pub fn from_observations(
        name: impl Into<String>,
        mut observations: Vec<(NaiveDate, f64)>,
    ) -> Self {
        observations.sort_by_key(|(date, _)| *date);
        let mut index: Vec<NaiveDate> = Vec::with_capacity(observations.len());
        let mut values: Vec<f64> = Vec::with_capacity(observations.len());
        for (date, value) in observations {
            if index.last() == Some(&date) {
                if let Some(last) = values.last_mut() {
                    *last = value;
                }
                continue;
            }
            index.push(date);
            values.push(value);
        }
        Self {
            name: name.into(),
            index,
            values,
        }
    }

    pub fn index(&self) -> &[NaiveDate] {
        &self.index
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over `(date, value)` pairs in chronological order.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.index.iter().copied().zip(self.values.iter().copied())
    }

    /// Number of observations that are not undefined.
    pub fn defined_count(&self) -> usize {
        self.values.iter().filter(|v| !v.is_nan()).count()
    }

    /// The first defined observation, if any.
    pub fn first_defined(&self) -> Option<(NaiveDate, f64)> {
        self.iter().find(|(_, v)| !v.is_nan())
    }

    /// First difference of the natural log of each value.
    ///
    /// Keeps the source index; the first entry is always undefined.
    pub fn log_returns(&self) -> ReturnSeries {
        Self {
            name: self.name.clone(),
            index: self.index.clone(),
            values: log_return_column(&self.values),
        }
    }

    /// Returns a copy without its undefined observations.
    pub fn drop_undefined(&self) -> Self {
        let (index, values): (Vec<NaiveDate>, Vec<f64>) = self
            .iter()
            .filter(|(_, v)| !v.is_nan())
            .unzip();
        Self {
            name: self.name.clone(),
            index,
            values,
        }
    }

    /// Replaces the values, keeping the name and index.
    pub fn with_values(&self, values: Vec<f64>) -> Result<Self, CoreError> {
        Self::new(self.name.clone(), self.index.clone(), values)
    }
}

pub(crate) fn check_strictly_increasing(index: &[NaiveDate]) -> Result<(), CoreError> {
    match index.windows(2).position(|w| w[0] >= w[1]) {
        Some(position) => Err(CoreError::UnorderedIndex(position + 1)),
        None => Ok(()),
    }
}
