use crate::enums::Frequency;
use crate::error::CoreError;
use crate::log_return_column;
use crate::series::{check_strictly_increasing, Series};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// A set of instruments observed on one shared, strictly increasing date index.
///
/// Values are stored column-major: `data[j][t]` is instrument `j` at row `t`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    index: Vec<NaiveDate>,
    columns: Vec<String>,
    data: Vec<Vec<f64>>,
}

/// Aligned closing prices, one column per instrument.
pub type PriceTable = Table;
/// Aligned log returns, one column per instrument.
pub type ReturnTable = Table;
/// Portfolio weights with the same shape as the returns they apply to.
pub type WeightTable = Table;

impl Table {
    /// Builds a table, validating its shape, index order and column names.
    pub fn new(
        index: Vec<NaiveDate>,
        columns: Vec<String>,
        data: Vec<Vec<f64>>,
    ) -> Result<Self, CoreError> {
        if columns.len() != data.len() {
            return Err(CoreError::LengthMismatch {
                context: "table columns".to_string(),
                expected: columns.len(),
                actual: data.len(),
            });
        }
        for (name, values) in columns.iter().zip(&data) {
            if values.len() != index.len() {
                return Err(CoreError::LengthMismatch {
                    context: format!("column '{}'", name),
                    expected: index.len(),
                    actual: values.len(),
                });
            }
        }
        let mut seen = HashSet::new();
        if let Some(duplicate) = columns.iter().find(|c| !seen.insert(c.as_str())) {
            return Err(CoreError::InvalidInput(
                "columns".to_string(),
                format!("duplicate column '{}'", duplicate),
            ));
        }
        check_strictly_increasing(&index)?;
        Ok(Self {
            index,
            columns,
            data,
        })
    }

    /// Outer-joins several series on the union of their dates.
    ///
    /// A series without an observation on a date contributes an undefined value there.
    pub fn align(series: &[Series]) -> Result<Self, CoreError> {
        let index: Vec<NaiveDate> = series
            .iter()
            .flat_map(|s| s.index().iter().copied())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let positions: BTreeMap<NaiveDate, usize> =
            index.iter().enumerate().map(|(i, d)| (*d, i)).collect();

        let mut data = Vec::with_capacity(series.len());
        for s in series {
            let mut column = vec![f64::NAN; index.len()];
            for (date, value) in s.iter() {
                if let Some(&row) = positions.get(&date) {
                    column[row] = value;
                }
            }
            data.push(column);
        }
        let columns = series.iter().map(|s| s.name.clone()).collect();
        Self::new(index, columns, data)
    }

    pub fn index(&self) -> &[NaiveDate] {
        &self.index
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn nrows(&self) -> usize {
        self.index.len()
    }

    pub fn ncols(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// The values of column `j`.
    pub fn column_values(&self, j: usize) -> &[f64] {
        &self.data[j]
    }

    /// Extracts a named column as a series.
    pub fn column(&self, name: &str) -> Option<Series> {
        let j = self.columns.iter().position(|c| c == name)?;
        Some(Series {
            name: name.to_string(),
            index: self.index.clone(),
            values: self.data[j].clone(),
        })
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[col][row]
    }

    /// Row `t` across all columns.
    pub fn row(&self, t: usize) -> Vec<f64> {
        self.data.iter().map(|column| column[t]).collect()
    }

    /// Whether every value in row `t` is defined.
    pub fn row_is_defined(&self, t: usize) -> bool {
        self.data.iter().all(|column| !column[t].is_nan())
    }

    /// Whether another table has the same index and columns.
    pub fn same_shape(&self, other: &Table) -> bool {
        self.index == other.index && self.columns == other.columns
    }

    /// Replaces the values, keeping index and columns.
    pub fn with_data(&self, data: Vec<Vec<f64>>) -> Result<Self, CoreError> {
        Self::new(self.index.clone(), self.columns.clone(), data)
    }

    /// Downsamples to `freq`, keeping per column the last defined value of each period.
    ///
    /// Rows are labelled with the period end date. Every calendar period between the
    /// first and last observation gets a row; periods without observations are
    /// undefined. Daily tables are returned unchanged.
    pub fn resample_last(&self, freq: Frequency) -> Self {
        if freq == Frequency::Daily {
            return self.clone();
        }

        let (Some(&first), Some(&last)) = (self.index.first(), self.index.last()) else {
            return self.clone();
        };
        let end = freq.period_end(last);
        let mut index: Vec<NaiveDate> = vec![freq.period_end(first)];
        while let Some(&label) = index.last() {
            if label >= end {
                break;
            }
            match label.succ_opt() {
                Some(next) => index.push(freq.period_end(next)),
                None => break,
            }
        }

        let mut data: Vec<Vec<f64>> = vec![vec![f64::NAN; index.len()]; self.ncols()];
        let mut slot = 0;
        for (t, date) in self.index.iter().enumerate() {
            let label = freq.period_end(*date);
            while slot + 1 < index.len() && index[slot] < label {
                slot += 1;
            }
            for (j, column) in data.iter_mut().enumerate() {
                let value = self.data[j][t];
                if !value.is_nan() {
                    column[slot] = value;
                }
            }
        }

        tracing::debug!(
            from = self.nrows(),
            to = index.len(),
            frequency = %freq,
            "Resampled table."
        );
        Self {
            index,
            columns: self.columns.clone(),
            data,
        }
    }

    /// Carries the last defined value of each column forward over undefined values.
    pub fn forward_fill(&self) -> Self {
        let data: Vec<Vec<f64>> = self
            .data
            .iter()
            .map(|column| {
                let mut last = f64::NAN;
                column
                    .iter()
                    .map(|&value| {
                        if !value.is_nan() {
                            last = value;
                        }
                        last
                    })
                    .collect::<Vec<f64>>()
            })
            .collect();
        Self {
            index: self.index.clone(),
            columns: self.columns.clone(),
            data,
        }
    }

    /// Removes every row containing at least one undefined value.
    pub fn drop_undefined_rows(&self) -> Self {
        let keep: Vec<usize> = (0..self.nrows()).filter(|&t| self.row_is_defined(t)).collect();
        if keep.len() < self.nrows() {
            tracing::debug!(dropped = self.nrows() - keep.len(), "Dropped undefined rows.");
        }
        Self {
            index: keep.iter().map(|&t| self.index[t]).collect(),
            columns: self.columns.clone(),
            data: self
                .data
                .iter()
                .map(|column| keep.iter().map(|&t| column[t]).collect::<Vec<f64>>())
                .collect(),
        }
    }

    /// First difference of the natural log of every column; the first row is undefined.
    pub fn log_returns(&self) -> ReturnTable {
        let data: Vec<Vec<f64>> = self.data.iter().map(|c| log_return_column(c)).collect();
        Self {
            index: self.index.clone(),
            columns: self.columns.clone(),
            data,
        }
    }

    /// Moves every value `periods` rows later; the vacated leading rows are undefined.
    pub fn shift(&self, periods: usize) -> Self {
        let data: Vec<Vec<f64>> = self
            .data
            .iter()
            .map(|column| {
                let n = column.len();
                let lag = periods.min(n);
                let mut shifted = vec![f64::NAN; lag];
                shifted.extend_from_slice(&column[..n - lag]);
                shifted
            })
            .collect();
        Self {
            index: self.index.clone(),
            columns: self.columns.clone(),
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn nan_eq(a: &[f64], b: &[f64]) -> bool {
        a.len() == b.len()
            && a.iter()
                .zip(b)
                .all(|(x, y)| (x.is_nan() && y.is_nan()) || x == y)
    }

    #[test]
    fn align_outer_joins_on_union_of_dates() {
        let es = Series::new("ES=F", vec![date(2024, 1, 2), date(2024, 1, 3)], vec![1.0, 2.0])
            .unwrap();
        let gc = Series::new("GC=F", vec![date(2024, 1, 3), date(2024, 1, 4)], vec![5.0, 6.0])
            .unwrap();
        let table = Table::align(&[es, gc]).unwrap();

        assert_eq!(table.index(), &[date(2024, 1, 2), date(2024, 1, 3), date(2024, 1, 4)]);
        assert_eq!(table.columns(), &["ES=F".to_string(), "GC=F".to_string()]);
        assert!(nan_eq(table.column_values(0), &[1.0, 2.0, f64::NAN]));
        assert!(nan_eq(table.column_values(1), &[f64::NAN, 5.0, 6.0]));
    }

    #[test]
    fn align_rejects_duplicate_instruments() {
        let es = Series::new("ES=F", vec![date(2024, 1, 2)], vec![1.0]).unwrap();
        assert!(Table::align(&[es.clone(), es]).is_err());
    }

    #[test]
    fn resample_keeps_last_defined_value_per_month() {
        let table = Table::new(
            vec![date(2024, 1, 30), date(2024, 1, 31), date(2024, 2, 1), date(2024, 2, 15)],
            vec!["ES=F".to_string()],
            vec![vec![1.0, f64::NAN, 3.0, 4.0]],
        )
        .unwrap();
        let monthly = table.resample_last(Frequency::Monthly);

        assert_eq!(monthly.index(), &[date(2024, 1, 31), date(2024, 2, 29)]);
        assert_eq!(monthly.column_values(0), &[1.0, 4.0]);
    }

    #[test]
    fn resample_keeps_calendar_months_without_observations() {
        let table = Table::new(
            vec![date(2024, 1, 15), date(2024, 3, 15), date(2024, 4, 15)],
            vec!["ES=F".to_string()],
            vec![vec![100.0, 110.0, 121.0]],
        )
        .unwrap();
        let monthly = table.resample_last(Frequency::Monthly);

        assert_eq!(
            monthly.index(),
            &[date(2024, 1, 31), date(2024, 2, 29), date(2024, 3, 31), date(2024, 4, 30)]
        );
        assert!(nan_eq(monthly.column_values(0), &[100.0, f64::NAN, 110.0, 121.0]));

        let filled = monthly.forward_fill();
        assert_eq!(filled.column_values(0), &[100.0, 100.0, 110.0, 121.0]);
        let returns = filled.log_returns();
        assert_eq!(returns.get(1, 0), 0.0);
    }

    #[test]
    fn resample_weekly_fills_in_skipped_weeks() {
        // 2024-01-03 is a Wednesday; the week ending 2024-01-14 has no rows.
        let table = Table::new(
            vec![date(2024, 1, 3), date(2024, 1, 5), date(2024, 1, 17)],
            vec!["ZN=F".to_string()],
            vec![vec![1.0, 2.0, 3.0]],
        )
        .unwrap();
        let weekly = table.resample_last(Frequency::Weekly);

        assert_eq!(
            weekly.index(),
            &[date(2024, 1, 7), date(2024, 1, 14), date(2024, 1, 21)]
        );
        assert!(nan_eq(weekly.column_values(0), &[2.0, f64::NAN, 3.0]));
    }

    #[test]
    fn forward_fill_then_drop_removes_only_leading_rows() {
        let table = Table::new(
            vec![date(2024, 1, 1), date(2024, 1, 2), date(2024, 1, 3), date(2024, 1, 4)],
            vec!["ES=F".to_string(), "ZN=F".to_string()],
            vec![
                vec![1.0, 2.0, f64::NAN, 4.0],
                vec![f64::NAN, 10.0, 11.0, f64::NAN],
            ],
        )
        .unwrap();
        let prepared = table.forward_fill().drop_undefined_rows();

        assert_eq!(prepared.index(), &[date(2024, 1, 2), date(2024, 1, 3), date(2024, 1, 4)]);
        assert_eq!(prepared.column_values(0), &[2.0, 2.0, 4.0]);
        assert_eq!(prepared.column_values(1), &[10.0, 11.0, 11.0]);
    }

    #[test]
    fn shift_moves_values_down_one_row() {
        let table = Table::new(
            vec![date(2024, 1, 1), date(2024, 1, 2), date(2024, 1, 3)],
            vec!["ES=F".to_string()],
            vec![vec![1.0, 2.0, 3.0]],
        )
        .unwrap();
        let shifted = table.shift(1);
        assert!(nan_eq(shifted.column_values(0), &[f64::NAN, 1.0, 2.0]));
        assert!(shifted.shift(5).column_values(0).iter().all(|v| v.is_nan()));
    }

    #[test]
    fn column_extracts_named_series() {
        let table = Table::new(
            vec![date(2024, 1, 1), date(2024, 1, 2)],
            vec!["ES=F".to_string(), "GC=F".to_string()],
            vec![vec![1.0, 2.0], vec![3.0, 4.0]],
        )
        .unwrap();
        let gold = table.column("GC=F").unwrap();
        assert_eq!(gold.values(), &[3.0, 4.0]);
        assert!(table.column("CL=F").is_none());
    }
}
