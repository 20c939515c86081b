use crate::error::CoreError;
use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The sampling frequency of a price or return table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
}

impl Frequency {
    /// The number of periods in one year, used to annualize statistics.
    pub fn periods_per_year(&self) -> f64 {
        match self {
            Frequency::Daily => 252.0,
            Frequency::Weekly => 52.0,
            Frequency::Monthly => 12.0,
        }
    }

    /// Returns the label of the period that contains `date`.
    ///
    /// Weekly periods end on Sunday and monthly periods on the last calendar day
    /// of the month. Daily periods are the date itself.
    pub fn period_end(&self, date: NaiveDate) -> NaiveDate {
        match self {
            Frequency::Daily => date,
            Frequency::Weekly => {
                let days_to_sunday = 6 - date.weekday().num_days_from_monday();
                date.checked_add_days(Days::new(u64::from(days_to_sunday)))
                    .unwrap_or(date)
            }
            Frequency::Monthly => {
                let (year, month) = if date.month() == 12 {
                    (date.year() + 1, 1)
                } else {
                    (date.year(), date.month() + 1)
                };
                NaiveDate::from_ymd_opt(year, month, 1)
                    .and_then(|first_of_next| first_of_next.pred_opt())
                    .unwrap_or(date)
            }
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
        };
        f.write_str(name)
    }
}

impl FromStr for Frequency {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "d" | "daily" => Ok(Frequency::Daily),
            "w" | "weekly" => Ok(Frequency::Weekly),
            "m" | "monthly" => Ok(Frequency::Monthly),
            other => Err(CoreError::InvalidInput(
                "frequency".to_string(),
                format!("unknown frequency '{}'", other),
            )),
        }
    }
}
