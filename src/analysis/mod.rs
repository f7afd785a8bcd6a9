//! Sales analytics: KPIs, rankings, time series, cohort retention, RFM.

pub mod cohort;
pub mod kpi;
pub mod ranking;
pub mod rfm;
pub mod timeseries;

pub use cohort::{CohortError, RetentionMatrix};
pub use kpi::{KpiError, KpiSnapshot};
pub use rfm::{RfmError, RfmRecord};
pub use timeseries::{MonthlySeries, WeekdayRevenue, WEEKDAY_NAMES};

use chrono::{Datelike, NaiveDate};
use std::fmt;

/// A calendar month, the grain of cohorts and monthly rollups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Absolute month number; consecutive months differ by exactly 1.
    pub fn ordinal(self) -> i32 {
        self.year * 12 + self.month as i32
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}
