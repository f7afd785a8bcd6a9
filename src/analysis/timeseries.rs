//! Time-Series Aggregator Module
//! Monthly, daily, and weekday revenue rollups with smoothing.

use crate::analysis::YearMonth;
use crate::data::Order;
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;

/// Fixed Monday-first weekday axis.
pub const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Window of the trailing rolling average applied to monthly revenue.
pub const ROLLING_WINDOW: usize = 3;

/// Observed months only, ascending. Months with no orders do not appear.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlySeries {
    pub months: Vec<YearMonth>,
    pub revenue: Vec<f64>,
    /// 3-month trailing mean; the window shrinks to the available
    /// prefix for the first two points.
    pub smoothed: Vec<f64>,
}

impl MonthlySeries {
    pub fn compute(orders: &[Order]) -> Self {
        let mut by_month: BTreeMap<YearMonth, f64> = BTreeMap::new();
        for order in orders {
            *by_month
                .entry(YearMonth::from_date(order.order_date))
                .or_insert(0.0) += order.order_value;
        }
        let months: Vec<YearMonth> = by_month.keys().copied().collect();
        let revenue: Vec<f64> = by_month.values().copied().collect();
        let smoothed = rolling_mean(&revenue, ROLLING_WINDOW);
        Self {
            months,
            revenue,
            smoothed,
        }
    }
}

/// Trailing rolling mean with partial windows at the start.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    values
        .iter()
        .enumerate()
        .map(|(i, _)| {
            let start = i.saturating_sub(window - 1);
            let slice = &values[start..=i];
            slice.iter().sum::<f64>() / slice.len() as f64
        })
        .collect()
}

/// Revenue per weekday on the fixed Monday-Sunday axis. A weekday with
/// no orders stays `None`, which is not the same as zero revenue.
#[derive(Debug, Clone, PartialEq)]
pub struct WeekdayRevenue {
    pub revenue: [Option<f64>; 7],
}

impl WeekdayRevenue {
    pub fn compute(orders: &[Order]) -> Self {
        let mut revenue: [Option<f64>; 7] = [None; 7];
        for order in orders {
            let idx = order.order_date.weekday().num_days_from_monday() as usize;
            revenue[idx] = Some(revenue[idx].unwrap_or(0.0) + order.order_value);
        }
        Self { revenue }
    }
}

/// Revenue per calendar day, ascending.
pub fn daily_revenue(orders: &[Order]) -> Vec<(NaiveDate, f64)> {
    let mut by_day: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for order in orders {
        *by_day.entry(order.order_date).or_insert(0.0) += order.order_value;
    }
    by_day.into_iter().collect()
}
