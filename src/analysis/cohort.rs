//! Cohort & Retention Engine
//! Groups customers by first-purchase month and tracks how many of each
//! cohort are still active in later months.

use crate::analysis::YearMonth;
use crate::data::Order;
use std::collections::{BTreeMap, HashMap, HashSet};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CohortError {
    #[error("No orders available for cohort analysis")]
    NoOrders,
}

/// Normalized cohort retention.
///
/// Rows are cohorts (first-purchase months, ascending), columns are
/// 1-based cohort indices. A missing cell means the cohort had no active
/// customer in that month, which is deliberately distinct from a cell
/// holding 0.0.
#[derive(Debug, Clone)]
pub struct RetentionMatrix {
    cohorts: Vec<YearMonth>,
    max_index: u32,
    sizes: HashMap<YearMonth, u32>,
    rates: HashMap<(YearMonth, u32), f64>,
}

impl RetentionMatrix {
    /// Build the matrix from the order table.
    ///
    /// CohortIndex = months between order month and cohort month + 1, so
    /// the cohort month itself is index 1. It can never be below 1: a
    /// customer's cohort is derived from their own earliest order.
    pub fn compute(orders: &[Order]) -> Result<Self, CohortError> {
        if orders.is_empty() {
            return Err(CohortError::NoOrders);
        }

        let mut first_month: HashMap<&str, YearMonth> = HashMap::new();
        for order in orders {
            let month = YearMonth::from_date(order.order_date);
            first_month
                .entry(order.customer_id.as_str())
                .and_modify(|m| {
                    if month < *m {
                        *m = month;
                    }
                })
                .or_insert(month);
        }

        let mut active: BTreeMap<(YearMonth, u32), HashSet<&str>> = BTreeMap::new();
        let mut max_index = 1u32;
        for order in orders {
            let cohort = first_month[order.customer_id.as_str()];
            let order_month = YearMonth::from_date(order.order_date);
            let index = (order_month.ordinal() - cohort.ordinal() + 1) as u32;
            max_index = max_index.max(index);
            active
                .entry((cohort, index))
                .or_default()
                .insert(order.customer_id.as_str());
        }

        let mut sizes: HashMap<YearMonth, u32> = HashMap::new();
        let mut cohorts: Vec<YearMonth> = Vec::new();
        for (&(cohort, index), customers) in &active {
            if index == 1 {
                sizes.insert(cohort, customers.len() as u32);
                cohorts.push(cohort);
            }
        }

        let mut rates: HashMap<(YearMonth, u32), f64> = HashMap::new();
        for (&(cohort, index), customers) in &active {
            // Index-1 counts always exist: every cohort member has an
            // order in the cohort month by definition.
            let size = sizes[&cohort] as f64;
            let rate = customers.len() as f64 / size;
            rates.insert((cohort, index), (rate * 1000.0).round() / 1000.0);
        }

        Ok(Self {
            cohorts,
            max_index,
            sizes,
            rates,
        })
    }

    /// Cohort months, ascending.
    pub fn cohorts(&self) -> &[YearMonth] {
        &self.cohorts
    }

    /// Largest cohort index observed in any cohort.
    pub fn max_index(&self) -> u32 {
        self.max_index
    }

    /// Initial member count of a cohort.
    pub fn cohort_size(&self, cohort: YearMonth) -> Option<u32> {
        self.sizes.get(&cohort).copied()
    }

    /// Retention fraction for one cell; `None` when nothing was observed.
    pub fn retention(&self, cohort: YearMonth, index: u32) -> Option<f64> {
        self.rates.get(&(cohort, index)).copied()
    }

    /// One cohort's full row over indices 1..=max_index.
    pub fn rate_row(&self, cohort: YearMonth) -> Vec<Option<f64>> {
        (1..=self.max_index)
            .map(|index| self.retention(cohort, index))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn order(id: &str, customer: &str, date: (i32, u32, u32)) -> Order {
        Order {
            order_id: id.to_string(),
            customer_id: customer.to_string(),
            order_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            items: 1,
            order_value: 10.0,
        }
    }

    fn ym(year: i32, month: u32) -> YearMonth {
        YearMonth { year, month }
    }

    #[test]
    fn one_of_two_customers_returning_is_half_retained() {
        // A orders in months 1 and 2, B only in month 1.
        let orders = vec![
            order("O1", "A", (2024, 1, 10)),
            order("O2", "B", (2024, 1, 15)),
            order("O3", "A", (2024, 2, 3)),
        ];
        let matrix = RetentionMatrix::compute(&orders).unwrap();
        assert_eq!(matrix.cohorts(), &[ym(2024, 1)]);
        assert_eq!(matrix.cohort_size(ym(2024, 1)), Some(2));
        assert_eq!(matrix.retention(ym(2024, 1), 1), Some(1.0));
        assert_eq!(matrix.retention(ym(2024, 1), 2), Some(0.5));
    }

    #[test]
    fn index_one_is_always_fully_retained() {
        let orders = vec![
            order("O1", "A", (2023, 11, 1)),
            order("O2", "B", (2024, 2, 1)),
            order("O3", "C", (2024, 2, 20)),
            order("O4", "B", (2024, 4, 1)),
        ];
        let matrix = RetentionMatrix::compute(&orders).unwrap();
        for &cohort in matrix.cohorts() {
            assert_eq!(matrix.retention(cohort, 1), Some(1.0));
        }
    }

    #[test]
    fn gap_months_stay_missing_not_zero() {
        let orders = vec![
            order("O1", "A", (2024, 1, 10)),
            order("O2", "A", (2024, 3, 10)),
        ];
        let matrix = RetentionMatrix::compute(&orders).unwrap();
        assert_eq!(matrix.max_index(), 3);
        let row = matrix.rate_row(ym(2024, 1));
        assert_eq!(row, vec![Some(1.0), None, Some(1.0)]);
    }

    #[test]
    fn index_crosses_year_boundary() {
        let orders = vec![
            order("O1", "A", (2023, 12, 5)),
            order("O2", "A", (2024, 1, 5)),
        ];
        let matrix = RetentionMatrix::compute(&orders).unwrap();
        assert_eq!(matrix.retention(ym(2023, 12), 2), Some(1.0));
    }

    #[test]
    fn rates_are_rounded_to_three_decimals() {
        // 3 initial members, 1 returns: 1/3 = 0.333...
        let orders = vec![
            order("O1", "A", (2024, 1, 1)),
            order("O2", "B", (2024, 1, 2)),
            order("O3", "C", (2024, 1, 3)),
            order("O4", "A", (2024, 2, 1)),
        ];
        let matrix = RetentionMatrix::compute(&orders).unwrap();
        assert_eq!(matrix.retention(ym(2024, 1), 2), Some(0.333));
    }

    #[test]
    fn empty_orders_fail() {
        assert!(matches!(
            RetentionMatrix::compute(&[]),
            Err(CohortError::NoOrders)
        ));
    }
}
