//! Order Aggregator Module
//! Collapses cleaned line items into one record per order.

use crate::data::cleaner::OrderLine;
use chrono::NaiveDate;
use std::collections::HashMap;
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
pub enum OrderError {
    #[error("No order lines to aggregate")]
    NoLines,
    #[error("All orders were rejected during aggregation")]
    AllOrdersRejected,
}

/// One row per distinct order id.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub order_id: String,
    pub customer_id: String,
    /// Earliest line date of the order.
    pub order_date: NaiveDate,
    /// Sum of line quantities.
    pub items: i64,
    /// Sum of line totals.
    pub order_value: f64,
}

/// Groups lines by order id, preserving first-appearance order.
pub struct OrderAggregator;

impl OrderAggregator {
    /// Aggregate date-sorted lines into orders.
    ///
    /// An order whose lines carry conflicting customer ids is rejected
    /// (logged and excluded) instead of silently taking the first value.
    pub fn aggregate(lines: &[OrderLine]) -> Result<Vec<Order>, OrderError> {
        if lines.is_empty() {
            return Err(OrderError::NoLines);
        }

        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut orders: Vec<Order> = Vec::new();
        let mut conflicting: Vec<usize> = Vec::new();

        for line in lines {
            match index.get(line.order_id.as_str()) {
                Some(&pos) => {
                    let order = &mut orders[pos];
                    if order.customer_id != line.customer_id {
                        warn!(
                            order_id = %line.order_id,
                            "conflicting customer ids within one order; rejecting order"
                        );
                        conflicting.push(pos);
                        continue;
                    }
                    order.order_date = order.order_date.min(line.order_date);
                    order.items += line.quantity;
                    order.order_value += line.total_price();
                }
                None => {
                    index.insert(line.order_id.as_str(), orders.len());
                    orders.push(Order {
                        order_id: line.order_id.clone(),
                        customer_id: line.customer_id.clone(),
                        order_date: line.order_date,
                        items: line.quantity,
                        order_value: line.total_price(),
                    });
                }
            }
        }

        if !conflicting.is_empty() {
            conflicting.sort_unstable();
            conflicting.dedup();
            for &pos in conflicting.iter().rev() {
                orders.remove(pos);
            }
        }

        if orders.is_empty() {
            return Err(OrderError::AllOrdersRejected);
        }
        Ok(orders)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn line(order: &str, customer: &str, date: (i32, u32, u32), qty: i64, price: f64) -> OrderLine {
        OrderLine {
            order_id: order.to_string(),
            customer_id: customer.to_string(),
            product_name: "Widget".to_string(),
            order_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            quantity: qty,
            price,
        }
    }

    #[test]
    fn sums_quantities_and_totals_per_order() {
        let lines = vec![
            line("O1", "C1", (2024, 1, 5), 2, 10.0),
            line("O1", "C1", (2024, 1, 6), 1, 4.0),
            line("O2", "C2", (2024, 1, 7), 3, 2.0),
        ];
        let orders = OrderAggregator::aggregate(&lines).unwrap();
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].items, 3);
        assert_eq!(orders[0].order_value, 24.0);
        assert_eq!(
            orders[0].order_date,
            NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()
        );
        assert_eq!(orders[1].order_value, 6.0);
    }

    #[test]
    fn rejects_order_with_conflicting_customers() {
        let lines = vec![
            line("O1", "C1", (2024, 1, 5), 1, 10.0),
            line("O1", "C2", (2024, 1, 5), 1, 10.0),
            line("O2", "C3", (2024, 1, 6), 1, 5.0),
        ];
        let orders = OrderAggregator::aggregate(&lines).unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].order_id, "O2");
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(matches!(
            OrderAggregator::aggregate(&[]),
            Err(OrderError::NoLines)
        ));
    }

    #[test]
    fn every_order_id_is_unique() {
        let lines = vec![
            line("O1", "C1", (2024, 1, 5), 1, 1.0),
            line("O2", "C1", (2024, 1, 6), 1, 1.0),
            line("O1", "C1", (2024, 1, 7), 1, 1.0),
        ];
        let orders = OrderAggregator::aggregate(&lines).unwrap();
        let mut ids: Vec<_> = orders.iter().map(|o| o.order_id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), orders.len());
    }
}
