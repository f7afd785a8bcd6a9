//! KPI Calculator Module
//! Scalar summary statistics over the order table.

use crate::data::Order;
use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum KpiError {
    #[error("No orders available for KPI computation")]
    NoOrders,
}

/// One run's scalar sales summary.
#[derive(Debug, Clone, Serialize)]
pub struct KpiSnapshot {
    pub total_revenue: f64,
    pub total_orders: usize,
    pub unique_customers: usize,
    /// Total revenue / total orders.
    pub avg_order_value: f64,
    /// Orders per customer.
    pub purchase_frequency: f64,
    /// Fraction of customers with at least two orders.
    pub repeat_rate: f64,
}

impl KpiSnapshot {
    /// Compute the snapshot. Fails explicitly instead of dividing by
    /// zero when the order table is empty.
    pub fn compute(orders: &[Order]) -> Result<Self, KpiError> {
        if orders.is_empty() {
            return Err(KpiError::NoOrders);
        }

        let total_revenue: f64 = orders.iter().map(|o| o.order_value).sum();
        let total_orders = orders.len();

        let mut orders_per_customer: HashMap<&str, usize> = HashMap::new();
        for order in orders {
            *orders_per_customer
                .entry(order.customer_id.as_str())
                .or_insert(0) += 1;
        }
        let unique_customers = orders_per_customer.len();
        let repeaters = orders_per_customer.values().filter(|&&n| n >= 2).count();

        Ok(Self {
            total_revenue,
            total_orders,
            unique_customers,
            avg_order_value: total_revenue / total_orders as f64,
            purchase_frequency: total_orders as f64 / unique_customers as f64,
            repeat_rate: repeaters as f64 / unique_customers as f64,
        })
    }
}
