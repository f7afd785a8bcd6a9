//! Ranking Engine Module
//! Top-N queries over customers and products.

use crate::data::{Order, OrderLine};
use std::collections::HashMap;

/// Default cut-off for every ranking.
pub const TOP_N: usize = 10;

/// Sorts descending by measure; ties break ascending by name so runs
/// over identical input rank identically.
fn top_n<T: PartialOrd + Copy>(counts: HashMap<&str, T>, n: usize) -> Vec<(String, T)> {
    let mut ranked: Vec<(String, T)> = counts
        .into_iter()
        .map(|(name, v)| (name.to_string(), v))
        .collect();
    ranked.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });
    ranked.truncate(n);
    ranked
}

/// Customers with the most distinct orders.
pub fn frequent_buyers(orders: &[Order], n: usize) -> Vec<(String, u64)> {
    let mut counts: HashMap<&str, u64> = HashMap::new();
    for order in orders {
        *counts.entry(order.customer_id.as_str()).or_insert(0) += 1;
    }
    top_n(counts, n)
}

/// Products by summed unit volume.
pub fn top_products_by_units(lines: &[OrderLine], n: usize) -> Vec<(String, i64)> {
    let mut units: HashMap<&str, i64> = HashMap::new();
    for line in lines {
        *units.entry(line.product_name.as_str()).or_insert(0) += line.quantity;
    }
    top_n(units, n)
}

/// Products by summed line revenue.
pub fn top_products_by_revenue(lines: &[OrderLine], n: usize) -> Vec<(String, f64)> {
    let mut revenue: HashMap<&str, f64> = HashMap::new();
    for line in lines {
        *revenue.entry(line.product_name.as_str()).or_insert(0.0) += line.total_price();
    }
    top_n(revenue, n)
}
