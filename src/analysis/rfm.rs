//! RFM Segmentation Engine
//! Scores customers 1-5 on recency, frequency, and monetary value using
//! rank-balanced quantile bins.

use crate::data::Order;
use chrono::{Days, NaiveDate};
use std::collections::HashMap;
use thiserror::Error;

/// Number of quantile bins per metric.
pub const BINS: u8 = 5;

#[derive(Error, Debug)]
pub enum RfmError {
    #[error("No orders available for RFM segmentation")]
    NoOrders,
    #[error("RFM quantile scoring needs at least {BINS} customers, found {found}")]
    TooFewCustomers { found: usize },
}

/// Per-customer recency/frequency/monetary record with quantile scores.
#[derive(Debug, Clone, PartialEq)]
pub struct RfmRecord {
    pub customer_id: String,
    /// Whole days between the customer's last order and the snapshot
    /// date (max order date + 1 day), so always >= 1.
    pub recency_days: i64,
    /// Distinct order count.
    pub frequency: u64,
    /// Summed order value.
    pub monetary: f64,
    pub r_score: u8,
    pub f_score: u8,
    pub m_score: u8,
}

impl RfmRecord {
    /// Three-digit segment string, e.g. "531".
    pub fn segment(&self) -> String {
        format!("{}{}{}", self.r_score, self.f_score, self.m_score)
    }
}

/// Assigns each value a bin 0..BINS by ascending rank. Ties keep their
/// slice order (stable sort), so every customer gets a distinct rank and
/// bin sizes differ by at most one even with duplicate values.
fn quantile_bins(values: &[f64]) -> Vec<u8> {
    let n = values.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        values[a]
            .partial_cmp(&values[b])
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    let mut bins = vec![0u8; n];
    for (rank, &idx) in order.iter().enumerate() {
        bins[idx] = (rank * BINS as usize / n) as u8;
    }
    bins
}

/// Score all customers found in the order table.
///
/// Customer order follows first appearance in the date-sorted order
/// table; that order is also the quantile tie-break. Fewer than `BINS`
/// customers cannot fill five bins and is rejected up front.
pub fn score(orders: &[Order]) -> Result<Vec<RfmRecord>, RfmError> {
    let Some(max_date) = orders.iter().map(|o| o.order_date).max() else {
        return Err(RfmError::NoOrders);
    };
    let snapshot: NaiveDate = max_date + Days::new(1);

    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut customers: Vec<(String, NaiveDate, u64, f64)> = Vec::new();
    for order in orders {
        match index.get(order.customer_id.as_str()) {
            Some(&pos) => {
                let entry = &mut customers[pos];
                entry.1 = entry.1.max(order.order_date);
                entry.2 += 1;
                entry.3 += order.order_value;
            }
            None => {
                index.insert(order.customer_id.as_str(), customers.len());
                customers.push((order.customer_id.clone(), order.order_date, 1, order.order_value));
            }
        }
    }

    if customers.len() < BINS as usize {
        return Err(RfmError::TooFewCustomers {
            found: customers.len(),
        });
    }

    let recency: Vec<f64> = customers
        .iter()
        .map(|c| (snapshot - c.1).num_days() as f64)
        .collect();
    let frequency: Vec<f64> = customers.iter().map(|c| c.2 as f64).collect();
    let monetary: Vec<f64> = customers.iter().map(|c| c.3).collect();

    // Low recency means a recent customer, so the recency axis scores in
    // reverse: the lowest bin gets 5 and the highest gets 1.
    let r_bins = quantile_bins(&recency);
    let f_bins = quantile_bins(&frequency);
    let m_bins = quantile_bins(&monetary);

    Ok(customers
        .into_iter()
        .enumerate()
        .map(|(i, (customer_id, _, freq, monetary))| RfmRecord {
            customer_id,
            recency_days: recency[i] as i64,
            frequency: freq,
            monetary,
            r_score: BINS - r_bins[i],
            f_score: f_bins[i] + 1,
            m_score: m_bins[i] + 1,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn order(id: &str, customer: &str, date: (i32, u32, u32), value: f64) -> Order {
        Order {
            order_id: id.to_string(),
            customer_id: customer.to_string(),
            order_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            items: 1,
            order_value: value,
        }
    }

    /// Five customers, one order each on consecutive days with rising
    /// spend, so every metric has a clean ordering.
    fn five_customers() -> Vec<Order> {
        (0..5)
            .map(|i| {
                order(
                    &format!("O{i}"),
                    &format!("C{i}"),
                    (2024, 1, 10 + i as u32),
                    10.0 * (i + 1) as f64,
                )
            })
            .collect()
    }

    #[test]
    fn scores_stay_in_range_and_bins_balance() {
        let mut orders = five_customers();
        // Second orders for two customers to vary frequency.
        orders.push(order("O10", "C0", (2024, 1, 20), 5.0));
        orders.push(order("O11", "C3", (2024, 1, 21), 5.0));
        let records = score(&orders).unwrap();
        assert_eq!(records.len(), 5);

        let mut f_counts = [0usize; 5];
        for r in &records {
            for s in [r.r_score, r.f_score, r.m_score] {
                assert!((1..=5).contains(&s));
            }
            f_counts[(r.f_score - 1) as usize] += 1;
        }
        let max = *f_counts.iter().max().unwrap();
        let min = *f_counts.iter().min().unwrap();
        assert!(max - min <= 1);
    }

    #[test]
    fn recent_customer_scores_high_recency() {
        let records = score(&five_customers()).unwrap();
        let last = records.iter().find(|r| r.customer_id == "C4").unwrap();
        let first = records.iter().find(|r| r.customer_id == "C0").unwrap();
        assert_eq!(last.r_score, 5);
        assert_eq!(first.r_score, 1);
        // Snapshot is max order date + 1, so the freshest customer is 1
        // day out.
        assert_eq!(last.recency_days, 1);
        assert_eq!(first.recency_days, 5);
    }

    #[test]
    fn monetary_sums_across_orders() {
        let mut orders = five_customers();
        orders.push(order("O20", "C2", (2024, 1, 25), 90.0));
        let records = score(&orders).unwrap();
        let c2 = records.iter().find(|r| r.customer_id == "C2").unwrap();
        assert_eq!(c2.monetary, 120.0);
        assert_eq!(c2.frequency, 2);
        assert_eq!(c2.m_score, 5);
    }

    #[test]
    fn segment_concatenates_scores() {
        let records = score(&five_customers()).unwrap();
        let c4 = records.iter().find(|r| r.customer_id == "C4").unwrap();
        assert_eq!(c4.segment(), format!("{}{}{}", c4.r_score, c4.f_score, c4.m_score));
        assert_eq!(c4.segment().len(), 3);
    }

    #[test]
    fn duplicate_values_still_fill_five_bins() {
        // All customers order on the same day with the same spend.
        let orders: Vec<Order> = (0..5)
            .map(|i| order(&format!("O{i}"), &format!("C{i}"), (2024, 1, 10), 10.0))
            .collect();
        let records = score(&orders).unwrap();
        let mut m_scores: Vec<u8> = records.iter().map(|r| r.m_score).collect();
        m_scores.sort_unstable();
        assert_eq!(m_scores, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn too_few_customers_is_rejected() {
        let orders = vec![
            order("O1", "C1", (2024, 1, 1), 10.0),
            order("O2", "C2", (2024, 1, 2), 10.0),
        ];
        assert!(matches!(
            score(&orders),
            Err(RfmError::TooFewCustomers { found: 2 })
        ));
    }

    #[test]
    fn no_orders_is_rejected() {
        assert!(matches!(score(&[]), Err(RfmError::NoOrders)));
    }
}
