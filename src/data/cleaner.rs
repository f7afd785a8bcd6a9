//! Data Cleaner Module
//! Coerces raw string columns into typed line items and drops rows the
//! analyses cannot use.

use chrono::NaiveDate;
use polars::prelude::*;
use std::collections::HashSet;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum CleanerError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("No usable rows after cleaning (all rows dropped)")]
    NoUsableRows,
}

/// A single cleaned transaction line.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderLine {
    pub order_id: String,
    pub customer_id: String,
    pub product_name: String,
    pub order_date: NaiveDate,
    pub quantity: i64,
    pub price: f64,
}

impl OrderLine {
    /// Line-level revenue.
    pub fn total_price(&self) -> f64 {
        self.quantity as f64 * self.price
    }
}

/// Date formats accepted for `OrderDate`, tried in order.
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y-%m-%d %H:%M:%S", "%d/%m/%Y"];

fn parse_order_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    for fmt in DATE_FORMATS {
        if fmt.contains("%H") {
            if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(trimmed, fmt) {
                return Some(dt.date());
            }
        } else if let Ok(d) = NaiveDate::parse_from_str(trimmed, fmt) {
            return Some(d);
        }
    }
    None
}

/// Unparseable quantities coerce to 0 and are then removed by the
/// positivity filter, matching the row-exclusion taxonomy.
fn parse_quantity(raw: &str) -> i64 {
    let trimmed = raw.trim();
    trimmed
        .parse::<i64>()
        .ok()
        .or_else(|| trimmed.parse::<f64>().ok().map(|f| f as i64))
        .unwrap_or(0)
}

fn parse_price(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|p| p.is_finite())
}

/// Turns the raw all-string frame into typed, filtered, date-sorted lines.
pub struct DataCleaner;

impl DataCleaner {
    /// Clean the raw frame.
    ///
    /// Dropped rows: unparseable date, quantity <= 0 (including
    /// unparseable, which coerces to 0), price <= 0 or unparseable, and
    /// exact duplicates (first occurrence kept). The survivors are sorted
    /// by order date with a stable sort so the original row order breaks
    /// ties.
    pub fn clean(df: &DataFrame) -> Result<Vec<OrderLine>, CleanerError> {
        let order_ids = df.column("OrderID")?.str()?;
        let customer_ids = df.column("CustomerID")?.str()?;
        let product_names = df.column("ProductName")?.str()?;
        let order_dates = df.column("OrderDate")?.str()?;
        let quantities = df.column("Quantity")?.str()?;
        let prices = df.column("Price")?.str()?;

        let mut lines: Vec<OrderLine> = Vec::with_capacity(df.height());
        let mut seen: HashSet<(String, String, String, NaiveDate, i64, u64)> = HashSet::new();
        let mut dropped = 0usize;

        for i in 0..df.height() {
            let row = (
                order_ids.get(i),
                customer_ids.get(i),
                product_names.get(i),
                order_dates.get(i),
                quantities.get(i),
                prices.get(i),
            );
            let (Some(order_id), Some(customer_id), Some(product_name), Some(date_raw)) =
                (row.0, row.1, row.2, row.3)
            else {
                dropped += 1;
                continue;
            };

            let Some(order_date) = parse_order_date(date_raw) else {
                dropped += 1;
                continue;
            };
            let quantity = row.4.map(parse_quantity).unwrap_or(0);
            let price = row.5.and_then(parse_price).unwrap_or(0.0);
            if quantity <= 0 || price <= 0.0 {
                dropped += 1;
                continue;
            }

            let key = (
                order_id.to_string(),
                customer_id.to_string(),
                product_name.to_string(),
                order_date,
                quantity,
                price.to_bits(),
            );
            if !seen.insert(key) {
                dropped += 1;
                continue;
            }

            lines.push(OrderLine {
                order_id: order_id.to_string(),
                customer_id: customer_id.to_string(),
                product_name: product_name.to_string(),
                order_date,
                quantity,
                price,
            });
        }

        if lines.is_empty() {
            return Err(CleanerError::NoUsableRows);
        }

        lines.sort_by_key(|l| l.order_date);

        if dropped > 0 {
            debug!(dropped, kept = lines.len(), "dropped unusable rows");
        }
        info!(rows = lines.len(), "cleaned transaction lines");
        Ok(lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn raw_frame(rows: &[(&str, &str, &str, &str, &str, &str)]) -> DataFrame {
        let col = |f: fn(&(&str, &str, &str, &str, &str, &str)) -> String, name: &str| {
            Column::new(name.into(), rows.iter().map(f).collect::<Vec<_>>())
        };
        DataFrame::new(vec![
            col(|r| r.0.to_string(), "OrderID"),
            col(|r| r.1.to_string(), "CustomerID"),
            col(|r| r.2.to_string(), "ProductName"),
            col(|r| r.3.to_string(), "OrderDate"),
            col(|r| r.4.to_string(), "Quantity"),
            col(|r| r.5.to_string(), "Price"),
        ])
        .unwrap()
    }

    #[test]
    fn drops_bad_rows_and_sorts_by_date() {
        let df = raw_frame(&[
            ("O2", "C2", "Mug", "2024-02-01", "1", "5.00"),
            ("O1", "C1", "Widget", "2024-01-05", "2", "9.99"),
            ("O3", "C3", "Mug", "not-a-date", "1", "5.00"),
            ("O4", "C4", "Mug", "2024-03-01", "zero", "5.00"),
            ("O5", "C5", "Mug", "2024-03-01", "1", "-5.00"),
        ]);
        let lines = DataCleaner::clean(&df).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].order_id, "O1");
        assert_eq!(lines[1].order_id, "O2");
    }

    #[test]
    fn removes_exact_duplicates_only() {
        let df = raw_frame(&[
            ("O1", "C1", "Widget", "2024-01-05", "2", "9.99"),
            ("O1", "C1", "Widget", "2024-01-05", "2", "9.99"),
            ("O1", "C1", "Widget", "2024-01-05", "1", "9.99"),
        ]);
        let lines = DataCleaner::clean(&df).unwrap();
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn accepts_datetime_and_slash_formats() {
        let df = raw_frame(&[
            ("O1", "C1", "Widget", "2024-01-05 08:30:00", "1", "2.00"),
            ("O2", "C1", "Widget", "31/01/2024", "1", "2.00"),
        ]);
        let lines = DataCleaner::clean(&df).unwrap();
        assert_eq!(lines[0].order_date, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
        assert_eq!(lines[1].order_date, NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());
    }

    #[test]
    fn all_rows_dropped_is_an_error() {
        let df = raw_frame(&[("O1", "C1", "Widget", "2024-01-05", "0", "9.99")]);
        assert!(matches!(
            DataCleaner::clean(&df),
            Err(CleanerError::NoUsableRows)
        ));
    }

    #[test]
    fn total_price_is_quantity_times_price() {
        let df = raw_frame(&[("O1", "C1", "Widget", "2024-01-05", "2", "10.00")]);
        let lines = DataCleaner::clean(&df).unwrap();
        assert_eq!(lines[0].total_price(), 20.0);
    }
}
