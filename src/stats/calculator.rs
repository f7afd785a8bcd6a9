//! Statistics Calculator Module
//! Descriptive statistics over line-level revenue.

use crate::data::OrderLine;

/// Descriptive summary of line revenue.
#[derive(Debug, Clone, PartialEq)]
pub struct RevenueStats {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation (n - 1 denominator).
    pub std: f64,
    pub p25: f64,
    pub p75: f64,
}

pub struct StatsCalculator;

impl StatsCalculator {
    /// Compute descriptive statistics; `None` when there is no data.
    pub fn revenue_stats(lines: &[OrderLine]) -> Option<RevenueStats> {
        let values: Vec<f64> = lines.iter().map(|l| l.total_price()).collect();
        Self::describe(&values)
    }

    fn describe(values: &[f64]) -> Option<RevenueStats> {
        let n = values.len();
        if n == 0 {
            return None;
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let mean = values.iter().sum::<f64>() / n as f64;
        let variance = if n > 1 {
            values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64
        } else {
            0.0
        };

        Some(RevenueStats {
            count: n,
            mean,
            median: Self::percentile(&sorted, 50.0),
            std: variance.sqrt(),
            p25: Self::percentile(&sorted, 25.0),
            p75: Self::percentile(&sorted, 75.0),
        })
    }

    /// Calculate percentile using linear interpolation (NumPy compatible).
    fn percentile(sorted_values: &[f64], p: f64) -> f64 {
        let n = sorted_values.len();
        if n == 0 {
            return f64::NAN;
        }
        if n == 1 {
            return sorted_values[0];
        }

        let rank = (p / 100.0) * (n - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = (rank.ceil() as usize).min(n - 1);
        let frac = rank - lower as f64;

        if lower == upper {
            sorted_values[lower]
        } else {
            sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
        }
    }
}
