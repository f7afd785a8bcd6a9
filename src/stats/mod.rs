//! Descriptive statistics over the cleaned transaction lines.

pub mod calculator;

pub use calculator::{RevenueStats, StatsCalculator};
