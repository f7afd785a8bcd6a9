//! ShopMetrics - E-commerce Sales Analytics
//!
//! Batch pipeline over a flat transaction CSV: load, clean, aggregate
//! line items into orders, then compute KPIs, rankings, time-series
//! rollups, cohort retention, and RFM segmentation. Results are written
//! as summary CSVs, a KPI JSON snapshot, and static PNG charts.

pub mod analysis;
pub mod charts;
pub mod data;
pub mod report;
pub mod stats;
