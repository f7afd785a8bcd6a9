//! ShopMetrics - E-commerce Sales Analytics
//!
//! Usage: `shopmetrics [input.csv] [output-dir]`
//! Defaults: `ecommerce_data.csv` in the working directory, reports
//! under `reports/`.

use anyhow::{Context, Result};
use chrono::Datelike;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

use shopmetrics::analysis::{
    ranking, rfm, timeseries, KpiSnapshot, MonthlySeries, RetentionMatrix, WeekdayRevenue,
    WEEKDAY_NAMES,
};
use shopmetrics::charts::ChartPlotter;
use shopmetrics::data::{DataCleaner, DataLoader, OrderAggregator};
use shopmetrics::report::ReportExporter;
use shopmetrics::stats::StatsCalculator;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let input = PathBuf::from(args.next().unwrap_or_else(|| "ecommerce_data.csv".into()));
    let out_dir = PathBuf::from(args.next().unwrap_or_else(|| "reports".into()));

    run(&input, &out_dir)
}

fn run(input: &Path, out_dir: &Path) -> Result<()> {
    info!(input = %input.display(), "loading transactions");
    let raw = DataLoader::load_csv(input)
        .with_context(|| format!("loading {}", input.display()))?;
    let lines = DataCleaner::clean(&raw)?;
    let orders = OrderAggregator::aggregate(&lines)?;
    info!(
        lines = lines.len(),
        orders = orders.len(),
        "aggregated order table"
    );

    let kpi = KpiSnapshot::compute(&orders)?;
    info!(
        total_revenue = kpi.total_revenue,
        total_orders = kpi.total_orders,
        unique_customers = kpi.unique_customers,
        avg_order_value = kpi.avg_order_value,
        purchase_frequency = kpi.purchase_frequency,
        repeat_rate = kpi.repeat_rate,
        "KPI snapshot"
    );

    if let Some(stats) = StatsCalculator::revenue_stats(&lines) {
        info!(
            mean = stats.mean,
            std = stats.std,
            median = stats.median,
            p25 = stats.p25,
            p75 = stats.p75,
            "line revenue distribution"
        );
    }

    let buyers = ranking::frequent_buyers(&orders, ranking::TOP_N);
    for (customer, count) in &buyers {
        info!(customer = %customer, orders = count, "frequent buyer");
    }
    let top_units = ranking::top_products_by_units(&lines, ranking::TOP_N);
    let top_revenue = ranking::top_products_by_revenue(&lines, ranking::TOP_N);

    let monthly = MonthlySeries::compute(&orders);
    let weekday = WeekdayRevenue::compute(&orders);
    if let Some((day, revenue)) = timeseries::daily_revenue(&orders)
        .into_iter()
        .max_by(|a, b| a.1.total_cmp(&b.1))
    {
        let name = WEEKDAY_NAMES[day.weekday().num_days_from_monday() as usize];
        info!(%day, revenue, weekday = name, "busiest day");
    }

    let retention = RetentionMatrix::compute(&orders)?;
    let rfm_records = rfm::score(&orders)?;

    fs::create_dir_all(out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;
    let charts_dir = out_dir.join("charts");
    fs::create_dir_all(&charts_dir)?;

    ReportExporter::write_monthly_revenue(&monthly, &out_dir.join("monthly_revenue.csv"))?;
    ReportExporter::write_retention(&retention, &out_dir.join("cohort_retention.csv"))?;
    ReportExporter::write_rfm(&rfm_records, &out_dir.join("rfm_scores.csv"))?;
    ReportExporter::write_kpi_summary(&kpi, &out_dir.join("kpi_summary.json"))?;
    info!(out_dir = %out_dir.display(), "wrote summary reports");

    ChartPlotter::render_monthly_revenue(&monthly, &charts_dir.join("monthly_revenue.png"))?;
    ChartPlotter::render_weekday_revenue(&weekday, &charts_dir.join("weekday_revenue.png"))?;
    ChartPlotter::render_ranking(
        "Top Products by Units",
        "Units",
        &to_chart_items(&top_units),
        &charts_dir.join("top_products_units.png"),
    )?;
    ChartPlotter::render_ranking(
        "Top Products by Revenue",
        "Revenue",
        &top_revenue,
        &charts_dir.join("top_products_revenue.png"),
    )?;
    ChartPlotter::render_retention_heatmap(&retention, &charts_dir.join("cohort_retention.png"))?;
    info!(charts_dir = %charts_dir.display(), "rendered charts");

    Ok(())
}

fn to_chart_items(items: &[(String, i64)]) -> Vec<(String, f64)> {
    items
        .iter()
        .map(|(name, v)| (name.clone(), *v as f64))
        .collect()
}
