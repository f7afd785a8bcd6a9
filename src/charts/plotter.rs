//! Chart Plotter Module
//! Renders static PNG charts with plotters.

use crate::analysis::{MonthlySeries, RetentionMatrix, WeekdayRevenue, WEEKDAY_NAMES};
use plotters::prelude::*;
use std::path::Path;
use thiserror::Error;

/// Output bitmap size for every chart.
pub const CHART_SIZE: (u32, u32) = (1000, 600);

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Failed to render chart: {0}")]
    Render(String),
    #[error("Nothing to plot")]
    EmptySeries,
}

fn render_err<E: std::fmt::Display>(e: E) -> ChartError {
    ChartError::Render(e.to_string())
}

const REVENUE_COLOR: RGBColor = RGBColor(52, 152, 219);
const SMOOTH_COLOR: RGBColor = RGBColor(231, 76, 60);
const BAR_COLOR: RGBColor = RGBColor(46, 134, 193);

/// Renders every report chart to PNG files.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Monthly revenue line with the 3-month rolling average overlaid.
    pub fn render_monthly_revenue(series: &MonthlySeries, path: &Path) -> Result<(), ChartError> {
        let n = series.months.len();
        if n == 0 {
            return Err(ChartError::EmptySeries);
        }

        let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;

        let y_max = series
            .revenue
            .iter()
            .chain(series.smoothed.iter())
            .fold(0.0f64, |m, &v| m.max(v))
            * 1.1;
        let labels: Vec<String> = series.months.iter().map(|m| m.to_string()).collect();

        let mut chart = ChartBuilder::on(&root)
            .caption("Monthly Revenue", ("sans-serif", 28))
            .margin(10)
            .x_label_area_size(45)
            .y_label_area_size(70)
            .build_cartesian_2d(-0.5f64..(n as f64 - 0.5), 0f64..y_max)
            .map_err(render_err)?;

        chart
            .configure_mesh()
            .x_labels(n.min(12))
            .x_label_formatter(&|x| {
                let i = x.round();
                if i < 0.0 || (x - i).abs() > 0.25 {
                    return String::new();
                }
                labels.get(i as usize).cloned().unwrap_or_default()
            })
            .y_desc("Revenue")
            .draw()
            .map_err(render_err)?;

        chart
            .draw_series(LineSeries::new(
                series.revenue.iter().enumerate().map(|(i, &v)| (i as f64, v)),
                REVENUE_COLOR.stroke_width(2),
            ))
            .map_err(render_err)?
            .label("Revenue")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], REVENUE_COLOR));

        chart
            .draw_series(LineSeries::new(
                series.smoothed.iter().enumerate().map(|(i, &v)| (i as f64, v)),
                SMOOTH_COLOR.stroke_width(2),
            ))
            .map_err(render_err)?
            .label("3M rolling avg")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], SMOOTH_COLOR));

        chart
            .configure_series_labels()
            .border_style(BLACK)
            .background_style(WHITE.mix(0.8))
            .draw()
            .map_err(render_err)?;

        root.present().map_err(render_err)
    }

    /// Revenue-by-weekday bars on the fixed Monday-Sunday axis. Weekdays
    /// without observations get no bar at all.
    pub fn render_weekday_revenue(weekday: &WeekdayRevenue, path: &Path) -> Result<(), ChartError> {
        let observed: Vec<(usize, f64)> = weekday
            .revenue
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.map(|v| (i, v)))
            .collect();
        if observed.is_empty() {
            return Err(ChartError::EmptySeries);
        }
        let labels: Vec<String> = WEEKDAY_NAMES.iter().map(|s| s.to_string()).collect();
        Self::render_bars("Revenue by Weekday", "Revenue", &labels, &observed, path)
    }

    /// Ranked bar chart for top-product / top-buyer listings.
    pub fn render_ranking(
        title: &str,
        y_desc: &str,
        items: &[(String, f64)],
        path: &Path,
    ) -> Result<(), ChartError> {
        if items.is_empty() {
            return Err(ChartError::EmptySeries);
        }
        let labels: Vec<String> = items.iter().map(|(name, _)| name.clone()).collect();
        let observed: Vec<(usize, f64)> = items.iter().enumerate().map(|(i, &(_, v))| (i, v)).collect();
        Self::render_bars(title, y_desc, &labels, &observed, path)
    }

    fn render_bars(
        title: &str,
        y_desc: &str,
        labels: &[String],
        bars: &[(usize, f64)],
        path: &Path,
    ) -> Result<(), ChartError> {
        let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;

        let n = labels.len();
        let y_max = bars.iter().fold(0.0f64, |m, &(_, v)| m.max(v)) * 1.1;
        let labels = labels.to_vec();

        let mut chart = ChartBuilder::on(&root)
            .caption(title, ("sans-serif", 28))
            .margin(10)
            .x_label_area_size(60)
            .y_label_area_size(70)
            .build_cartesian_2d(-0.5f64..(n as f64 - 0.5), 0f64..y_max)
            .map_err(render_err)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(n)
            .x_label_formatter(&|x| {
                let i = x.round();
                if i < 0.0 || (x - i).abs() > 0.25 {
                    return String::new();
                }
                labels.get(i as usize).cloned().unwrap_or_default()
            })
            .y_desc(y_desc)
            .draw()
            .map_err(render_err)?;

        chart
            .draw_series(bars.iter().map(|&(i, v)| {
                Rectangle::new(
                    [(i as f64 - 0.35, 0.0), (i as f64 + 0.35, v)],
                    BAR_COLOR.filled(),
                )
            }))
            .map_err(render_err)?;

        root.present().map_err(render_err)
    }

    /// Cohort retention heatmap. Cell shade scales with the retention
    /// fraction; cells without observations stay background-white so
    /// "no data" never reads as "0% retained".
    pub fn render_retention_heatmap(
        matrix: &RetentionMatrix,
        path: &Path,
    ) -> Result<(), ChartError> {
        let cohorts = matrix.cohorts();
        if cohorts.is_empty() {
            return Err(ChartError::EmptySeries);
        }
        let rows = cohorts.len();
        let cols = matrix.max_index() as usize;

        let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;

        let cohort_labels: Vec<String> = cohorts.iter().map(|c| c.to_string()).collect();

        let mut chart = ChartBuilder::on(&root)
            .caption("Cohort Retention", ("sans-serif", 28))
            .margin(10)
            .x_label_area_size(45)
            .y_label_area_size(80)
            .build_cartesian_2d(0f64..cols as f64, 0f64..rows as f64)
            .map_err(render_err)?;

        chart
            .configure_mesh()
            .disable_mesh()
            .x_labels(cols.min(16))
            .x_desc("Months since first purchase")
            .x_label_formatter(&|x| {
                let i = x.floor();
                if (x - i).abs() < f64::EPSILON && i >= 0.0 && (i as usize) < cols {
                    // Axis shows the 1-based cohort index.
                    format!("{}", i as usize + 1)
                } else {
                    String::new()
                }
            })
            .y_labels(rows.min(16))
            .y_desc("Cohort")
            .y_label_formatter(&|y| {
                let i = y.floor();
                if (y - i).abs() < f64::EPSILON && i >= 0.0 && (i as usize) < rows {
                    cohort_labels[i as usize].clone()
                } else {
                    String::new()
                }
            })
            .draw()
            .map_err(render_err)?;

        chart
            .draw_series(cohorts.iter().enumerate().flat_map(|(row, &cohort)| {
                // Newest cohort at the bottom row.
                let y = (rows - 1 - row) as f64;
                (1..=cols as u32).filter_map(move |index| {
                    matrix.retention(cohort, index).map(|rate| {
                        let shade = (rate.clamp(0.0, 1.0) * 205.0) as u8;
                        let color = RGBColor(255 - shade, 255 - (shade / 2), 255);
                        Rectangle::new(
                            [
                                ((index - 1) as f64, y),
                                (index as f64, y + 1.0),
                            ],
                            color.filled(),
                        )
                    })
                })
            }))
            .map_err(render_err)?;

        root.present().map_err(render_err)
    }
}
