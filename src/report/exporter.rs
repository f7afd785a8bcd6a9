//! Report Exporter Module
//! Writes the summary CSVs and the KPI JSON snapshot.

use crate::analysis::{KpiSnapshot, MonthlySeries, RetentionMatrix, RfmRecord};
use polars::prelude::*;
use std::fs::File;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Writes report files. Every writer builds a deterministic frame, so a
/// rerun over identical input produces byte-identical files.
pub struct ReportExporter;

impl ReportExporter {
    /// `monthly_revenue.csv`: Month (YYYY-MM), Revenue.
    pub fn write_monthly_revenue(series: &MonthlySeries, path: &Path) -> Result<(), ExportError> {
        let months: Vec<String> = series.months.iter().map(|m| m.to_string()).collect();
        let mut df = DataFrame::new(vec![
            Column::new("Month".into(), months),
            Column::new("Revenue".into(), series.revenue.clone()),
        ])?;
        Self::write_csv(&mut df, path)
    }

    /// `cohort_retention.csv`: cohort rows by cohort-index columns.
    /// Cells without observations stay empty, not 0.
    pub fn write_retention(matrix: &RetentionMatrix, path: &Path) -> Result<(), ExportError> {
        let cohorts: Vec<String> = matrix.cohorts().iter().map(|c| c.to_string()).collect();
        let mut columns = vec![Column::new("Cohort".into(), cohorts)];
        for index in 1..=matrix.max_index() {
            let cells: Vec<Option<f64>> = matrix
                .cohorts()
                .iter()
                .map(|&cohort| matrix.retention(cohort, index))
                .collect();
            columns.push(Column::new(index.to_string().into(), cells));
        }
        let mut df = DataFrame::new(columns)?;
        Self::write_csv(&mut df, path)
    }

    /// `rfm_scores.csv`, sorted by customer id.
    pub fn write_rfm(records: &[RfmRecord], path: &Path) -> Result<(), ExportError> {
        let mut sorted: Vec<&RfmRecord> = records.iter().collect();
        sorted.sort_by(|a, b| a.customer_id.cmp(&b.customer_id));

        let mut df = DataFrame::new(vec![
            Column::new(
                "CustomerID".into(),
                sorted.iter().map(|r| r.customer_id.clone()).collect::<Vec<_>>(),
            ),
            Column::new(
                "Recency".into(),
                sorted.iter().map(|r| r.recency_days).collect::<Vec<_>>(),
            ),
            Column::new(
                "Frequency".into(),
                sorted.iter().map(|r| r.frequency as i64).collect::<Vec<_>>(),
            ),
            Column::new(
                "Monetary".into(),
                sorted.iter().map(|r| r.monetary).collect::<Vec<_>>(),
            ),
            Column::new(
                "R_Score".into(),
                sorted.iter().map(|r| r.r_score as i64).collect::<Vec<_>>(),
            ),
            Column::new(
                "F_Score".into(),
                sorted.iter().map(|r| r.f_score as i64).collect::<Vec<_>>(),
            ),
            Column::new(
                "M_Score".into(),
                sorted.iter().map(|r| r.m_score as i64).collect::<Vec<_>>(),
            ),
            Column::new(
                "RFM_Segment".into(),
                sorted.iter().map(|r| r.segment()).collect::<Vec<_>>(),
            ),
        ])?;
        Self::write_csv(&mut df, path)
    }

    /// `kpi_summary.json`: the scalar KPI snapshot.
    pub fn write_kpi_summary(kpi: &KpiSnapshot, path: &Path) -> Result<(), ExportError> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, kpi)?;
        Ok(())
    }

    fn write_csv(df: &mut DataFrame, path: &Path) -> Result<(), ExportError> {
        let mut file = File::create(path)?;
        CsvWriter::new(&mut file)
            .include_header(true)
            .finish(df)?;
        Ok(())
    }
}
