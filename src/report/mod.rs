//! CSV/JSON export of the computed reports.

pub mod exporter;

pub use exporter::{ExportError, ReportExporter};
