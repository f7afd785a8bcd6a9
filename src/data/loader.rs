//! CSV Data Loader Module
//! Reads the raw transaction CSV into a Polars DataFrame.

use polars::prelude::*;
use std::path::Path;
use thiserror::Error;

/// Columns every transaction CSV must carry.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    "OrderID",
    "CustomerID",
    "ProductName",
    "OrderDate",
    "Quantity",
    "Price",
];

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("No data loaded")]
    NoData,
    #[error("Missing required column '{0}'")]
    MissingColumn(String),
}

/// Reads the transaction CSV with Polars.
///
/// Schema inference is disabled on purpose: every column arrives as a
/// string and the cleaner owns all type coercion, so a stray value can
/// never flip a whole column's dtype.
pub struct DataLoader;

impl DataLoader {
    /// Load a CSV file and verify the required columns are present.
    pub fn load_csv(file_path: &Path) -> Result<DataFrame, LoaderError> {
        let df = LazyCsvReader::new(file_path)
            .with_infer_schema_length(Some(0))
            .with_has_header(true)
            .finish()?
            .collect()?;

        if df.height() == 0 {
            return Err(LoaderError::NoData);
        }

        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        for required in REQUIRED_COLUMNS {
            if !names.iter().any(|n| n.as_str() == required) {
                return Err(LoaderError::MissingColumn(required.to_string()));
            }
        }

        Ok(df)
    }
}
