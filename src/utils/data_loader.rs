//! Data loading utilities

use crate::error::{Result, TabsentryError};
use polars::prelude::*;
use std::fs::File;

/// Loader for the tabular input boundary.
///
/// The pipeline itself only sees a DataFrame; this wraps the CSV read/write
/// mechanics for the CLI.
#[derive(Debug, Clone, Default)]
pub struct DataLoader {
    infer_schema_length: Option<usize>,
}

impl DataLoader {
    pub fn new() -> Self {
        Self {
            infer_schema_length: Some(100),
        }
    }

    /// Set how many rows to scan for schema inference
    pub fn with_infer_schema_length(mut self, n: usize) -> Self {
        self.infer_schema_length = Some(n);
        self
    }

    /// Load a CSV file
    pub fn load_csv(&self, path: &str) -> Result<DataFrame> {
        let file = File::open(path)?;

        let reader = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(self.infer_schema_length)
            .into_reader_with_file_handle(file);

        reader
            .finish()
            .map_err(|e| TabsentryError::DataError(e.to_string()))
    }

    /// Write a DataFrame as CSV
    pub fn write_csv(&self, df: &DataFrame, path: &str) -> Result<()> {
        let mut file = File::create(path)?;

        CsvWriter::new(&mut file)
            .include_header(true)
            .finish(&mut df.clone())
            .map_err(|e| TabsentryError::DataError(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_round_trip() {
        let df = df!(
            "a" => &[1.0, 2.0, 3.0],
            "b" => &["x", "y", "z"],
        )
        .unwrap();

        let dir = std::env::temp_dir();
        let path = dir.join("tabsentry_loader_test.csv");
        let path = path.to_str().unwrap();

        let loader = DataLoader::new();
        loader.write_csv(&df, path).unwrap();
        let loaded = loader.load_csv(path).unwrap();

        assert_eq!(loaded.height(), 3);
        assert_eq!(loaded.width(), 2);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let loader = DataLoader::new();
        let err = loader.load_csv("/nonexistent/data.csv").unwrap_err();
        assert!(matches!(err, TabsentryError::IoError(_)));
    }

    #[test]
    fn test_unwritable_path_is_io_error() {
        let df = df!("a" => &[1.0]).unwrap();
        let loader = DataLoader::new();
        let err = loader
            .write_csv(&df, "/nonexistent/dir/out.csv")
            .unwrap_err();
        assert!(matches!(err, TabsentryError::IoError(_)));
    }
}
