//! Error types for the tabsentry anomaly detection pipeline

use thiserror::Error;

/// Result type alias for tabsentry operations
pub type Result<T> = std::result::Result<T, TabsentryError>;

/// Main error type for the pipeline
///
/// All variants are validation failures detected before or at pipeline entry;
/// a run either completes for every retained row or fails with one of these.
#[derive(Error, Debug)]
pub enum TabsentryError {
    #[error("No feature columns selected")]
    EmptySelection,

    #[error("Feature not found: {0}")]
    FeatureNotFound(String),

    #[error("Column '{0}' has no non-missing values, mean is undefined")]
    DegenerateColumn(String),

    #[error("Insufficient data: need at least 2 distinct rows, got {rows}")]
    InsufficientData { rows: usize },

    #[error("Invalid contamination: {value}, expected a fraction in (0, 0.5]")]
    InvalidContamination { value: f64 },

    #[error("Model not fitted")]
    NotFitted,

    #[error("Data error: {0}")]
    DataError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<serde_json::Error> for TabsentryError {
    fn from(err: serde_json::Error) -> Self {
        TabsentryError::SerializationError(err.to_string())
    }
}

impl From<polars::error::PolarsError> for TabsentryError {
    fn from(err: polars::error::PolarsError) -> Self {
        TabsentryError::DataError(err.to_string())
    }
}
