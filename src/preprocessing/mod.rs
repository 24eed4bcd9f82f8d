//! Data preprocessing module
//!
//! Provides the stages that turn a raw DataFrame into a scaled numeric
//! matrix ready for scoring:
//! - Numeric feature selection
//! - Mean imputation of missing values
//! - Standardization (z-score scaling)

mod imputer;
mod scaler;
mod selector;

pub use imputer::MeanImputer;
pub use scaler::{ScalingParams, StandardScaler, SCALE_EPSILON};
pub use selector::FeatureSelector;

use ndarray::Array2;

/// A fixed-width numeric matrix derived from a DataFrame restriction.
///
/// Carries an explicit row-index mapping back to the source frame so labels
/// can be merged onto the original ordering regardless of how many
/// intermediate transformations the matrix passes through. Missing cells are
/// represented as `f64::NAN` until imputation fills them.
#[derive(Debug, Clone)]
pub struct FeatureMatrix {
    values: Array2<f64>,
    row_indices: Vec<usize>,
    columns: Vec<String>,
}

impl FeatureMatrix {
    pub fn new(values: Array2<f64>, row_indices: Vec<usize>, columns: Vec<String>) -> Self {
        debug_assert_eq!(values.nrows(), row_indices.len());
        debug_assert_eq!(values.ncols(), columns.len());
        Self {
            values,
            row_indices,
            columns,
        }
    }

    /// The numeric values, one row per retained source row
    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// Original source-frame position of each matrix row
    pub fn row_indices(&self) -> &[usize] {
        &self.row_indices
    }

    /// Selected column names, in selection order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Index of a column by name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn nrows(&self) -> usize {
        self.values.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.values.ncols()
    }

    /// Replace the values while keeping the row/column mapping
    pub fn with_values(&self, values: Array2<f64>) -> Self {
        Self::new(values, self.row_indices.clone(), self.columns.clone())
    }
}
