//! Numeric feature selection

use crate::error::{Result, TabsentryError};
use crate::preprocessing::FeatureMatrix;
use ndarray::Array2;
use polars::prelude::*;

/// Restricts a DataFrame to an ordered set of numeric columns.
///
/// Rows with missing values in the selected columns are retained; the gaps
/// surface as NaN in the resulting matrix and are handled by the imputer.
#[derive(Debug, Clone)]
pub struct FeatureSelector {
    columns: Vec<String>,
}

impl FeatureSelector {
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Check if dtype is numeric
    fn is_numeric_dtype(dtype: &DataType) -> bool {
        matches!(
            dtype,
            DataType::Int8
                | DataType::Int16
                | DataType::Int32
                | DataType::Int64
                | DataType::UInt8
                | DataType::UInt16
                | DataType::UInt32
                | DataType::UInt64
                | DataType::Float32
                | DataType::Float64
        )
    }

    /// Extract the selected columns as a row-identity-preserving matrix
    pub fn select(&self, df: &DataFrame) -> Result<FeatureMatrix> {
        if self.columns.is_empty() {
            return Err(TabsentryError::EmptySelection);
        }

        let n_rows = df.height();
        let n_cols = self.columns.len();
        let mut values = Array2::from_elem((n_rows, n_cols), f64::NAN);

        for (j, col_name) in self.columns.iter().enumerate() {
            let column = df
                .column(col_name)
                .map_err(|_| TabsentryError::FeatureNotFound(col_name.clone()))?;

            if !Self::is_numeric_dtype(column.dtype()) {
                return Err(TabsentryError::DataError(format!(
                    "column '{}' is not numeric (dtype {})",
                    col_name,
                    column.dtype()
                )));
            }

            let casted = column
                .cast(&DataType::Float64)
                .map_err(|e| TabsentryError::DataError(e.to_string()))?;
            let ca = casted
                .f64()
                .map_err(|e| TabsentryError::DataError(e.to_string()))?;

            for (i, opt) in ca.into_iter().enumerate() {
                if let Some(v) = opt {
                    values[[i, j]] = v;
                }
            }
        }

        Ok(FeatureMatrix::new(
            values,
            (0..n_rows).collect(),
            self.columns.clone(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_df() -> DataFrame {
        df!(
            "a" => &[Some(1.0), None, Some(3.0)],
            "b" => &[10.0, 20.0, 30.0],
            "name" => &["x", "y", "z"],
        )
        .unwrap()
    }

    #[test]
    fn test_select_numeric_columns() {
        let selector = FeatureSelector::new(vec!["a".to_string(), "b".to_string()]);
        let m = selector.select(&sample_df()).unwrap();

        assert_eq!(m.nrows(), 3);
        assert_eq!(m.ncols(), 2);
        assert_eq!(m.values()[[0, 0]], 1.0);
        assert_eq!(m.values()[[2, 1]], 30.0);
        assert_eq!(m.row_indices(), &[0, 1, 2]);
    }

    #[test]
    fn test_missing_values_become_nan() {
        let selector = FeatureSelector::new(vec!["a".to_string()]);
        let m = selector.select(&sample_df()).unwrap();
        assert!(m.values()[[1, 0]].is_nan());
    }

    #[test]
    fn test_empty_selection_rejected() {
        let selector = FeatureSelector::new(vec![]);
        let err = selector.select(&sample_df()).unwrap_err();
        assert!(matches!(err, TabsentryError::EmptySelection));
    }

    #[test]
    fn test_unknown_column_rejected() {
        let selector = FeatureSelector::new(vec!["missing".to_string()]);
        let err = selector.select(&sample_df()).unwrap_err();
        assert!(matches!(err, TabsentryError::FeatureNotFound(_)));
    }

    #[test]
    fn test_non_numeric_column_rejected() {
        let selector = FeatureSelector::new(vec!["name".to_string()]);
        let err = selector.select(&sample_df()).unwrap_err();
        assert!(matches!(err, TabsentryError::DataError(_)));
    }
}
