//! Missing value imputation

use crate::error::{Result, TabsentryError};
use crate::preprocessing::FeatureMatrix;
use serde::{Deserialize, Serialize};

/// Fills missing cells with the column mean.
///
/// The mean of each column is computed over its non-missing values only; a
/// column with no observed values at all has no defined mean and fails the
/// fit. The input matrix is never mutated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MeanImputer {
    means: Option<Vec<f64>>,
}

impl MeanImputer {
    pub fn new() -> Self {
        Self { means: None }
    }

    /// Fitted per-column means, if any
    pub fn means(&self) -> Option<&[f64]> {
        self.means.as_deref()
    }

    /// Compute the per-column means from the observed values
    pub fn fit(&mut self, matrix: &FeatureMatrix) -> Result<&mut Self> {
        let values = matrix.values();
        let mut means = Vec::with_capacity(matrix.ncols());

        for (j, column) in values.columns().into_iter().enumerate() {
            let mut sum = 0.0;
            let mut count = 0usize;
            for &v in column.iter() {
                if !v.is_nan() {
                    sum += v;
                    count += 1;
                }
            }
            if count == 0 {
                return Err(TabsentryError::DegenerateColumn(matrix.columns()[j].clone()));
            }
            means.push(sum / count as f64);
        }

        self.means = Some(means);
        Ok(self)
    }

    /// Produce a fully-populated copy of the matrix
    pub fn transform(&self, matrix: &FeatureMatrix) -> Result<FeatureMatrix> {
        let means = self.means.as_ref().ok_or(TabsentryError::NotFitted)?;

        let mut values = matrix.values().clone();
        for mut row in values.rows_mut() {
            for (j, v) in row.iter_mut().enumerate() {
                if v.is_nan() {
                    *v = means[j];
                }
            }
        }

        Ok(matrix.with_values(values))
    }

    /// Fit and transform in one step
    pub fn fit_transform(&mut self, matrix: &FeatureMatrix) -> Result<FeatureMatrix> {
        self.fit(matrix)?;
        self.transform(matrix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn matrix(values: ndarray::Array2<f64>) -> FeatureMatrix {
        let rows = (0..values.nrows()).collect();
        let cols = (0..values.ncols()).map(|j| format!("c{j}")).collect();
        FeatureMatrix::new(values, rows, cols)
    }

    #[test]
    fn test_mean_imputation() {
        let m = matrix(array![[1.0, 10.0], [f64::NAN, 20.0], [3.0, f64::NAN], [4.0, 30.0]]);

        let mut imputer = MeanImputer::new();
        let filled = imputer.fit_transform(&m).unwrap();

        // Mean of [1, 3, 4] = 8/3
        assert!((filled.values()[[1, 0]] - 8.0 / 3.0).abs() < 1e-12);
        assert!((filled.values()[[2, 1]] - 20.0).abs() < 1e-12);
        // Observed cells untouched
        assert_eq!(filled.values()[[0, 0]], 1.0);
        // Input not mutated
        assert!(m.values()[[1, 0]].is_nan());
    }

    #[test]
    fn test_all_missing_column_fails() {
        let m = matrix(array![[1.0, f64::NAN], [2.0, f64::NAN]]);
        let mut imputer = MeanImputer::new();
        let err = imputer.fit(&m).unwrap_err();
        assert!(matches!(err, TabsentryError::DegenerateColumn(name) if name == "c1"));
    }

    #[test]
    fn test_transform_before_fit_fails() {
        let m = matrix(array![[1.0], [2.0]]);
        let imputer = MeanImputer::new();
        assert!(matches!(
            imputer.transform(&m).unwrap_err(),
            TabsentryError::NotFitted
        ));
    }
}
