//! Standardization (z-score scaling)

use crate::error::{Result, TabsentryError};
use crate::preprocessing::FeatureMatrix;
use serde::{Deserialize, Serialize};

/// Floor applied to the standard deviation so constant columns scale to zero
/// instead of dividing by zero.
pub const SCALE_EPSILON: f64 = 1e-8;

/// Parameters of a fitted standard scaler, one pair per column
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScalingParams {
    pub mean: f64,
    pub std: f64,
}

/// Standardizes each column to zero mean and unit variance.
///
/// Uses the population standard deviation. Deterministic; the fitted
/// parameters are exposed so the same normalization can be replayed on
/// further rows if ever needed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StandardScaler {
    params: Option<Vec<ScalingParams>>,
}

impl StandardScaler {
    pub fn new() -> Self {
        Self { params: None }
    }

    /// Fitted per-column parameters, if any
    pub fn params(&self) -> Option<&[ScalingParams]> {
        self.params.as_deref()
    }

    /// Learn per-column mean and standard deviation
    ///
    /// Expects a fully-populated matrix; imputation runs before scaling.
    pub fn fit(&mut self, matrix: &FeatureMatrix) -> Result<&mut Self> {
        let values = matrix.values();
        let n = values.nrows();
        if n == 0 {
            return Err(TabsentryError::InsufficientData { rows: 0 });
        }

        let params = values
            .columns()
            .into_iter()
            .map(|column| {
                let mean = column.sum() / n as f64;
                let var = column.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n as f64;
                ScalingParams {
                    mean,
                    std: var.sqrt(),
                }
            })
            .collect();

        self.params = Some(params);
        Ok(self)
    }

    /// Transform every value as `(x - mean) / max(std, epsilon)`
    pub fn transform(&self, matrix: &FeatureMatrix) -> Result<FeatureMatrix> {
        let params = self.params.as_ref().ok_or(TabsentryError::NotFitted)?;

        let mut values = matrix.values().clone();
        for mut row in values.rows_mut() {
            for (j, v) in row.iter_mut().enumerate() {
                let p = &params[j];
                *v = (*v - p.mean) / p.std.max(SCALE_EPSILON);
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
    fn test_standardized_column_stats() {
        let m = matrix(array![[1.0], [2.0], [3.0], [4.0], [5.0]]);
        let mut scaler = StandardScaler::new();
        let scaled = scaler.fit_transform(&m).unwrap();

        let col = scaled.values().column(0);
        let mean = col.sum() / 5.0;
        let var = col.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / 5.0;
        assert!(mean.abs() < 1e-12);
        assert!((var - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_constant_column_scales_to_zero() {
        let m = matrix(array![[7.0], [7.0], [7.0]]);
        let mut scaler = StandardScaler::new();
        let scaled = scaler.fit_transform(&m).unwrap();

        for &v in scaled.values().iter() {
            assert_eq!(v, 0.0);
        }
    }

    #[test]
    fn test_params_exposed() {
        let m = matrix(array![[2.0], [4.0], [6.0]]);
        let mut scaler = StandardScaler::new();
        scaler.fit(&m).unwrap();

        let params = scaler.params().unwrap();
        assert!((params[0].mean - 4.0).abs() < 1e-12);
        assert!(params[0].std > 0.0);
    }

    #[test]
    fn test_transform_before_fit_fails() {
        let m = matrix(array![[1.0]]);
        let scaler = StandardScaler::new();
        assert!(matches!(
            scaler.transform(&m).unwrap_err(),
            TabsentryError::NotFitted
        ));
    }
}
