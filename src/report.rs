//! Result assembly: label merge, summary counts, filtered views, chart data

use crate::error::{Result, TabsentryError};
use crate::labeling::Label;
use crate::preprocessing::FeatureMatrix;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Row counts computed from the labeled dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub total: usize,
    pub normal_count: usize,
    pub anomaly_count: usize,
}

/// A labeled point for chart rendering, in original (unscaled) units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub x: f64,
    pub y: f64,
    /// Original row position in the source frame
    pub row: usize,
}

/// Chart-ready projection: labeled (x, y) series sorted by x ascending and
/// partitioned by label so each series renders independently
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartData {
    pub x_column: String,
    pub y_column: String,
    pub normal: Vec<ChartPoint>,
    pub anomaly: Vec<ChartPoint>,
}

/// Merges labels back onto the source frame by row identity
#[derive(Debug, Clone)]
pub struct ResultAssembler {
    label_column: String,
}

impl ResultAssembler {
    pub fn new(label_column: impl Into<String>) -> Self {
        Self {
            label_column: label_column.into(),
        }
    }

    /// Build the full detection report.
    ///
    /// `features` is the imputed (unscaled) matrix whose `row_indices` say
    /// which source rows were scored; `labels` and `scores` align with it.
    pub fn assemble(
        &self,
        df: &DataFrame,
        features: FeatureMatrix,
        labels: Vec<Label>,
        scores: Vec<f64>,
        cutoff: f64,
    ) -> Result<DetectionReport> {
        debug_assert_eq!(features.nrows(), labels.len());
        debug_assert_eq!(features.nrows(), scores.len());

        // Row positions without a label stay null in the merged column
        let mut cells: Vec<Option<&str>> = vec![None; df.height()];
        for (&row, label) in features.row_indices().iter().zip(&labels) {
            cells[row] = Some(label.as_str());
        }
        let label_series: StringChunked = cells.into_iter().collect();
        let label_series = label_series
            .with_name(self.label_column.as_str().into())
            .into_series();

        let mut labeled = df.clone();
        labeled
            .with_column(label_series)
            .map_err(|e| TabsentryError::DataError(e.to_string()))?;

        let anomaly_count = labels.iter().filter(|l| l.is_anomaly()).count();
        let summary = SummaryStats {
            total: labels.len(),
            normal_count: labels.len() - anomaly_count,
            anomaly_count,
        };

        Ok(DetectionReport {
            labeled,
            features,
            labels,
            scores,
            cutoff,
            summary,
            label_column: self.label_column.clone(),
        })
    }
}

impl Default for ResultAssembler {
    fn default() -> Self {
        Self::new("anomaly")
    }
}

/// Output of one pipeline run
#[derive(Debug, Clone)]
pub struct DetectionReport {
    labeled: DataFrame,
    features: FeatureMatrix,
    labels: Vec<Label>,
    scores: Vec<f64>,
    cutoff: f64,
    summary: SummaryStats,
    label_column: String,
}

impl DetectionReport {
    /// The source frame with the label column appended, original row order
    pub fn labeled(&self) -> &DataFrame {
        &self.labeled
    }

    /// Per-row labels, aligned with the scored rows
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Per-row anomaly scores, aligned with the scored rows
    pub fn scores(&self) -> &[f64] {
        &self.scores
    }

    /// Score cutoff used for labeling
    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }

    pub fn summary(&self) -> SummaryStats {
        self.summary
    }

    pub fn label_column(&self) -> &str {
        &self.label_column
    }

    /// Rows labeled Anomaly, original order preserved
    pub fn anomalies(&self) -> Result<DataFrame> {
        self.filter_by(Label::Anomaly)
    }

    /// Rows labeled Normal, original order preserved
    pub fn normals(&self) -> Result<DataFrame> {
        self.filter_by(Label::Normal)
    }

    fn filter_by(&self, wanted: Label) -> Result<DataFrame> {
        let mut keep = vec![false; self.labeled.height()];
        for (&row, label) in self.features.row_indices().iter().zip(&self.labels) {
            keep[row] = *label == wanted;
        }
        let mask: BooleanChunked = keep.into_iter().map(Some).collect();
        self.labeled
            .filter(&mask)
            .map_err(|e| TabsentryError::DataError(e.to_string()))
    }

    /// Labeled (x, y) series for two selected feature columns, sorted by x
    /// ascending. Values come from the imputed matrix, so every scored row
    /// contributes a point even where the source cell was missing.
    pub fn chart(&self, x_column: &str, y_column: &str) -> Result<ChartData> {
        let xi = self
            .features
            .column_index(x_column)
            .ok_or_else(|| TabsentryError::FeatureNotFound(x_column.to_string()))?;
        let yi = self
            .features
            .column_index(y_column)
            .ok_or_else(|| TabsentryError::FeatureNotFound(y_column.to_string()))?;

        let values = self.features.values();
        let mut normal = Vec::new();
        let mut anomaly = Vec::new();
        for (i, (&row, label)) in self
            .features
            .row_indices()
            .iter()
            .zip(&self.labels)
            .enumerate()
        {
            let point = ChartPoint {
                x: values[[i, xi]],
                y: values[[i, yi]],
                row,
            };
            match label {
                Label::Normal => normal.push(point),
                Label::Anomaly => anomaly.push(point),
            }
        }

        let by_x = |a: &ChartPoint, b: &ChartPoint| {
            a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal)
        };
        normal.sort_by(by_x);
        anomaly.sort_by(by_x);

        Ok(ChartData {
            x_column: x_column.to_string(),
            y_column: y_column.to_string(),
            normal,
            anomaly,
        })
    }
}
