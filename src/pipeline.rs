//! Pipeline wiring: select, impute, scale, score, label, assemble

use crate::error::Result;
use crate::forest::{IsolationForest, DEFAULT_MAX_SAMPLES, DEFAULT_SEED, DEFAULT_TREES};
use crate::labeling::Labeler;
use crate::preprocessing::{FeatureSelector, MeanImputer, StandardScaler};
use crate::report::{DetectionReport, ResultAssembler};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Default contamination fraction
pub const DEFAULT_CONTAMINATION: f64 = 0.05;

/// Configuration for one detection run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Ordered numeric feature columns to score on
    pub features: Vec<String>,

    /// Expected proportion of anomalous rows, in (0, 0.5]
    pub contamination: f64,

    /// Number of isolation trees in the ensemble
    pub n_estimators: usize,

    /// Per-tree subsample ceiling
    pub max_samples: usize,

    /// Base random seed for reproducibility
    pub seed: u64,

    /// Name of the label column added to the output frame
    pub label_column: String,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            features: Vec::new(),
            contamination: DEFAULT_CONTAMINATION,
            n_estimators: DEFAULT_TREES,
            max_samples: DEFAULT_MAX_SAMPLES,
            seed: DEFAULT_SEED,
            label_column: "anomaly".to_string(),
        }
    }
}

impl DetectorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the feature columns
    pub fn with_features<I, S>(mut self, features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.features = features.into_iter().map(Into::into).collect();
        self
    }

    /// Builder method to set the contamination fraction
    pub fn with_contamination(mut self, contamination: f64) -> Self {
        self.contamination = contamination;
        self
    }

    /// Builder method to set the ensemble size
    pub fn with_n_estimators(mut self, n: usize) -> Self {
        self.n_estimators = n;
        self
    }

    /// Builder method to set the per-tree subsample ceiling
    pub fn with_max_samples(mut self, n: usize) -> Self {
        self.max_samples = n;
        self
    }

    /// Builder method to set the random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Builder method to set the label column name
    pub fn with_label_column(mut self, name: impl Into<String>) -> Self {
        self.label_column = name.into();
        self
    }
}

/// The anomaly scoring pipeline.
///
/// Each stage consumes an immutable input and produces a new artifact; the
/// source frame is never mutated. Everything is recomputed from scratch per
/// run, so changing the selection or contamination means running again.
#[derive(Debug, Clone)]
pub struct AnomalyPipeline {
    config: DetectorConfig,
}

impl AnomalyPipeline {
    pub fn new(config: DetectorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Run the full pipeline over the frame
    pub fn detect(&self, df: &DataFrame) -> Result<DetectionReport> {
        // Parameter validation happens before any heavy work
        let labeler = Labeler::new(self.config.contamination)?;
        let selector = FeatureSelector::new(self.config.features.clone());

        let selected = selector.select(df)?;
        debug!(
            rows = selected.nrows(),
            features = selected.ncols(),
            "selected feature matrix"
        );

        let imputed = MeanImputer::new().fit_transform(&selected)?;
        let scaled = StandardScaler::new().fit_transform(&imputed)?;

        let mut forest = IsolationForest::new()
            .with_n_estimators(self.config.n_estimators)
            .with_max_samples(self.config.max_samples)
            .with_seed(self.config.seed);
        let scores = forest.fit_score(scaled.values())?;
        debug!(
            trees = self.config.n_estimators,
            sample_size = forest.sample_size(),
            "scored rows"
        );

        let outcome = labeler.label(&scores)?;
        let report = ResultAssembler::new(self.config.label_column.clone()).assemble(
            df,
            imputed,
            outcome.labels,
            scores.to_vec(),
            outcome.cutoff,
        )?;

        let summary = report.summary();
        info!(
            total = summary.total,
            anomalies = summary.anomaly_count,
            cutoff = report.cutoff(),
            "detection complete"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TabsentryError;

    fn sample_df() -> DataFrame {
        df!(
            "a" => &(0..20).map(|i| (i % 5) as f64).collect::<Vec<_>>(),
            "b" => &(0..20).map(|i| (i % 4) as f64).collect::<Vec<_>>(),
        )
        .unwrap()
    }

    #[test]
    fn test_config_builders() {
        let config = DetectorConfig::new()
            .with_features(["a", "b"])
            .with_contamination(0.1)
            .with_n_estimators(50)
            .with_seed(7)
            .with_label_column("flag");

        assert_eq!(config.features, vec!["a", "b"]);
        assert_eq!(config.contamination, 0.1);
        assert_eq!(config.n_estimators, 50);
        assert_eq!(config.seed, 7);
        assert_eq!(config.label_column, "flag");
    }

    #[test]
    fn test_config_json_round_trip() {
        let config = DetectorConfig::new()
            .with_features(["a", "b"])
            .with_contamination(0.1)
            .with_seed(7);

        let json = serde_json::to_string(&config).unwrap();
        let restored: DetectorConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.features, config.features);
        assert_eq!(restored.contamination, config.contamination);
        assert_eq!(restored.seed, config.seed);
        assert_eq!(restored.label_column, config.label_column);
    }

    #[test]
    fn test_detect_runs_end_to_end() {
        let config = DetectorConfig::new()
            .with_features(["a", "b"])
            .with_n_estimators(25);
        let report = AnomalyPipeline::new(config).detect(&sample_df()).unwrap();

        let summary = report.summary();
        assert_eq!(summary.total, 20);
        assert_eq!(summary.normal_count + summary.anomaly_count, 20);
        assert!(report.labeled().column("anomaly").is_ok());
    }

    #[test]
    fn test_invalid_contamination_fails_fast() {
        let config = DetectorConfig::new()
            .with_features(["a"])
            .with_contamination(0.7);
        let err = AnomalyPipeline::new(config).detect(&sample_df()).unwrap_err();
        assert!(matches!(err, TabsentryError::InvalidContamination { .. }));
    }

    #[test]
    fn test_empty_selection_fails() {
        let config = DetectorConfig::new();
        let err = AnomalyPipeline::new(config).detect(&sample_df()).unwrap_err();
        assert!(matches!(err, TabsentryError::EmptySelection));
    }
}
