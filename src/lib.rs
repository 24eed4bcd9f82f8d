//! tabsentry - Isolation-forest anomaly detection for tabular data
//!
//! Flags statistically anomalous rows in a tabular dataset with an
//! unsupervised isolation-forest score and prepares the results for
//! inspection and export.
//!
//! # Modules
//!
//! - [`preprocessing`] - Feature selection, mean imputation, standardization
//! - [`forest`] - Isolation forest ensemble and trees
//! - [`labeling`] - Contamination-driven thresholding into labels
//! - [`report`] - Label merge, summary counts, views, chart projections
//! - [`pipeline`] - End-to-end wiring and configuration
//! - [`utils`] - CSV input/output boundary
//!
//! # Example
//!
//! ```no_run
//! use polars::prelude::*;
//! use tabsentry::prelude::*;
//!
//! # fn run(df: DataFrame) -> tabsentry::Result<()> {
//! let config = DetectorConfig::new()
//!     .with_features(["temperature", "pressure"])
//!     .with_contamination(0.05)
//!     .with_seed(42);
//!
//! let report = AnomalyPipeline::new(config).detect(&df)?;
//! println!("{} anomalies", report.summary().anomaly_count);
//! # Ok(())
//! # }
//! ```

// Core error handling
pub mod error;

// Pipeline stages
pub mod forest;
pub mod labeling;
pub mod pipeline;
pub mod preprocessing;
pub mod report;

// Boundaries
pub mod utils;

// CLI surface
pub mod cli;

pub use error::{Result, TabsentryError};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::{Result, TabsentryError};
    pub use crate::forest::{IsolationForest, IsolationTree};
    pub use crate::labeling::{Label, LabelOutcome, Labeler};
    pub use crate::pipeline::{AnomalyPipeline, DetectorConfig};
    pub use crate::preprocessing::{
        FeatureMatrix, FeatureSelector, MeanImputer, ScalingParams, StandardScaler,
    };
    pub use crate::report::{ChartData, ChartPoint, DetectionReport, SummaryStats};
    pub use crate::utils::DataLoader;
}
