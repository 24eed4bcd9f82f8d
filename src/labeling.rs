//! Contamination-driven score thresholding

use crate::error::{Result, TabsentryError};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Binary label attached to each scored row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Label {
    Normal,
    Anomaly,
}

impl Label {
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Normal => "Normal",
            Label::Anomaly => "Anomaly",
        }
    }

    pub fn is_anomaly(&self) -> bool {
        matches!(self, Label::Anomaly)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of labeling: per-row labels plus the score cutoff used
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelOutcome {
    pub labels: Vec<Label>,
    pub cutoff: f64,
}

impl LabelOutcome {
    pub fn anomaly_count(&self) -> usize {
        self.labels.iter().filter(|l| l.is_anomaly()).count()
    }
}

/// Converts anomaly scores into labels via a contamination fraction.
///
/// The cutoff is the k-th largest score with k = ceil(c * n), clamped to
/// [1, n]. Rows strictly above the cutoff are anomalous; rows tied exactly
/// at the cutoff fill the remaining quota from the highest original index
/// down, so the lowest tied indices stay Normal and the anomaly count never
/// exceeds ceil(c * n).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Labeler {
    contamination: f64,
}

impl Labeler {
    /// Create a labeler, validating the contamination fraction
    pub fn new(contamination: f64) -> Result<Self> {
        if !(contamination > 0.0 && contamination <= 0.5) {
            return Err(TabsentryError::InvalidContamination {
                value: contamination,
            });
        }
        Ok(Self { contamination })
    }

    pub fn contamination(&self) -> f64 {
        self.contamination
    }

    /// Assign labels to the given scores
    pub fn label(&self, scores: &Array1<f64>) -> Result<LabelOutcome> {
        let n = scores.len();
        if n == 0 {
            return Err(TabsentryError::InsufficientData { rows: 0 });
        }

        let quota = ((self.contamination * n as f64).ceil() as usize).clamp(1, n);

        let mut sorted: Vec<f64> = scores.iter().copied().collect();
        sorted.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));
        let cutoff = sorted[quota - 1];

        let mut labels = vec![Label::Normal; n];
        let mut above = 0usize;
        for (i, &s) in scores.iter().enumerate() {
            if s > cutoff {
                labels[i] = Label::Anomaly;
                above += 1;
            }
        }

        // Fill the residual quota from tied rows, highest index first
        let mut remaining = quota.saturating_sub(above);
        for i in (0..n).rev() {
            if remaining == 0 {
                break;
            }
            if scores[i] == cutoff {
                labels[i] = Label::Anomaly;
                remaining -= 1;
            }
        }

        Ok(LabelOutcome { labels, cutoff })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_contamination_bounds() {
        assert!(Labeler::new(0.0).is_err());
        assert!(Labeler::new(-0.1).is_err());
        assert!(Labeler::new(0.51).is_err());
        assert!(Labeler::new(0.01).is_ok());
        assert!(Labeler::new(0.5).is_ok());
    }

    #[test]
    fn test_top_scores_flagged() {
        let scores = array![0.4, 0.9, 0.3, 0.8, 0.2, 0.1, 0.35, 0.3, 0.25, 0.2];
        let outcome = Labeler::new(0.2).unwrap().label(&scores).unwrap();

        assert_eq!(outcome.anomaly_count(), 2);
        assert_eq!(outcome.labels[1], Label::Anomaly);
        assert_eq!(outcome.labels[3], Label::Anomaly);
        assert_eq!(outcome.cutoff, 0.8);
    }

    #[test]
    fn test_quota_is_ceiling() {
        // ceil(0.3 * 9) = 3
        let scores = array![0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9];
        let outcome = Labeler::new(0.3).unwrap().label(&scores).unwrap();
        assert_eq!(outcome.anomaly_count(), 3);
    }

    #[test]
    fn test_ties_keep_lowest_index_normal() {
        // Quota 2: one row strictly above, three tied at the cutoff; the tied
        // row with the highest index takes the remaining slot.
        let scores = array![0.7, 0.9, 0.7, 0.7, 0.1];
        let outcome = Labeler::new(0.4).unwrap().label(&scores).unwrap();

        assert_eq!(outcome.anomaly_count(), 2);
        assert_eq!(outcome.labels[1], Label::Anomaly);
        assert_eq!(outcome.labels[3], Label::Anomaly);
        assert_eq!(outcome.labels[0], Label::Normal);
        assert_eq!(outcome.labels[2], Label::Normal);
    }

    #[test]
    fn test_monotone_in_contamination() {
        let scores = array![0.12, 0.93, 0.48, 0.71, 0.05, 0.66, 0.39, 0.81, 0.27, 0.54];
        let mut previous = 0usize;
        for c in [0.1, 0.2, 0.3, 0.4, 0.5] {
            let count = Labeler::new(c).unwrap().label(&scores).unwrap().anomaly_count();
            assert!(count >= previous);
            previous = count;
        }
    }

    #[test]
    fn test_empty_scores_rejected() {
        let scores: Array1<f64> = Array1::from_vec(Vec::new());
        assert!(Labeler::new(0.1).unwrap().label(&scores).is_err());
    }
}
