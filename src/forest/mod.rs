//! Isolation forest anomaly scoring
//!
//! An ensemble of randomized isolation trees, each grown on an independent
//! subsample of the scaled feature matrix. Anomalous rows isolate in fewer
//! random splits, so their average path length across the ensemble is short
//! and their normalized score approaches 1.

mod tree;

pub use tree::{IsolationTree, TreeNode};

use crate::error::{Result, TabsentryError};
use ndarray::{Array1, Array2};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Default ensemble size
pub const DEFAULT_TREES: usize = 100;
/// Default subsample ceiling per tree
pub const DEFAULT_MAX_SAMPLES: usize = 256;
/// Default base seed
pub const DEFAULT_SEED: u64 = 42;

/// Isolation forest anomaly scorer
///
/// Every tree draws its subsample without replacement from its own RNG,
/// seeded `base_seed + tree_index`, so the ensemble is reproducible and
/// independent of build order; trees fan out over rayon with results
/// identical to a sequential build.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IsolationForest {
    n_estimators: usize,
    max_samples: usize,
    seed: u64,
    trees: Option<Vec<IsolationTree>>,
    sample_size: Option<usize>,
}

impl IsolationForest {
    pub fn new() -> Self {
        Self {
            n_estimators: DEFAULT_TREES,
            max_samples: DEFAULT_MAX_SAMPLES,
            seed: DEFAULT_SEED,
            trees: None,
            sample_size: None,
        }
    }

    /// Set the number of trees
    pub fn with_n_estimators(mut self, n: usize) -> Self {
        self.n_estimators = n.max(1);
        self
    }

    /// Set the per-tree subsample ceiling
    pub fn with_max_samples(mut self, n: usize) -> Self {
        self.max_samples = n.max(1);
        self
    }

    /// Set the base random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Subsample size actually used at fit time, `min(max_samples, n)`
    pub fn sample_size(&self) -> Option<usize> {
        self.sample_size
    }

    /// Build the ensemble over the scaled matrix
    pub fn fit(&mut self, x: &Array2<f64>) -> Result<&mut Self> {
        let n_rows = x.nrows();
        let distinct = Self::count_distinct_limit(x, 2);
        if distinct < 2 {
            return Err(TabsentryError::InsufficientData { rows: distinct });
        }

        let sample_size = self.max_samples.min(n_rows);
        let max_height = (sample_size as f64).log2().ceil() as usize;
        let base_seed = self.seed;

        let trees: Vec<IsolationTree> = (0..self.n_estimators)
            .into_par_iter()
            .map(|tree_idx| {
                let mut rng = ChaCha8Rng::seed_from_u64(base_seed.wrapping_add(tree_idx as u64));
                // Subsample without replacement
                let indices = rand::seq::index::sample(&mut rng, n_rows, sample_size).into_vec();
                IsolationTree::fit(x, &indices, max_height, &mut rng)
            })
            .collect();

        self.trees = Some(trees);
        self.sample_size = Some(sample_size);
        Ok(self)
    }

    /// Normalized anomaly score per row, in (0, 1]; higher = more anomalous
    pub fn score_samples(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let trees = self.trees.as_ref().ok_or(TabsentryError::NotFitted)?;
        let sample_size = self.sample_size.ok_or(TabsentryError::NotFitted)?;
        let c_n = IsolationTree::average_path_length(sample_size);

        let scores: Vec<f64> = x
            .rows()
            .into_iter()
            .map(|row| {
                let avg_path: f64 = trees
                    .iter()
                    .map(|tree| tree.path_length(row))
                    .sum::<f64>()
                    / trees.len() as f64;

                // s(x, n) = 2^(-E[h(x)] / c(n))
                2.0_f64.powf(-avg_path / c_n)
            })
            .collect();

        Ok(Array1::from_vec(scores))
    }

    /// Fit on the matrix and score every row of it
    pub fn fit_score(&mut self, x: &Array2<f64>) -> Result<Array1<f64>> {
        self.fit(x)?;
        self.score_samples(x)
    }

    /// Count distinct rows, stopping once `limit` have been seen
    fn count_distinct_limit(x: &Array2<f64>, limit: usize) -> usize {
        let mut distinct: Vec<Vec<u64>> = Vec::new();
        for row in x.rows() {
            let key: Vec<u64> = row.iter().map(|v| v.to_bits()).collect();
            if !distinct.contains(&key) {
                distinct.push(key);
                if distinct.len() >= limit {
                    return distinct.len();
                }
            }
        }
        distinct.len()
    }
}

impl Default for IsolationForest {
    fn default() -> Self {
        Self::new()
    }
}
