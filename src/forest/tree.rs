//! Arena-backed isolation tree

use ndarray::{Array2, ArrayView1};
use rand::prelude::*;
use serde::{Deserialize, Serialize};

/// Node of an isolation tree, addressed by index into the tree's arena
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TreeNode {
    /// Internal split node
    Split {
        /// Feature index for the split
        feature: usize,
        /// Split threshold; values < threshold go left
        threshold: f64,
        /// Arena index of the left subtree
        left: usize,
        /// Arena index of the right subtree
        right: usize,
    },
    /// External node holding the terminating subsample size
    Leaf { size: usize },
}

/// A single isolation tree over a subsample of rows.
///
/// Nodes live in a flat arena with indexed children, so a seeded build is
/// fully reproducible and trees can be constructed independently across an
/// ensemble. Splits pick a feature uniformly at random and a threshold
/// uniformly between the feature's min and max within the node's subsample;
/// growth stops at the height limit or when a node holds at most one point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IsolationTree {
    nodes: Vec<TreeNode>,
    root: usize,
}

impl IsolationTree {
    /// Grow a tree over the given row subsample
    pub fn fit(
        x: &Array2<f64>,
        indices: &[usize],
        max_height: usize,
        rng: &mut impl Rng,
    ) -> Self {
        let mut nodes = Vec::new();
        let root = Self::grow(&mut nodes, x, indices, 0, max_height, rng);
        Self { nodes, root }
    }

    fn grow(
        nodes: &mut Vec<TreeNode>,
        x: &Array2<f64>,
        indices: &[usize],
        height: usize,
        max_height: usize,
        rng: &mut impl Rng,
    ) -> usize {
        let n_samples = indices.len();

        if height >= max_height || n_samples <= 1 {
            nodes.push(TreeNode::Leaf { size: n_samples });
            return nodes.len() - 1;
        }

        let feature = rng.gen_range(0..x.ncols());

        let mut min_val = f64::INFINITY;
        let mut max_val = f64::NEG_INFINITY;
        for &i in indices {
            let v = x[[i, feature]];
            min_val = min_val.min(v);
            max_val = max_val.max(v);
        }

        // Constant feature within this subsample, nothing left to split on
        if (max_val - min_val).abs() < 1e-10 {
            nodes.push(TreeNode::Leaf { size: n_samples });
            return nodes.len() - 1;
        }

        let threshold = rng.gen_range(min_val..max_val);

        let (left_indices, right_indices): (Vec<usize>, Vec<usize>) =
            indices.iter().partition(|&&i| x[[i, feature]] < threshold);

        if left_indices.is_empty() || right_indices.is_empty() {
            nodes.push(TreeNode::Leaf { size: n_samples });
            return nodes.len() - 1;
        }

        let left = Self::grow(nodes, x, &left_indices, height + 1, max_height, rng);
        let right = Self::grow(nodes, x, &right_indices, height + 1, max_height, rng);

        nodes.push(TreeNode::Split {
            feature,
            threshold,
            left,
            right,
        });
        nodes.len() - 1
    }

    /// Corrected path length for a sample: the depth of the leaf it lands in
    /// plus the expected remaining path through the leaf's subsample
    pub fn path_length(&self, sample: ArrayView1<f64>) -> f64 {
        let mut node = self.root;
        let mut depth = 0usize;
        loop {
            match &self.nodes[node] {
                TreeNode::Leaf { size } => {
                    return depth as f64 + Self::average_path_length(*size);
                }
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if sample[*feature] < *threshold {
                        *left
                    } else {
                        *right
                    };
                    depth += 1;
                }
            }
        }
    }

    /// Expected path length of an unsuccessful BST search over n points:
    /// c(n) = 2 H(n-1) - 2(n-1)/n, with H(i) approximated via ln(i) + gamma
    pub fn average_path_length(n: usize) -> f64 {
        if n <= 1 {
            0.0
        } else if n == 2 {
            1.0
        } else {
            let n_f = n as f64;
            2.0 * ((n_f - 1.0).ln() + 0.5772156649) - 2.0 * (n_f - 1.0) / n_f
        }
    }

    /// Number of arena nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
