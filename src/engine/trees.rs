//! Gradient-boosted tree ensemble
//!
//! Trees are stored as parallel node arrays, XGBoost style. A node is a leaf
//! when its left child is `-1`. Splits send a row left when
//! `x < split_condition`; missing values (NaN) follow `default_left`.
//! The ensemble uses a logistic link: `p = sigmoid(logit(base_score) + Σ leaf)`.

use ndarray::{Array1, ArrayView1, ArrayView2};
use serde::Deserialize;

use super::bundle::BundleError;
use super::classifier::{check_width, logit, sigmoid, Classifier, InferenceError};

fn default_base_score() -> f64 {
    0.5
}

/// Single regression tree
#[derive(Debug, Clone, Deserialize)]
pub struct Tree {
    pub left_children: Vec<i32>,
    pub right_children: Vec<i32>,
    pub split_indices: Vec<u32>,
    pub split_conditions: Vec<f32>,
    /// Empty means missing values always go left
    #[serde(default)]
    pub default_left: Vec<bool>,
    pub leaf_values: Vec<f32>,
}

impl Tree {
    fn num_nodes(&self) -> usize {
        self.left_children.len()
    }

    /// Structural checks. Children must come after their parent, which
    /// guarantees traversal terminates.
    fn validate(&self, num_features: usize) -> Result<(), String> {
        let n = self.num_nodes();
        if n == 0 {
            return Err("tree has no nodes".to_string());
        }

        let lengths = [
            self.right_children.len(),
            self.split_indices.len(),
            self.split_conditions.len(),
            self.leaf_values.len(),
        ];
        if lengths.iter().any(|&len| len != n) {
            return Err(format!("node arrays disagree on length (expected {})", n));
        }
        if !self.default_left.is_empty() && self.default_left.len() != n {
            return Err(format!("default_left has {} entries, expected {}", self.default_left.len(), n));
        }

        for node in 0..n {
            let (left, right) = (self.left_children[node], self.right_children[node]);
            if left == -1 {
                if right != -1 {
                    return Err(format!("node {} has a right child but no left child", node));
                }
                if !self.leaf_values[node].is_finite() {
                    return Err(format!("leaf {} has a non-finite value", node));
                }
                continue;
            }

            for child in [left, right] {
                if child <= node as i32 || child as usize >= n {
                    return Err(format!("node {} has invalid child {}", node, child));
                }
            }

            if self.split_indices[node] as usize >= num_features {
                return Err(format!(
                    "node {} splits on feature {} (model has {})",
                    node, self.split_indices[node], num_features
                ));
            }
        }

        Ok(())
    }

    fn leaf_value(&self, row: ArrayView1<'_, f32>) -> f32 {
        let mut node = 0usize;
        loop {
            let left = self.left_children[node];
            if left < 0 {
                return self.leaf_values[node];
            }

            let x = row[self.split_indices[node] as usize];
            let go_left = if x.is_nan() {
                self.default_left.get(node).copied().unwrap_or(true)
            } else {
                x < self.split_conditions[node]
            };

            node = if go_left {
                left as usize
            } else {
                self.right_children[node] as usize
            };
        }
    }
}

/// Binary-logistic boosted forest
#[derive(Debug, Clone, Deserialize)]
pub struct TreeEnsemble {
    pub num_features: usize,

    /// Prior probability; the forest adds to its logit
    #[serde(default = "default_base_score")]
    pub base_score: f64,

    #[serde(default)]
    pub feature_names: Option<Vec<String>>,

    pub trees: Vec<Tree>,
}

impl TreeEnsemble {
    pub fn validate(&self) -> Result<(), BundleError> {
        if self.trees.is_empty() {
            return Err(BundleError::InvalidModel("tree ensemble has no trees".to_string()));
        }
        if !(self.base_score > 0.0 && self.base_score < 1.0) {
            return Err(BundleError::InvalidModel(format!(
                "base_score {} must be strictly between 0 and 1",
                self.base_score
            )));
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(self.num_features)
                .map_err(|e| BundleError::InvalidModel(format!("tree {}: {}", i, e)))?;
        }
        Ok(())
    }

    /// Raw additive score before the logistic link
    pub fn margin(&self, row: ArrayView1<'_, f32>) -> f64 {
        let base = logit(self.base_score);
        self.trees
            .iter()
            .fold(base, |acc, tree| acc + tree.leaf_value(row) as f64)
    }
}

impl Classifier for TreeEnsemble {
    fn kind(&self) -> &'static str {
        "tree_ensemble"
    }

    fn n_features(&self) -> usize {
        self.num_features
    }

    fn feature_names(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }

    fn predict_proba(&self, rows: ArrayView2<'_, f32>) -> Result<Array1<f64>, InferenceError> {
        check_width(&rows, self.num_features)?;
        Ok(rows.outer_iter().map(|row| sigmoid(self.margin(row))).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn stump(feature: u32, cond: f32, left: f32, right: f32) -> Tree {
        Tree {
            left_children: vec![1, -1, -1],
            right_children: vec![2, -1, -1],
            split_indices: vec![feature, 0, 0],
            split_conditions: vec![cond, 0.0, 0.0],
            default_left: vec![false, false, false],
            leaf_values: vec![0.0, left, right],
        }
    }

    fn ensemble(trees: Vec<Tree>) -> TreeEnsemble {
        TreeEnsemble {
            num_features: 2,
            base_score: 0.5,
            feature_names: None,
            trees,
        }
    }

    #[test]
    fn test_split_direction() {
        let model = ensemble(vec![stump(0, 1.0, -1.0, 2.0)]);
        model.validate().unwrap();

        let rows = array![[0.5f32, 0.0], [1.0, 0.0], [3.0, 0.0]];
        let p = model.predict_proba(rows.view()).unwrap();
        // Strictly-less-than goes left; equality goes right
        assert!((p[0] - sigmoid(-1.0)).abs() < 1e-12);
        assert!((p[1] - sigmoid(2.0)).abs() < 1e-12);
        assert!((p[2] - sigmoid(2.0)).abs() < 1e-12);
    }

    #[test]
    fn test_margins_add_up() {
        let model = TreeEnsemble {
            base_score: 0.2,
            ..ensemble(vec![stump(0, 1.0, -0.5, 0.5), stump(1, 10.0, 0.25, 1.0)])
        };
        let rows = array![[2.0f32, 4.0]];
        let expected = sigmoid(logit(0.2) + 0.5 + 0.25);
        let p = model.predict_proba(rows.view()).unwrap();
        assert!((p[0] - expected).abs() < 1e-9);
    }

    #[test]
    fn test_missing_follows_default() {
        let mut tree = stump(0, 1.0, -1.0, 1.0);
        tree.default_left = vec![true, false, false];
        let model = ensemble(vec![tree]);
        let rows = array![[f32::NAN, 0.0]];
        let p = model.predict_proba(rows.view()).unwrap();
        assert!((p[0] - sigmoid(-1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_cycles_and_bad_indices() {
        let mut tree = stump(0, 1.0, 0.0, 0.0);
        tree.left_children[0] = 0;
        assert!(ensemble(vec![tree]).validate().is_err());

        let tree = stump(5, 1.0, 0.0, 0.0);
        assert!(ensemble(vec![tree]).validate().is_err());

        let mut tree = stump(0, 1.0, 0.0, 0.0);
        tree.leaf_values.pop();
        assert!(ensemble(vec![tree]).validate().is_err());

        assert!(ensemble(vec![]).validate().is_err());
    }

    #[test]
    fn test_rejects_degenerate_base_score() {
        let model = TreeEnsemble {
            base_score: 1.0,
            ..ensemble(vec![stump(0, 1.0, 0.0, 0.0)])
        };
        assert!(model.validate().is_err());
    }

    #[test]
    fn test_width_mismatch() {
        let model = ensemble(vec![stump(0, 1.0, 0.0, 0.0)]);
        let rows = array![[1.0f32, 2.0, 3.0]];
        assert!(model.predict_proba(rows.view()).is_err());
    }
}
