// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Bagged regression trees
//!
//! Each tree is a CART regressor grown on a bootstrap sample. Splits minimise
//! the summed squared error of the two children over all features. 0/1
//! columns (the one-hot activity block) are scored in a single pass; other
//! columns are sorted and scanned with running sums.

use crate::errors::{FuelError, FuelResult};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::debug;

const MIN_GAIN: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForestParams {
    pub n_estimators: usize,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            max_depth: None,
            min_samples_split: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Node {
    Leaf {
        value: f64,
    },
    /// `x[feature] <= threshold` goes left
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    pub nodes: Vec<Node>,
}

#[derive(Default, Clone, Copy)]
struct Moments {
    count: f64,
    sum: f64,
    sum_sq: f64,
}

impl Moments {
    fn push(&mut self, y: f64) {
        self.count += 1.0;
        self.sum += y;
        self.sum_sq += y * y;
    }

    fn minus(self, other: Self) -> Self {
        Self {
            count: self.count - other.count,
            sum: self.sum - other.sum,
            sum_sq: self.sum_sq - other.sum_sq,
        }
    }

    fn sse(self) -> f64 {
        if self.count == 0.0 {
            return 0.0;
        }
        (self.sum_sq - self.sum * self.sum / self.count).max(0.0)
    }

    fn mean(self) -> f64 {
        if self.count == 0.0 {
            0.0
        } else {
            self.sum / self.count
        }
    }
}

struct SplitCandidate {
    feature: usize,
    threshold: f64,
    sse: f64,
}

struct GrowTask {
    node: usize,
    samples: Vec<usize>,
    depth: usize,
}

impl RegressionTree {
    /// Grow a tree on the rows listed in `samples` (repeats allowed)
    pub fn fit(x: &[Vec<f64>], y: &[f64], samples: Vec<usize>, params: &ForestParams, binary: &[bool]) -> Self {
        let mut nodes = vec![Node::Leaf { value: 0.0 }];
        let mut stack = vec![GrowTask {
            node: 0,
            samples,
            depth: 0,
        }];

        while let Some(task) = stack.pop() {
            let mut moments = Moments::default();
            for &i in &task.samples {
                moments.push(y[i]);
            }

            let depth_exhausted = params.max_depth.is_some_and(|max| task.depth >= max);
            let too_small = task.samples.len() < params.min_samples_split.max(2);
            let parent_sse = moments.sse();

            let split = if depth_exhausted || too_small || parent_sse <= MIN_GAIN {
                None
            } else {
                best_split(x, y, &task.samples, moments, binary)
                    .filter(|candidate| candidate.sse < parent_sse - MIN_GAIN)
            };

            let Some(split) = split else {
                nodes[task.node] = Node::Leaf {
                    value: moments.mean(),
                };
                continue;
            };

            let (left_samples, right_samples): (Vec<usize>, Vec<usize>) = task
                .samples
                .iter()
                .partition(|&&i| x[i][split.feature] <= split.threshold);

            let left = nodes.len();
            let right = left + 1;
            nodes.push(Node::Leaf { value: 0.0 });
            nodes.push(Node::Leaf { value: 0.0 });
            nodes[task.node] = Node::Split {
                feature: split.feature,
                threshold: split.threshold,
                left,
                right,
            };

            stack.push(GrowTask {
                node: right,
                samples: right_samples,
                depth: task.depth + 1,
            });
            stack.push(GrowTask {
                node: left,
                samples: left_samples,
                depth: task.depth + 1,
            });
        }

        Self { nodes }
    }

    /// Check that every split points forward to existing nodes and reads a
    /// column inside the row width
    ///
    /// # Errors
    ///
    /// Returns `ModelUnavailable` for an empty tree or a bad reference
    pub fn validate(&self, n_features: usize) -> FuelResult<()> {
        if self.nodes.is_empty() {
            return Err(FuelError::model_unavailable("tree has no nodes"));
        }
        for (index, node) in self.nodes.iter().enumerate() {
            if let Node::Split {
                feature, left, right, ..
            } = *node
            {
                if feature >= n_features {
                    return Err(FuelError::model_unavailable(format!(
                        "node {index} splits on feature {feature} of {n_features}"
                    )));
                }
                for child in [left, right] {
                    if child <= index || child >= self.nodes.len() {
                        return Err(FuelError::model_unavailable(format!(
                            "node {index} points to node {child}"
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    pub fn predict(&self, row: &[f64]) -> FuelResult<f64> {
        let mut index = 0;
        // A well-formed path visits each node at most once
        for _ in 0..=self.nodes.len() {
            match self.nodes.get(index) {
                Some(Node::Leaf { value }) => return Ok(*value),
                Some(Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let value = row.get(*feature).ok_or_else(|| {
                        FuelError::model_unavailable(format!(
                            "feature {feature} missing from a row of width {}",
                            row.len()
                        ))
                    })?;
                    index = if *value <= *threshold { *left } else { *right };
                }
                None => {
                    return Err(FuelError::model_unavailable(format!(
                        "tree references missing node {index}"
                    )))
                }
            }
        }
        Err(FuelError::model_unavailable("tree path does not reach a leaf"))
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|node| matches!(node, Node::Leaf { .. }))
            .count()
    }
}

fn best_split(
    x: &[Vec<f64>],
    y: &[f64],
    samples: &[usize],
    total: Moments,
    binary: &[bool],
) -> Option<SplitCandidate> {
    let mut best: Option<SplitCandidate> = None;
    let mut consider = |candidate: SplitCandidate| {
        if best.as_ref().map_or(true, |b| candidate.sse < b.sse) {
            best = Some(candidate);
        }
    };

    let mut pairs: Vec<(f64, f64)> = Vec::with_capacity(samples.len());

    for (feature, &is_binary) in binary.iter().enumerate() {
        if is_binary {
            let mut ones = Moments::default();
            for &i in samples {
                if x[i][feature] > 0.5 {
                    ones.push(y[i]);
                }
            }
            if ones.count == 0.0 || ones.count == total.count {
                continue;
            }
            let zeros = total.minus(ones);
            consider(SplitCandidate {
                feature,
                threshold: 0.5,
                sse: zeros.sse() + ones.sse(),
            });
            continue;
        }

        pairs.clear();
        pairs.extend(samples.iter().map(|&i| (x[i][feature], y[i])));
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut left = Moments::default();
        for k in 0..pairs.len() - 1 {
            left.push(pairs[k].1);
            let (current, next) = (pairs[k].0, pairs[k + 1].0);
            if current.total_cmp(&next) == Ordering::Equal {
                continue;
            }
            let right = total.minus(left);
            consider(SplitCandidate {
                feature,
                threshold: (current + next) / 2.0,
                sse: left.sse() + right.sse(),
            });
        }
    }

    best
}

/// Columns holding only 0 and 1
pub fn binary_columns(x: &[Vec<f64>]) -> Vec<bool> {
    let width = x.first().map_or(0, Vec::len);
    (0..width)
        .map(|feature| x.iter().all(|row| row[feature] == 0.0 || row[feature] == 1.0))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    pub trees: Vec<RegressionTree>,
    /// Expected row width
    pub n_features: usize,
}

impl RandomForest {
    /// Fit `params.n_estimators` trees on bootstrap samples drawn from `seed`
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for empty or ragged input
    pub fn fit(x: &[Vec<f64>], y: &[f64], params: &ForestParams, seed: u64) -> FuelResult<Self> {
        if x.is_empty() || x.len() != y.len() {
            return Err(FuelError::invalid_input(format!(
                "need matching non-empty feature and label sets, got {} rows and {} labels",
                x.len(),
                y.len()
            )));
        }
        let n_features = x[0].len();
        if x.iter().any(|row| row.len() != n_features) {
            return Err(FuelError::invalid_input("feature rows differ in width"));
        }
        if params.n_estimators == 0 {
            return Err(FuelError::invalid_input("forest needs at least one tree"));
        }

        let binary = binary_columns(x);
        let mut rng = StdRng::seed_from_u64(seed);
        let n = x.len();

        let trees: Vec<RegressionTree> = (0..params.n_estimators)
            .map(|tree_index| {
                let bootstrap: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
                let tree = RegressionTree::fit(x, y, bootstrap, params, &binary);
                debug!(tree_index, leaves = tree.leaf_count(), "Grew regression tree");
                tree
            })
            .collect();

        Ok(Self { trees, n_features })
    }

    /// Mean of the tree predictions
    ///
    /// # Errors
    ///
    /// Returns `ModelUnavailable` when the row width does not match
    pub fn predict(&self, row: &[f64]) -> FuelResult<f64> {
        if row.len() != self.n_features {
            return Err(FuelError::model_unavailable(format!(
                "expected {} features, got {}",
                self.n_features,
                row.len()
            )));
        }
        if self.trees.is_empty() {
            return Err(FuelError::model_unavailable("forest has no trees"));
        }

        let mut total = 0.0;
        for tree in &self.trees {
            total += tree.predict(row)?;
        }
        Ok(total / self.trees.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step_data() -> (Vec<Vec<f64>>, Vec<f64>) {
        let x: Vec<Vec<f64>> = (0..40).map(|i| vec![f64::from(i), f64::from(i % 2)]).collect();
        let y: Vec<f64> = (0..40).map(|i| if i < 20 { 10.0 } else { 50.0 }).collect();
        (x, y)
    }

    #[test]
    fn test_single_tree_learns_step() {
        let (x, y) = step_data();
        let params = ForestParams {
            n_estimators: 1,
            ..ForestParams::default()
        };
        let tree = RegressionTree::fit(&x, &y, (0..x.len()).collect(), &params, &binary_columns(&x));

        assert_eq!(tree.predict(&[3.0, 1.0]).unwrap(), 10.0);
        assert_eq!(tree.predict(&[30.0, 0.0]).unwrap(), 50.0);
        assert_eq!(tree.leaf_count(), 2);
    }

    #[test]
    fn test_cyclic_tree_is_rejected() {
        let tree = RegressionTree {
            nodes: vec![Node::Split {
                feature: 1,
                threshold: 1000.0,
                left: 0,
                right: 0,
            }],
        };
        assert!(matches!(tree.validate(2), Err(FuelError::ModelUnavailable(_))));
        assert!(matches!(tree.predict(&[1.0, 2.0]), Err(FuelError::ModelUnavailable(_))));
    }

    #[test]
    fn test_grown_tree_validates() {
        let (x, y) = step_data();
        let tree = RegressionTree::fit(&x, &y, (0..x.len()).collect(), &ForestParams::default(), &binary_columns(&x));
        assert!(tree.validate(2).is_ok());
        assert!(tree.validate(1).is_err());
    }

    #[test]
    fn test_binary_column_split() {
        let x = vec![vec![1.0, 0.0], vec![1.0, 0.0], vec![0.0, 1.0], vec![0.0, 1.0]];
        let y = vec![100.0, 100.0, 5.0, 5.0];
        assert_eq!(binary_columns(&x), vec![true, true]);

        let tree = RegressionTree::fit(&x, &y, vec![0, 1, 2, 3], &ForestParams::default(), &[true, true]);
        assert_eq!(tree.predict(&[1.0, 0.0]).unwrap(), 100.0);
        assert_eq!(tree.predict(&[0.0, 1.0]).unwrap(), 5.0);
    }

    #[test]
    fn test_max_depth_zero_is_mean() {
        let (x, y) = step_data();
        let params = ForestParams {
            n_estimators: 1,
            max_depth: Some(0),
            min_samples_split: 2,
        };
        let tree = RegressionTree::fit(&x, &y, (0..x.len()).collect(), &params, &binary_columns(&x));
        assert_eq!(tree.predict(&[0.0, 0.0]).unwrap(), 30.0);
    }

    #[test]
    fn test_forest_is_seeded() {
        let (x, y) = step_data();
        let params = ForestParams {
            n_estimators: 5,
            ..ForestParams::default()
        };
        let a = RandomForest::fit(&x, &y, &params, 42).unwrap();
        let b = RandomForest::fit(&x, &y, &params, 42).unwrap();
        assert_eq!(a, b);

        let prediction = a.predict(&[35.0, 1.0]).unwrap();
        assert!(prediction > 30.0 && prediction <= 50.0);
        assert!(a.predict(&[1.0]).is_err());
    }

    #[test]
    fn test_rejects_empty_input() {
        assert!(RandomForest::fit(&[], &[], &ForestParams::default(), 1).is_err());
    }
}
