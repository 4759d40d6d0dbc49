//! Random forest of Gini decision trees
//!
//! Each tree is grown on a bootstrap sample and considers a random subset of
//! `sqrt(d)` features at every split. Prediction is a majority vote.

use rand::rngs::StdRng;
use rand::seq::index::sample;
use rand::{Rng, SeedableRng};

use super::{argmax, check_training_data, Classifier, ModelKind, ModelParams};
use crate::{Outcome, Result, SoccerError};

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Leaf(usize),
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

/// One fitted CART tree
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionTree {
    root: Node,
}

impl DecisionTree {
    pub fn predict(&self, row: &[f64]) -> usize {
        let mut node = &self.root;
        loop {
            match node {
                Node::Leaf(label) => return *label,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    let value = row.get(*feature).copied().unwrap_or(0.0);
                    node = if value <= *threshold { left } else { right };
                }
            }
        }
    }

    pub fn depth(&self) -> usize {
        fn walk(node: &Node) -> usize {
            match node {
                Node::Leaf(_) => 0,
                Node::Split { left, right, .. } => 1 + walk(left).max(walk(right)),
            }
        }
        walk(&self.root)
    }
}

struct TreeBuilder<'a> {
    x: &'a [Vec<f64>],
    y: &'a [usize],
    dim: usize,
    features_per_split: usize,
    max_depth: usize,
    min_samples_split: usize,
}

impl<'a> TreeBuilder<'a> {
    fn build(&self, samples: &[usize], depth: usize, rng: &mut StdRng) -> Node {
        let counts = class_counts(self.y, samples);
        let majority = majority(&counts);

        let pure = counts.iter().filter(|&&c| c > 0).count() <= 1;
        if pure || depth >= self.max_depth || samples.len() < self.min_samples_split {
            return Node::Leaf(majority);
        }

        let parent_gini = gini(&counts, samples.len());
        let mut best: Option<(usize, f64, f64)> = None;

        for feature in sample(rng, self.dim, self.features_per_split).into_iter() {
            if let Some((threshold, impurity)) = self.best_threshold(samples, feature) {
                if impurity < parent_gini - 1e-12 && best.map_or(true, |(_, _, b)| impurity < b) {
                    best = Some((feature, threshold, impurity));
                }
            }
        }

        let Some((feature, threshold, _)) = best else {
            return Node::Leaf(majority);
        };

        let (left, right): (Vec<usize>, Vec<usize>) =
            samples.iter().partition(|&&i| self.x[i][feature] <= threshold);

        Node::Split {
            feature,
            threshold,
            left: Box::new(self.build(&left, depth + 1, rng)),
            right: Box::new(self.build(&right, depth + 1, rng)),
        }
    }

    /// Lowest weighted Gini over midpoints between distinct sorted values
    fn best_threshold(&self, samples: &[usize], feature: usize) -> Option<(f64, f64)> {
        let mut sorted: Vec<(f64, usize)> = samples.iter().map(|&i| (self.x[i][feature], self.y[i])).collect();
        sorted.sort_by(|a, b| a.0.total_cmp(&b.0));

        let n = sorted.len();
        if n < 2 {
            return None;
        }
        let mut right = [0usize; Outcome::COUNT];
        for (_, label) in &sorted {
            right[*label] += 1;
        }
        let mut left = [0usize; Outcome::COUNT];

        let mut best: Option<(f64, f64)> = None;
        for i in 0..n - 1 {
            let label = sorted[i].1;
            left[label] += 1;
            right[label] -= 1;

            if sorted[i].0 == sorted[i + 1].0 {
                continue;
            }
            let n_left = i + 1;
            let n_right = n - n_left;
            let impurity = (n_left as f64 * gini(&left, n_left) + n_right as f64 * gini(&right, n_right)) / n as f64;
            if best.map_or(true, |(_, b)| impurity < b) {
                best = Some(((sorted[i].0 + sorted[i + 1].0) / 2.0, impurity));
            }
        }
        best
    }
}

fn class_counts(y: &[usize], samples: &[usize]) -> [usize; Outcome::COUNT] {
    let mut counts = [0; Outcome::COUNT];
    for &i in samples {
        counts[y[i]] += 1;
    }
    counts
}

fn majority(counts: &[usize; Outcome::COUNT]) -> usize {
    let as_f64: Vec<f64> = counts.iter().map(|&c| c as f64).collect();
    argmax(&as_f64)
}

fn gini(counts: &[usize; Outcome::COUNT], total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    1.0 - counts
        .iter()
        .map(|&c| {
            let p = c as f64 / total;
            p * p
        })
        .sum::<f64>()
}

/// Bagged decision trees
#[derive(Debug, Clone, PartialEq)]
pub struct RandomForest {
    trees: Vec<DecisionTree>,
}

impl RandomForest {
    pub fn trees(&self) -> &[DecisionTree] {
        &self.trees
    }

    /// Number of trees voting for each class
    pub fn votes(&self, row: &[f64]) -> [usize; Outcome::COUNT] {
        let mut votes = [0; Outcome::COUNT];
        for tree in &self.trees {
            votes[tree.predict(row)] += 1;
        }
        votes
    }
}

impl Classifier for RandomForest {
    fn fit(x: &[Vec<f64>], y: &[usize], params: &ModelParams) -> Result<Self> {
        let dim = check_training_data(ModelKind::RandomForest, x, y)?;
        if params.forest_trees == 0 {
            return Err(SoccerError::ModelFit {
                model: ModelKind::RandomForest.name().to_string(),
                message: "forest needs at least one tree".to_string(),
            });
        }

        let builder = TreeBuilder {
            x,
            y,
            dim,
            features_per_split: ((dim as f64).sqrt().floor() as usize).clamp(1, dim),
            max_depth: params.forest_max_depth,
            min_samples_split: params.forest_min_samples_split.max(2),
        };

        log::info!(
            "Training random forest: {} trees, {} rows, {} features ({} per split)",
            params.forest_trees,
            x.len(),
            dim,
            builder.features_per_split
        );

        let mut rng = StdRng::seed_from_u64(params.seed);
        let n = x.len();
        let trees = (0..params.forest_trees)
            .map(|_| {
                let bootstrap: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
                DecisionTree {
                    root: builder.build(&bootstrap, 0, &mut rng),
                }
            })
            .collect();

        Ok(RandomForest { trees })
    }

    fn predict(&self, row: &[f64]) -> usize {
        majority(&self.votes(row))
    }
}
