//! Outcome classifiers
//!
//! Three interchangeable models behind one `Classifier` capability:
//! - LogisticRegression: multinomial linear model trained with burn
//! - RandomForest: bagged Gini decision trees
//! - LDA: linear discriminant analysis with pooled covariance

pub mod forest;
pub mod lda;
pub mod logistic;

pub use forest::RandomForest;
pub use lda::Lda;
pub use logistic::LogisticRegression;

use crate::{Outcome, Result, SoccerError, TrainingConfig};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Hyperparameters shared by all model kinds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelParams {
    pub seed: u64,
    pub logistic_epochs: usize,
    pub logistic_learning_rate: f64,
    pub forest_trees: usize,
    pub forest_max_depth: usize,
    pub forest_min_samples_split: usize,
}

impl Default for ModelParams {
    fn default() -> Self {
        ModelParams::from(&TrainingConfig::default())
    }
}

impl From<&TrainingConfig> for ModelParams {
    fn from(config: &TrainingConfig) -> Self {
        ModelParams {
            seed: config.seed,
            logistic_epochs: config.logistic_epochs,
            logistic_learning_rate: config.logistic_learning_rate,
            forest_trees: config.forest_trees,
            forest_max_depth: config.forest_max_depth,
            forest_min_samples_split: config.forest_min_samples_split,
        }
    }
}

/// Fit on labelled rows, then predict one label per row
pub trait Classifier: Sized {
    fn fit(x: &[Vec<f64>], y: &[usize], params: &ModelParams) -> Result<Self>;

    fn predict(&self, row: &[f64]) -> usize;

    fn predict_batch(&self, rows: &[Vec<f64>]) -> Vec<usize> {
        rows.iter().map(|r| self.predict(r)).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ModelKind {
    LogisticRegression,
    RandomForest,
    Lda,
}

impl ModelKind {
    pub const ALL: [ModelKind; 3] = [
        ModelKind::LogisticRegression,
        ModelKind::RandomForest,
        ModelKind::Lda,
    ];

    /// Name used in logs and the metrics CSV `modelType` column
    pub fn name(&self) -> &'static str {
        match self {
            ModelKind::LogisticRegression => "LogisticRegression",
            ModelKind::RandomForest => "RandomForest",
            ModelKind::Lda => "LDA",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ModelKind {
    type Err = SoccerError;

    fn from_str(s: &str) -> Result<Self> {
        ModelKind::ALL
            .iter()
            .copied()
            .find(|k| k.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SoccerError::Parse(format!("unknown model kind '{}'", s)))
    }
}

/// A fitted model of any kind
#[derive(Debug, Clone)]
pub enum Model {
    Logistic(LogisticRegression),
    Forest(RandomForest),
    Lda(Lda),
}

impl Model {
    pub fn fit(kind: ModelKind, x: &[Vec<f64>], y: &[usize], params: &ModelParams) -> Result<Self> {
        Ok(match kind {
            ModelKind::LogisticRegression => Model::Logistic(LogisticRegression::fit(x, y, params)?),
            ModelKind::RandomForest => Model::Forest(RandomForest::fit(x, y, params)?),
            ModelKind::Lda => Model::Lda(Lda::fit(x, y, params)?),
        })
    }

    pub fn kind(&self) -> ModelKind {
        match self {
            Model::Logistic(_) => ModelKind::LogisticRegression,
            Model::Forest(_) => ModelKind::RandomForest,
            Model::Lda(_) => ModelKind::Lda,
        }
    }

    pub fn predict(&self, row: &[f64]) -> usize {
        match self {
            Model::Logistic(m) => m.predict(row),
            Model::Forest(m) => m.predict(row),
            Model::Lda(m) => m.predict(row),
        }
    }

    pub fn predict_batch(&self, rows: &[Vec<f64>]) -> Vec<usize> {
        rows.iter().map(|r| self.predict(r)).collect()
    }

    pub fn predict_outcome(&self, row: &[f64]) -> Outcome {
        Outcome::from_label(self.predict(row)).unwrap_or(Outcome::HomeWin)
    }
}

/// Check a training set and return its feature width
pub(crate) fn check_training_data(model: ModelKind, x: &[Vec<f64>], y: &[usize]) -> Result<usize> {
    if x.is_empty() {
        return Err(SoccerError::ModelFit {
            model: model.name().to_string(),
            message: "no training rows".to_string(),
        });
    }
    if x.len() != y.len() {
        return Err(SoccerError::InvalidLabels(format!(
            "{} rows but {} labels",
            x.len(),
            y.len()
        )));
    }
    if let Some(&bad) = y.iter().find(|&&label| label >= Outcome::COUNT) {
        return Err(SoccerError::InvalidLabels(format!("label {} out of range", bad)));
    }
    let dim = x[0].len();
    if dim == 0 || x.iter().any(|row| row.len() != dim) {
        return Err(SoccerError::ModelFit {
            model: model.name().to_string(),
            message: "rows must share a non-zero width".to_string(),
        });
    }
    Ok(dim)
}

/// Index of the largest value; the first wins on ties
pub(crate) fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, v) in values.iter().enumerate() {
        if *v > values[best] {
            best = i;
        }
    }
    best
}
