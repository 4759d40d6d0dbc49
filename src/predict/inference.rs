//! Predictions from every trained model for a single match

use std::collections::BTreeMap;

use crate::features::{FeatureSet, MinMax};
use crate::model::ModelKind;
use crate::training::TrainedModel;
use crate::{MatchRecord, Outcome};

/// One model's verdict on a match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelPrediction {
    pub kind: ModelKind,
    pub feature_set: FeatureSet,
    pub outcome: Outcome,
}

/// Trained models with the scalers fitted on their training rows
pub struct Predictor {
    models: Vec<TrainedModel>,
    normalization: BTreeMap<FeatureSet, MinMax>,
}

impl Predictor {
    pub fn new(models: Vec<TrainedModel>, normalization: BTreeMap<FeatureSet, MinMax>) -> Self {
        Predictor {
            models,
            normalization,
        }
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Features for `set`, scaled with the training parameters when known
    pub fn features(&self, set: FeatureSet, record: &MatchRecord) -> Vec<f64> {
        let raw = set.extract(record);
        match self.normalization.get(&set) {
            Some(min_max) => min_max.transform_row(&raw),
            None => raw,
        }
    }

    /// Every model's prediction, in training order
    pub fn predict(&self, record: &MatchRecord) -> Vec<ModelPrediction> {
        self.models
            .iter()
            .map(|m| ModelPrediction {
                kind: m.kind,
                feature_set: m.feature_set,
                outcome: m.model.predict_outcome(&self.features(m.feature_set, record)),
            })
            .collect()
    }
}
