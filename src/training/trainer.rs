//! Train and evaluate a plan of (model, feature set) pairs

use std::fmt::Write;
use std::path::PathBuf;

use crate::export::metrics_csv::append_metrics;
use crate::features::FeatureSet;
use crate::model::{Model, ModelKind, ModelParams};
use crate::training::metrics::ClassificationMetrics;
use crate::training::pipeline::PreparedFeatures;
use crate::{Outcome, Result, SoccerError};

/// A fitted model with its held-out scores
#[derive(Debug, Clone)]
pub struct TrainedModel {
    pub kind: ModelKind,
    pub feature_set: FeatureSet,
    pub model: Model,
    pub metrics: ClassificationMetrics,
}

impl TrainedModel {
    /// Label used in logs and reports, e.g. `RandomForest (Combined)`
    pub fn label(&self) -> String {
        format!("{} ({})", self.kind, self.feature_set)
    }
}

/// Model/feature-set pairs trained by a full run
pub fn default_plan() -> Vec<(ModelKind, FeatureSet)> {
    use FeatureSet::*;
    use ModelKind::*;

    let mut plan = Vec::new();
    for set in [Odds, Combined, EnhancedCombined, Form, ComprehensiveTeam] {
        plan.push((LogisticRegression, set));
    }
    for set in [Odds, Combined, EnhancedCombined] {
        plan.push((RandomForest, set));
    }
    for set in [Odds, Combined, EnhancedCombined, Form] {
        plan.push((Lda, set));
    }
    plan
}

pub struct Trainer {
    params: ModelParams,
    metrics_csv: Option<PathBuf>,
}

impl Trainer {
    pub fn new(params: ModelParams) -> Self {
        Trainer {
            params,
            metrics_csv: None,
        }
    }

    /// Append one CSV row per trained model to `path`
    pub fn with_metrics_csv(mut self, path: impl Into<PathBuf>) -> Self {
        self.metrics_csv = Some(path.into());
        self
    }

    /// Train one pair and score it on the test rows
    pub fn train_one(
        &self,
        kind: ModelKind,
        feature_set: FeatureSet,
        prepared: &PreparedFeatures,
    ) -> Result<TrainedModel> {
        let split = prepared
            .get(feature_set)
            .ok_or_else(|| SoccerError::UnknownFeatureSet(feature_set.name().to_string()))?;

        let model = Model::fit(kind, &split.train, &prepared.y_train, &self.params)?;
        let predictions = model.predict_batch(&split.test);
        let metrics = ClassificationMetrics::compute(&prepared.y_test, &predictions, Outcome::COUNT)?;

        Ok(TrainedModel {
            kind,
            feature_set,
            model,
            metrics,
        })
    }

    /// Train every pair; failures are logged and skipped
    pub fn run(&self, plan: &[(ModelKind, FeatureSet)], prepared: &PreparedFeatures) -> Vec<TrainedModel> {
        let mut trained = Vec::with_capacity(plan.len());

        for &(kind, feature_set) in plan {
            log::info!("Training {} on {}", kind, feature_set);
            let result = match self.train_one(kind, feature_set, prepared) {
                Ok(result) => result,
                Err(e) => {
                    log::warn!("Skipping {} ({}): {}", kind, feature_set, e);
                    continue;
                }
            };

            log::info!("{}: {}", result.label(), result.metrics);

            if let Some(path) = &self.metrics_csv {
                if let Err(e) = append_metrics(path, &result) {
                    log::error!("Failed to write metrics to {}: {}", path.display(), e);
                }
            }
            trained.push(result);
        }

        log::info!("Trained {}/{} models", trained.len(), plan.len());
        trained
    }
}

/// Models ranked by test accuracy, best first
pub fn comparison_table(models: &[TrainedModel]) -> String {
    let mut ranked: Vec<&TrainedModel> = models.iter().collect();
    ranked.sort_by(|a, b| b.metrics.accuracy.total_cmp(&a.metrics.accuracy));

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<20} {:<20} {:>10} {:>8} {:>8} {:>8}",
        "Model", "Features", "Accuracy", "F1 H", "F1 D", "F1 A"
    );
    let _ = writeln!(out, "{}", "-".repeat(79));
    for m in ranked {
        let _ = writeln!(
            out,
            "{:<20} {:<20} {:>9.2}% {:>8.4} {:>8.4} {:>8.4}",
            m.kind.name(),
            m.feature_set.name(),
            m.metrics.accuracy * 100.0,
            m.metrics.f1[0],
            m.metrics.f1[1],
            m.metrics.f1[2]
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::training::pipeline::tests::synthetic_records;

    fn fast_params() -> ModelParams {
        ModelParams {
            logistic_epochs: 20,
            forest_trees: 5,
            forest_max_depth: 4,
            ..ModelParams::default()
        }
    }

    #[test]
    fn test_default_plan() {
        let plan = default_plan();
        assert_eq!(plan.len(), 12);
        assert_eq!(plan[0], (ModelKind::LogisticRegression, FeatureSet::Odds));
        assert!(plan.contains(&(ModelKind::Lda, FeatureSet::Form)));
        assert!(!plan.contains(&(ModelKind::RandomForest, FeatureSet::Form)));
    }

    #[test]
    fn test_train_one_scores_test_rows() {
        let records = synthetic_records(60);
        let prepared = PreparedFeatures::build(&records[..45], &records[45..]);
        let trainer = Trainer::new(fast_params());
        let result = trainer
            .train_one(ModelKind::RandomForest, FeatureSet::Odds, &prepared)
            .unwrap();
        assert_eq!(result.metrics.total(), 15);
        assert_eq!(result.label(), "RandomForest (Odds)");
    }

    #[test]
    fn test_run_skips_failed_models() {
        let mut records = synthetic_records(60);
        for r in records.iter_mut() {
            r.odds = crate::Odds {
                home: 2.0,
                draw: 3.0,
                away: 4.0,
            };
        }
        // Constant odds scale to 0.5 everywhere, so LDA sees a singular covariance
        let prepared = PreparedFeatures::build(&records[..45], &records[45..]);
        let trainer = Trainer::new(fast_params());
        let plan = vec![
            (ModelKind::RandomForest, FeatureSet::Odds),
            (ModelKind::Lda, FeatureSet::Odds),
        ];

        let trained = trainer.run(&plan, &prepared);
        assert_eq!(trained.len(), 1);
        assert_eq!(trained[0].kind, ModelKind::RandomForest);
    }

    #[test]
    fn test_run_appends_metrics_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("metrics.csv");
        let records = synthetic_records(60);
        let prepared = PreparedFeatures::build(&records[..45], &records[45..]);
        let trainer = Trainer::new(fast_params()).with_metrics_csv(&path);
        let plan = vec![
            (ModelKind::RandomForest, FeatureSet::Odds),
            (ModelKind::Lda, FeatureSet::Odds),
        ];
        let trained = trainer.run(&plan, &prepared);

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 1 + trained.len());
        assert!(contents.starts_with("modelType,featureSet,accuracy"));
    }

    #[test]
    fn test_comparison_table_sorted_by_accuracy() {
        let records = synthetic_records(60);
        let prepared = PreparedFeatures::build(&records[..45], &records[45..]);
        let trainer = Trainer::new(fast_params());
        let mut a = trainer
            .train_one(ModelKind::RandomForest, FeatureSet::Odds, &prepared)
            .unwrap();
        let mut b = a.clone();
        a.metrics.accuracy = 0.4;
        b.metrics.accuracy = 0.6;
        b.feature_set = FeatureSet::Combined;

        let table = comparison_table(&[a, b]);
        let lines: Vec<&str> = table.lines().collect();
        assert!(lines[2].contains("Combined"));
        assert!(lines[2].contains("60.00%"));
        assert!(lines[3].contains("40.00%"));
    }
}
