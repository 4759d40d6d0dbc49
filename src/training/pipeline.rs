//! Feature matrices for every feature set, normalized on training rows only

use std::collections::BTreeMap;

use crate::features::{FeatureSet, MinMax};
use crate::MatchRecord;

/// Normalized train/test matrices for one feature set
#[derive(Debug, Clone)]
pub struct FeatureSplit {
    pub train: Vec<Vec<f64>>,
    pub test: Vec<Vec<f64>>,
    /// Fitted on the raw training matrix; reused for inference
    pub min_max: MinMax,
}

impl FeatureSplit {
    pub fn build(set: FeatureSet, train: &[MatchRecord], test: &[MatchRecord]) -> Self {
        let raw_train = set.build(train);
        let raw_test = set.build(test);
        let min_max = MinMax::fit(&raw_train);

        FeatureSplit {
            train: min_max.transform(&raw_train),
            test: min_max.transform(&raw_test),
            min_max,
        }
    }
}

/// All feature sets plus shared labels
#[derive(Debug, Clone)]
pub struct PreparedFeatures {
    pub splits: BTreeMap<FeatureSet, FeatureSplit>,
    pub y_train: Vec<usize>,
    pub y_test: Vec<usize>,
}

impl PreparedFeatures {
    pub fn build(train: &[MatchRecord], test: &[MatchRecord]) -> Self {
        let splits = FeatureSet::ALL
            .iter()
            .map(|&set| (set, FeatureSplit::build(set, train, test)))
            .collect();

        log::info!(
            "Prepared {} feature sets: {} train rows, {} test rows",
            FeatureSet::ALL.len(),
            train.len(),
            test.len()
        );

        PreparedFeatures {
            splits,
            y_train: FeatureSet::labels(train),
            y_test: FeatureSet::labels(test),
        }
    }

    pub fn get(&self, set: FeatureSet) -> Option<&FeatureSplit> {
        self.splits.get(&set)
    }

    /// The fitted scaler of every feature set
    pub fn normalizers(&self) -> BTreeMap<FeatureSet, MinMax> {
        self.splits
            .iter()
            .map(|(set, split)| (*set, split.min_max.clone()))
            .collect()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::{FormStats, Odds, Outcome, TeamAttributes};

    pub(crate) fn synthetic_records(n: usize) -> Vec<MatchRecord> {
        (0..n)
            .map(|i| {
                let outcome = Outcome::from_label(i % 3).unwrap();
                let (home, draw, away) = match outcome {
                    Outcome::HomeWin => (1.5, 4.0, 6.0),
                    Outcome::Draw => (3.0, 2.5, 3.0),
                    Outcome::AwayWin => (6.0, 4.0, 1.5),
                };
                let jitter = (i % 7) as f64 * 0.05;
                let attrs = |base: f64| TeamAttributes {
                    overall: base + jitter * 10.0,
                    aggression: 40.0 + (i % 11) as f64,
                    passing: 45.0 + (i % 5) as f64,
                    shooting: 50.0 + (i % 13) as f64,
                    defence: 55.0 - (i % 3) as f64,
                    build_up_speed: 50.0 + (i % 9) as f64,
                };
                MatchRecord {
                    outcome,
                    odds: Odds {
                        home: home + jitter,
                        draw: draw + jitter,
                        away: away - jitter,
                    },
                    home: attrs(150.0),
                    away: attrs(140.0),
                    home_form: FormStats::from_averages(1.0 + jitter, 1.2, 0.3 + jitter),
                    away_form: FormStats::from_averages(1.3, 0.9 + jitter, 0.5 - jitter),
                }
            })
            .collect()
    }

    #[test]
    fn test_every_set_prepared_with_width() {
        let records = synthetic_records(30);
        let prepared = PreparedFeatures::build(&records[..24], &records[24..]);
        assert_eq!(prepared.splits.len(), 9);
        for set in FeatureSet::ALL {
            let split = prepared.get(set).unwrap();
            assert_eq!(split.train.len(), 24);
            assert_eq!(split.test.len(), 6);
            assert!(split.train.iter().all(|r| r.len() == set.dim()));
            assert_eq!(split.min_max.dim(), set.dim());
        }
        assert_eq!(prepared.y_train.len(), 24);
        assert_eq!(prepared.y_test, vec![0, 1, 2, 0, 1, 2]);
    }

    #[test]
    fn test_train_rows_scaled_into_unit_range() {
        let records = synthetic_records(30);
        let prepared = PreparedFeatures::build(&records[..20], &records[20..]);
        for split in prepared.splits.values() {
            for row in &split.train {
                assert!(row.iter().all(|v| (0.0..=1.0).contains(v)));
            }
        }
    }

    #[test]
    fn test_test_rows_use_training_scaler() {
        let records = synthetic_records(30);
        let prepared = PreparedFeatures::build(&records[..20], &records[20..]);
        let split = prepared.get(FeatureSet::Odds).unwrap();
        let raw = FeatureSet::Odds.build(&records[20..]);
        assert_eq!(split.test, split.min_max.transform(&raw));
        assert_eq!(split.min_max, MinMax::fit(&FeatureSet::Odds.build(&records[..20])));
    }
}
