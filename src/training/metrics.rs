//! Classification metrics and evaluation

use crate::{Outcome, Result, SoccerError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::Write as _;

/// Confusion matrix, accuracy and per-class precision/recall/F1
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationMetrics {
    /// Fraction of exact matches
    pub accuracy: f64,
    /// `confusion[i][j]` = count of true class i predicted as j
    pub confusion: Vec<Vec<usize>>,
    pub precision: Vec<f64>,
    pub recall: Vec<f64>,
    pub f1: Vec<f64>,
}

impl ClassificationMetrics {
    /// Compute metrics from true and predicted labels in `0..num_classes`
    pub fn compute(y_true: &[usize], y_pred: &[usize], num_classes: usize) -> Result<Self> {
        if y_true.len() != y_pred.len() {
            return Err(SoccerError::InvalidLabels(format!(
                "{} true labels but {} predictions",
                y_true.len(),
                y_pred.len()
            )));
        }
        if let Some(bad) = y_true
            .iter()
            .chain(y_pred.iter())
            .find(|&&label| label >= num_classes)
        {
            return Err(SoccerError::InvalidLabels(format!(
                "label {} outside 0..{}",
                bad, num_classes
            )));
        }

        let mut confusion = vec![vec![0usize; num_classes]; num_classes];
        let mut true_positives = vec![0usize; num_classes];
        let mut false_positives = vec![0usize; num_classes];
        let mut false_negatives = vec![0usize; num_classes];

        for (&t, &p) in y_true.iter().zip(y_pred.iter()) {
            confusion[t][p] += 1;
            if t == p {
                true_positives[t] += 1;
            } else {
                false_negatives[t] += 1;
                false_positives[p] += 1;
            }
        }

        let correct: usize = true_positives.iter().sum();
        let accuracy = if y_true.is_empty() {
            0.0
        } else {
            correct as f64 / y_true.len() as f64
        };

        let mut precision = vec![0.0; num_classes];
        let mut recall = vec![0.0; num_classes];
        let mut f1 = vec![0.0; num_classes];
        for c in 0..num_classes {
            let tp = true_positives[c] as f64;
            let fp = false_positives[c] as f64;
            let fn_ = false_negatives[c] as f64;
            precision[c] = if tp + fp > 0.0 { tp / (tp + fp) } else { 0.0 };
            recall[c] = if tp + fn_ > 0.0 { tp / (tp + fn_) } else { 0.0 };
            f1[c] = if precision[c] + recall[c] > 0.0 {
                2.0 * precision[c] * recall[c] / (precision[c] + recall[c])
            } else {
                0.0
            };
        }

        Ok(ClassificationMetrics {
            accuracy,
            confusion,
            precision,
            recall,
            f1,
        })
    }

    pub fn num_classes(&self) -> usize {
        self.confusion.len()
    }

    /// Total number of evaluated samples
    pub fn total(&self) -> usize {
        self.confusion.iter().flatten().sum()
    }

    /// Multi-line report: accuracy, confusion matrix, per-class table
    pub fn report(&self) -> String {
        let names: Vec<String> = (0..self.num_classes())
            .map(|c| {
                Outcome::from_label(c)
                    .map(|o| o.to_string())
                    .unwrap_or_else(|| format!("Class {}", c))
            })
            .collect();

        let mut out = String::new();
        let _ = writeln!(
            out,
            "Overall Accuracy: {:.4} ({:.2}%)",
            self.accuracy,
            self.accuracy * 100.0
        );
        let _ = writeln!(out, "\nConfusion Matrix:");
        let _ = write!(out, "{:<14}", "");
        for name in &names {
            let _ = write!(out, "{:>10}", name);
        }
        let _ = writeln!(out);
        for (i, row) in self.confusion.iter().enumerate() {
            let _ = write!(out, "{:<14}", format!("True {}", names[i]));
            for count in row {
                let _ = write!(out, "{:>10}", count);
            }
            let _ = writeln!(out);
        }
        let _ = writeln!(out, "\nPer-Class Metrics:");
        let _ = writeln!(
            out,
            "{:<12} {:>10} {:>10} {:>10}",
            "Class", "Precision", "Recall", "F1-Score"
        );
        for (c, name) in names.iter().enumerate() {
            let _ = writeln!(
                out,
                "{:<12} {:>10.4} {:>10.4} {:>10.4}",
                name, self.precision[c], self.recall[c], self.f1[c]
            );
        }
        out
    }
}

impl fmt::Display for ClassificationMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Acc: {:.2}% over {} samples", self.accuracy * 100.0, self.total())?;
        for c in 0..self.num_classes() {
            write!(f, " | F1[{}]: {:.3}", c, self.f1[c])?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_example() {
        let m = ClassificationMetrics::compute(&[0, 1, 2, 0], &[0, 1, 1, 2], 3).unwrap();
        assert_eq!(m.accuracy, 0.5);
        assert_eq!(m.confusion, vec![vec![1, 0, 1], vec![0, 1, 0], vec![0, 1, 0]]);
        assert_eq!(m.precision[0], 1.0);
        assert_eq!(m.recall[0], 0.5);
        assert!((m.f1[0] - 2.0 / 3.0).abs() < 1e-12);

        // Class 1: predicted twice, right once
        assert_eq!(m.precision[1], 0.5);
        assert_eq!(m.recall[1], 1.0);

        // Class 2: never predicted correctly
        assert_eq!(m.precision[2], 0.0);
        assert_eq!(m.recall[2], 0.0);
        assert_eq!(m.f1[2], 0.0);
        assert_eq!(m.total(), 4);
    }

    #[test]
    fn test_unpredicted_class_has_zero_precision() {
        let m = ClassificationMetrics::compute(&[0, 0, 1], &[0, 0, 0], 3).unwrap();
        assert_eq!(m.precision[1], 0.0);
        assert_eq!(m.recall[1], 0.0);
        assert_eq!(m.f1[1], 0.0);
        // Absent class
        assert_eq!(m.precision[2], 0.0);
        assert_eq!(m.recall[2], 0.0);
    }

    #[test]
    fn test_perfect_predictions() {
        let y = [0, 1, 2, 2, 1, 0];
        let m = ClassificationMetrics::compute(&y, &y, 3).unwrap();
        assert_eq!(m.accuracy, 1.0);
        assert_eq!(m.f1, vec![1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_empty_input() {
        let m = ClassificationMetrics::compute(&[], &[], 3).unwrap();
        assert_eq!(m.accuracy, 0.0);
        assert_eq!(m.total(), 0);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(ClassificationMetrics::compute(&[0, 1], &[0], 3).is_err());
        assert!(ClassificationMetrics::compute(&[0, 3], &[0, 1], 3).is_err());
    }

    #[test]
    fn test_report_mentions_classes() {
        let m = ClassificationMetrics::compute(&[0, 1, 2], &[0, 1, 2], 3).unwrap();
        let report = m.report();
        assert!(report.contains("Overall Accuracy: 1.0000"));
        assert!(report.contains("True Home Win"));
        assert!(report.contains("Away Win"));
    }
}
