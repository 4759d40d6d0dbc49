//! Min-max feature scaling
//!
//! Parameters are fitted on training rows only and reused verbatim for
//! held-out and interactive rows.

use serde::{Deserialize, Serialize};

/// Columns with a range at or below this are treated as constant
pub const CONSTANT_RANGE_EPS: f64 = 1e-4;

/// Value assigned to every cell of a constant column
pub const CONSTANT_FEATURE_VALUE: f64 = 0.5;

/// Per-column minimum and maximum from a training matrix
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MinMax {
    pub min: Vec<f64>,
    pub max: Vec<f64>,
}

impl MinMax {
    /// Fit on training rows. An empty matrix yields empty parameters.
    pub fn fit(rows: &[Vec<f64>]) -> Self {
        let Some(first) = rows.first() else {
            return MinMax::default();
        };

        let mut min = first.clone();
        let mut max = first.clone();
        for row in &rows[1..] {
            for (j, &value) in row.iter().enumerate() {
                if value < min[j] {
                    min[j] = value;
                }
                if value > max[j] {
                    max[j] = value;
                }
            }
        }

        MinMax { min, max }
    }

    /// Number of columns
    pub fn dim(&self) -> usize {
        self.min.len()
    }

    /// Scale one row into [0, 1] relative to the fitted range
    pub fn transform_row(&self, row: &[f64]) -> Vec<f64> {
        row.iter()
            .zip(self.min.iter().zip(self.max.iter()))
            .map(|(&value, (&min, &max))| {
                let range = max - min;
                if range > CONSTANT_RANGE_EPS {
                    (value - min) / range
                } else {
                    CONSTANT_FEATURE_VALUE
                }
            })
            .collect()
    }

    /// Scale every row
    pub fn transform(&self, rows: &[Vec<f64>]) -> Vec<Vec<f64>> {
        rows.iter().map(|row| self.transform_row(row)).collect()
    }
}
