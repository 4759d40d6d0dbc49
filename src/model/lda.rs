//! Linear discriminant analysis
//!
//! Gaussian classes sharing one pooled covariance matrix. Each class gets a
//! linear score `x . w_k + c_k` with `w_k = S^-1 mu_k` and
//! `c_k = -0.5 mu_k . w_k + ln(prior_k)`.

use super::{argmax, check_training_data, Classifier, ModelKind, ModelParams};
use crate::{Outcome, Result, SoccerError};

/// Pivots smaller than this make the covariance matrix singular
pub const SINGULAR_PIVOT_EPS: f64 = 1e-10;

#[derive(Debug, Clone, PartialEq)]
struct Discriminant {
    weights: Vec<f64>,
    constant: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Lda {
    /// `None` for classes absent from the training rows
    discriminants: Vec<Option<Discriminant>>,
}

impl Lda {
    /// Discriminant score per class; absent classes score `-inf`
    pub fn scores(&self, row: &[f64]) -> [f64; Outcome::COUNT] {
        let mut scores = [f64::NEG_INFINITY; Outcome::COUNT];
        for (k, disc) in self.discriminants.iter().enumerate() {
            if let Some(d) = disc {
                scores[k] = d.constant + d.weights.iter().zip(row).map(|(w, x)| w * x).sum::<f64>();
            }
        }
        scores
    }
}

impl Classifier for Lda {
    fn fit(x: &[Vec<f64>], y: &[usize], _params: &ModelParams) -> Result<Self> {
        let dim = check_training_data(ModelKind::Lda, x, y)?;
        let n = x.len();

        let mut counts = [0usize; Outcome::COUNT];
        let mut means = vec![vec![0.0; dim]; Outcome::COUNT];
        for (row, &label) in x.iter().zip(y) {
            counts[label] += 1;
            for (m, v) in means[label].iter_mut().zip(row) {
                *m += v;
            }
        }
        for (mean, &count) in means.iter_mut().zip(&counts) {
            if count > 0 {
                mean.iter_mut().for_each(|m| *m /= count as f64);
            }
        }

        let present = counts.iter().filter(|&&c| c > 0).count();
        let dof = if n > present { n - present } else { n };
        let mut cov = vec![vec![0.0; dim]; dim];
        for (row, &label) in x.iter().zip(y) {
            let centred: Vec<f64> = row.iter().zip(&means[label]).map(|(v, m)| v - m).collect();
            for i in 0..dim {
                for j in 0..dim {
                    cov[i][j] += centred[i] * centred[j];
                }
            }
        }
        cov.iter_mut().flatten().for_each(|c| *c /= dof as f64);

        let inverse = invert(&cov).ok_or_else(|| SoccerError::ModelFit {
            model: ModelKind::Lda.name().to_string(),
            message: "pooled covariance matrix is singular".to_string(),
        })?;

        let discriminants = means
            .iter()
            .zip(&counts)
            .map(|(mean, &count)| {
                if count == 0 {
                    return None;
                }
                let weights: Vec<f64> = inverse
                    .iter()
                    .map(|inv_row| inv_row.iter().zip(mean).map(|(a, b)| a * b).sum())
                    .collect();
                let quad: f64 = mean.iter().zip(&weights).map(|(m, w)| m * w).sum();
                let prior = count as f64 / n as f64;
                Some(Discriminant {
                    weights,
                    constant: -0.5 * quad + prior.ln(),
                })
            })
            .collect();

        log::info!("Fitted LDA on {} rows, {} features, class counts {:?}", n, dim, counts);
        Ok(Lda { discriminants })
    }

    fn predict(&self, row: &[f64]) -> usize {
        argmax(&self.scores(row))
    }
}

/// Gauss-Jordan inverse with partial pivoting; `None` when singular
pub fn invert(matrix: &[Vec<f64>]) -> Option<Vec<Vec<f64>>> {
    let n = matrix.len();
    let mut a: Vec<Vec<f64>> = matrix.to_vec();
    let mut inv: Vec<Vec<f64>> = (0..n)
        .map(|i| (0..n).map(|j| if i == j { 1.0 } else { 0.0 }).collect())
        .collect();

    for col in 0..n {
        let pivot_row = (col..n).max_by(|&r1, &r2| a[r1][col].abs().total_cmp(&a[r2][col].abs()))?;
        if a[pivot_row][col].abs() < SINGULAR_PIVOT_EPS {
            return None;
        }
        a.swap(col, pivot_row);
        inv.swap(col, pivot_row);

        let pivot = a[col][col];
        for j in 0..n {
            a[col][j] /= pivot;
            inv[col][j] /= pivot;
        }

        for row in 0..n {
            if row == col {
                continue;
            }
            let factor = a[row][col];
            if factor == 0.0 {
                continue;
            }
            for j in 0..n {
                a[row][j] -= factor * a[col][j];
                inv[row][j] -= factor * inv[col][j];
            }
        }
    }
    Some(inv)
}
