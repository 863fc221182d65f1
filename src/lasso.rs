use anyhow::{Result, anyhow};

use crate::regression::{dot, r_squared};

const N_ALPHAS: usize = 100;
const ALPHA_GRID_EPS: f64 = 1e-3;
const MAX_ITERS: usize = 1000;
const CONVERGENCE_TOL: f64 = 1e-8;

#[derive(Debug, Clone)]
pub struct LassoFit {
    /// Selected regularization strength.
    pub alpha: f64,
    /// Mean of the raw target; predictions are intercept + z . coeffs.
    pub intercept: f64,
    /// Coefficients on the standardized-predictor scale.
    pub coeffs: Vec<f64>,
    pub r_squared: f64,
    pub feature_means: Vec<f64>,
    pub feature_stds: Vec<f64>,
    pub cv_folds: usize,
    pub samples: usize,
}

impl LassoFit {
    pub fn predict(&self, row: &[f64]) -> f64 {
        let z: Vec<f64> = row
            .iter()
            .zip(self.feature_means.iter().zip(&self.feature_stds))
            .map(|(x, (mean, std))| (x - mean) / std.max(1e-9))
            .collect();
        self.intercept + dot(&self.coeffs, &z)
    }
}

/// L1-regularized least squares: predictors standardized once over the
/// full corpus, target centred, coordinate descent per alpha, and the
/// strength chosen by contiguous K-fold cross-validation (lowest mean
/// held-out squared error, largest alpha on ties).
pub fn fit_lasso_cv(rows: &[Vec<f64>], targets: &[f64], folds: usize) -> Result<LassoFit> {
    let n = rows.len();
    if n == 0 || n != targets.len() {
        return Err(anyhow!(
            "mismatched lasso input: {} rows, {} targets",
            n,
            targets.len()
        ));
    }
    let k = rows[0].len();
    if k == 0 || rows.iter().any(|row| row.len() != k) {
        return Err(anyhow!("lasso rows must share a nonzero width"));
    }
    if folds < 2 || n < folds {
        return Err(anyhow!("need at least {folds} samples for {folds}-fold cv"));
    }

    let (feature_means, feature_stds) = feature_norm_stats(rows);
    let z: Vec<Vec<f64>> = rows
        .iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .map(|(j, x)| (x - feature_means[j]) / feature_stds[j].max(1e-9))
                .collect()
        })
        .collect();
    let y_mean = targets.iter().sum::<f64>() / n as f64;
    let yc: Vec<f64> = targets.iter().map(|y| y - y_mean).collect();

    let grid = alpha_grid(&z, &yc);
    let mut best_alpha = grid[0];
    let mut best_mse = f64::INFINITY;
    for &alpha in &grid {
        let mse = cross_validated_mse(&z, &yc, alpha, folds);
        if mse < best_mse {
            best_mse = mse;
            best_alpha = alpha;
        }
    }

    let coeffs = coordinate_descent(&z, &yc, best_alpha);
    let predictions: Vec<f64> = z.iter().map(|row| y_mean + dot(&coeffs, row)).collect();

    Ok(LassoFit {
        alpha: best_alpha,
        intercept: y_mean,
        coeffs,
        r_squared: r_squared(&predictions, targets),
        feature_means,
        feature_stds,
        cv_folds: folds,
        samples: n,
    })
}

fn feature_norm_stats(rows: &[Vec<f64>]) -> (Vec<f64>, Vec<f64>) {
    let n = rows.len() as f64;
    let k = rows[0].len();
    let mut means = vec![0.0f64; k];
    for row in rows {
        for (j, x) in row.iter().enumerate() {
            means[j] += x;
        }
    }
    for mean in &mut means {
        *mean /= n;
    }

    let mut stds = vec![0.0f64; k];
    for row in rows {
        for (j, x) in row.iter().enumerate() {
            let d = x - means[j];
            stds[j] += d * d;
        }
    }
    for std in &mut stds {
        *std = (*std / n).sqrt().max(1e-9);
    }
    (means, stds)
}

// Descending grid from the smallest alpha that zeroes every coefficient.
fn alpha_grid(z: &[Vec<f64>], yc: &[f64]) -> Vec<f64> {
    let n = z.len() as f64;
    let k = z[0].len();
    let mut alpha_max = 0.0f64;
    for j in 0..k {
        let corr: f64 = z.iter().zip(yc).map(|(row, y)| row[j] * y).sum();
        alpha_max = alpha_max.max((corr / n).abs());
    }
    if alpha_max <= 0.0 {
        return vec![0.0];
    }

    (0..N_ALPHAS)
        .map(|step| {
            let t = step as f64 / (N_ALPHAS - 1) as f64;
            alpha_max * ALPHA_GRID_EPS.powf(t)
        })
        .collect()
}

fn cross_validated_mse(z: &[Vec<f64>], yc: &[f64], alpha: f64, folds: usize) -> f64 {
    let n = z.len();
    let mut total = 0.0f64;
    let mut held_out = 0usize;

    for fold in 0..folds {
        let start = fold * n / folds;
        let end = (fold + 1) * n / folds;
        if start == end {
            continue;
        }

        let mut train_z = Vec::with_capacity(n - (end - start));
        let mut train_y = Vec::with_capacity(n - (end - start));
        for idx in 0..n {
            if idx < start || idx >= end {
                train_z.push(z[idx].clone());
                train_y.push(yc[idx]);
            }
        }

        let coeffs = coordinate_descent(&train_z, &train_y, alpha);
        for idx in start..end {
            let err = yc[idx] - dot(&coeffs, &z[idx]);
            total += err * err;
            held_out += 1;
        }
    }

    total / held_out.max(1) as f64
}

// Minimizes (1/2n)||y - Zb||^2 + alpha*||b||_1 by cyclic soft-threshold
// updates on the residual.
fn coordinate_descent(z: &[Vec<f64>], yc: &[f64], alpha: f64) -> Vec<f64> {
    let n = z.len();
    let k = z[0].len();
    let inv_n = 1.0 / n as f64;

    let mut col_norms = vec![0.0f64; k];
    for row in z {
        for (j, x) in row.iter().enumerate() {
            col_norms[j] += x * x;
        }
    }
    for norm in &mut col_norms {
        *norm *= inv_n;
    }

    let mut coeffs = vec![0.0f64; k];
    let mut residual = yc.to_vec();

    for _ in 0..MAX_ITERS {
        let mut max_delta = 0.0f64;
        for j in 0..k {
            if col_norms[j] <= 1e-12 {
                continue;
            }
            let rho: f64 = z
                .iter()
                .zip(&residual)
                .map(|(row, r)| row[j] * (r + row[j] * coeffs[j]))
                .sum::<f64>()
                * inv_n;
            let updated = soft_threshold(rho, alpha) / col_norms[j];
            let delta = updated - coeffs[j];
            if delta != 0.0 {
                for (row, r) in z.iter().zip(residual.iter_mut()) {
                    *r -= delta * row[j];
                }
                coeffs[j] = updated;
            }
            max_delta = max_delta.max(delta.abs());
        }
        if max_delta < CONVERGENCE_TOL {
            break;
        }
    }

    coeffs
}

fn soft_threshold(value: f64, gamma: f64) -> f64 {
    if value > gamma {
        value - gamma
    } else if value < -gamma {
        value + gamma
    } else {
        0.0
    }
}
