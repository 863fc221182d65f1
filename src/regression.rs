use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};

const PIVOT_EPS: f64 = 1e-12;

#[derive(Debug, Clone)]
pub struct OlsFit {
    pub intercept: f64,
    pub coeffs: Vec<f64>,
    pub r_squared: f64,
    pub adj_r_squared: f64,
    pub samples: usize,
}

/// Ordinary least squares via the normal equations. `rows` is one
/// predictor vector per sample; the intercept column is added here.
pub fn fit_ols(rows: &[Vec<f64>], targets: &[f64]) -> Result<OlsFit> {
    let n = rows.len();
    if n == 0 || n != targets.len() {
        return Err(anyhow!(
            "mismatched regression input: {} rows, {} targets",
            n,
            targets.len()
        ));
    }
    let k = rows[0].len();
    if k == 0 || rows.iter().any(|row| row.len() != k) {
        return Err(anyhow!("regression rows must share a nonzero width"));
    }
    if n <= k + 1 {
        return Err(anyhow!(
            "underdetermined fit: {} samples for {} parameters",
            n,
            k + 1
        ));
    }

    // Normal equations over [1, x_1..x_k].
    let p = k + 1;
    let mut xtx = vec![vec![0.0f64; p]; p];
    let mut xty = vec![0.0f64; p];
    for (row, y) in rows.iter().zip(targets) {
        let mut design = Vec::with_capacity(p);
        design.push(1.0);
        design.extend_from_slice(row);
        for a in 0..p {
            xty[a] += design[a] * y;
            for b in 0..p {
                xtx[a][b] += design[a] * design[b];
            }
        }
    }

    let beta = solve_linear_system(xtx, xty)?;
    let intercept = beta[0];
    let coeffs = beta[1..].to_vec();

    let predictions: Vec<f64> = rows
        .iter()
        .map(|row| intercept + dot(&coeffs, row))
        .collect();
    let r_squared = r_squared(&predictions, targets);
    let adj_r_squared =
        1.0 - (1.0 - r_squared) * (n as f64 - 1.0) / (n as f64 - k as f64 - 1.0);

    Ok(OlsFit {
        intercept,
        coeffs,
        r_squared,
        adj_r_squared,
        samples: n,
    })
}

pub fn r_squared(predictions: &[f64], targets: &[f64]) -> f64 {
    if predictions.is_empty() || predictions.len() != targets.len() {
        return 0.0;
    }
    let n = targets.len() as f64;
    let mean = targets.iter().sum::<f64>() / n;
    let ss_tot: f64 = targets.iter().map(|y| (y - mean).powi(2)).sum();
    let ss_res: f64 = predictions
        .iter()
        .zip(targets)
        .map(|(p, y)| (y - p).powi(2))
        .sum();
    1.0 - ss_res / ss_tot.max(PIVOT_EPS)
}

pub fn dot(coeffs: &[f64], row: &[f64]) -> f64 {
    coeffs.iter().zip(row).map(|(c, x)| c * x).sum()
}

fn solve_linear_system(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Result<Vec<f64>> {
    let n = b.len();
    for col in 0..n {
        let mut pivot_row = col;
        for row in col + 1..n {
            if a[row][col].abs() > a[pivot_row][col].abs() {
                pivot_row = row;
            }
        }
        if a[pivot_row][col].abs() < PIVOT_EPS {
            return Err(anyhow!("singular normal equations (collinear predictors)"));
        }
        a.swap(col, pivot_row);
        b.swap(col, pivot_row);

        for row in col + 1..n {
            let factor = a[row][col] / a[col][col];
            if factor == 0.0 {
                continue;
            }
            for idx in col..n {
                a[row][idx] -= factor * a[col][idx];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = vec![0.0f64; n];
    for col in (0..n).rev() {
        let mut sum = b[col];
        for idx in col + 1..n {
            sum -= a[col][idx] * x[idx];
        }
        x[col] = sum / a[col][col];
    }
    Ok(x)
}

/// Persisted record of a fitted scoring model, written by both fit
/// binaries. `alpha` is present only for the regularized variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringModelArtifact {
    pub version: u32,
    pub generated_at: String,
    pub matrix_dir: String,
    pub target: String,
    pub feature_names: Vec<String>,
    pub intercept: f64,
    pub coeffs: Vec<f64>,
    pub r_squared: f64,
    #[serde(default)]
    pub alpha: Option<f64>,
    pub samples: usize,
    #[serde(default)]
    pub skipped_matches: usize,
}
