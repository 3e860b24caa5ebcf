//! Least-squares linear regression
//!
//! Fits via the normal equations with a small ridge term for numerical
//! stability. Used by both the maintenance predictor and the price model;
//! outputs are unconstrained regression estimates.

use crate::error::FitError;

/// Ridge term added to the normal-equations diagonal.
const RIDGE: f64 = 1e-8;

#[derive(Debug, Clone)]
pub struct LinearRegressor {
    /// weights[0] is the intercept; weights[1..] align with the features.
    weights: Vec<f64>,
}

impl LinearRegressor {
    pub fn fit(xs: &[Vec<f64>], ys: &[f64]) -> Result<Self, FitError> {
        if xs.is_empty() || xs.len() != ys.len() {
            return Err(FitError::EmptyCorpus);
        }
        let d = xs[0].len() + 1; // bias column

        // Accumulate X^T X and X^T y with an implicit leading 1.
        let mut xtx = vec![vec![0.0; d]; d];
        let mut xty = vec![0.0; d];
        for (x, &y) in xs.iter().zip(ys) {
            if x.len() + 1 != d || x.iter().any(|v| !v.is_finite()) || !y.is_finite() {
                return Err(FitError::NonFinite);
            }
            for i in 0..d {
                let xi = if i == 0 { 1.0 } else { x[i - 1] };
                xty[i] += xi * y;
                for j in 0..d {
                    let xj = if j == 0 { 1.0 } else { x[j - 1] };
                    xtx[i][j] += xi * xj;
                }
            }
        }
        for (i, row) in xtx.iter_mut().enumerate() {
            row[i] += RIDGE;
        }

        let weights = solve(xtx, xty)?;
        Ok(Self { weights })
    }

    pub fn predict(&self, x: &[f64]) -> f64 {
        let mut y = self.weights[0];
        for (w, v) in self.weights[1..].iter().zip(x) {
            y += w * v;
        }
        y
    }
}

/// Gaussian elimination with partial pivoting.
fn solve(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Result<Vec<f64>, FitError> {
    let n = b.len();
    for col in 0..n {
        let pivot = (col..n)
            .max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))
            .unwrap_or(col);
        if a[pivot][col].abs() < 1e-12 {
            return Err(FitError::SingularSystem);
        }
        a.swap(col, pivot);
        b.swap(col, pivot);

        for row in (col + 1)..n {
            let factor = a[row][col] / a[col][col];
            for k in col..n {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let mut acc = b[row];
        for col in (row + 1)..n {
            acc -= a[row][col] * x[col];
        }
        x[row] = acc / a[row][row];
        if !x[row].is_finite() {
            return Err(FitError::SingularSystem);
        }
    }
    Ok(x)
}
