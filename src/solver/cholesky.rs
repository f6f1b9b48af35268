//! Dense Cholesky factorization for the regularized normal matrices

use crate::core::{Matrix, Result, TsvmError};

/// Lower-triangular factor L of a symmetric positive definite matrix A = L Lᵀ
#[derive(Debug, Clone)]
pub struct Cholesky {
    n: usize,
    lower: Vec<f64>,
}

impl Cholesky {
    /// Factor an `n x n` row-major symmetric positive definite matrix
    pub fn factor(a: &[f64], n: usize) -> Result<Self> {
        if a.len() != n * n {
            return Err(TsvmError::DimensionMismatch {
                expected: n * n,
                actual: a.len(),
            });
        }

        let mut lower = vec![0.0; n * n];

        for j in 0..n {
            let mut diag = a[j * n + j];
            for k in 0..j {
                diag -= lower[j * n + k] * lower[j * n + k];
            }
            if !(diag > 0.0 && diag.is_finite()) {
                return Err(TsvmError::NumericalError(format!(
                    "matrix is not positive definite (pivot {j} = {diag})"
                )));
            }
            let pivot = diag.sqrt();
            lower[j * n + j] = pivot;

            for i in (j + 1)..n {
                let mut sum = a[i * n + j];
                for k in 0..j {
                    sum -= lower[i * n + k] * lower[j * n + k];
                }
                lower[i * n + j] = sum / pivot;
            }
        }

        Ok(Self { n, lower })
    }

    /// Solve A x = b using the stored factor
    pub fn solve(&self, b: &[f64]) -> Vec<f64> {
        let n = self.n;

        // L y = b
        let mut y = vec![0.0; n];
        for i in 0..n {
            let mut sum = b[i];
            for k in 0..i {
                sum -= self.lower[i * n + k] * y[k];
            }
            y[i] = sum / self.lower[i * n + i];
        }

        // Lᵀ x = y
        let mut x = vec![0.0; n];
        for i in (0..n).rev() {
            let mut sum = y[i];
            for k in (i + 1)..n {
                sum -= self.lower[k * n + i] * x[k];
            }
            x[i] = sum / self.lower[i * n + i];
        }

        x
    }
}

/// Compute MᵀM + ridge·I as a row-major `cols x cols` buffer
pub fn gram_with_ridge(m: &Matrix, ridge: f64) -> Vec<f64> {
    let p = m.ncols();
    let mut gram = vec![0.0; p * p];

    for row in m.rows() {
        for i in 0..p {
            let ri = row[i];
            if ri == 0.0 {
                continue;
            }
            for j in i..p {
                gram[i * p + j] += ri * row[j];
            }
        }
    }

    for i in 0..p {
        gram[i * p + i] += ridge;
        for j in (i + 1)..p {
            gram[j * p + i] = gram[i * p + j];
        }
    }

    gram
}
