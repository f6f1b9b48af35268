//! Core type definitions for TSVM model selection

use crate::core::{Result, TsvmError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Dense row-major feature matrix (rows = samples, columns = features)
#[derive(Clone, Debug, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Create a matrix filled with zeros
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Create a matrix from a flat row-major buffer
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(TsvmError::DimensionMismatch {
                expected: rows * cols,
                actual: data.len(),
            });
        }
        Ok(Self { rows, cols, data })
    }

    /// Create a matrix from a list of rows; every row must have the same length
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let cols = rows.first().map(|r| r.len()).unwrap_or(0);
        let mut data = Vec::with_capacity(rows.len() * cols);

        for row in &rows {
            if row.len() != cols {
                return Err(TsvmError::DimensionMismatch {
                    expected: cols,
                    actual: row.len(),
                });
            }
            data.extend_from_slice(row);
        }

        Ok(Self {
            rows: rows.len(),
            cols,
            data,
        })
    }

    /// Number of rows (samples)
    pub fn nrows(&self) -> usize {
        self.rows
    }

    /// Number of columns (features)
    pub fn ncols(&self) -> usize {
        self.cols
    }

    /// Check if the matrix has no rows
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Borrow row `i`
    ///
    /// # Panics
    /// Panics if `i >= nrows()`
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    /// Mutably borrow row `i`
    pub fn row_mut(&mut self, i: usize) -> &mut [f64] {
        &mut self.data[i * self.cols..(i + 1) * self.cols]
    }

    /// Element at (`i`, `j`)
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.cols + j]
    }

    /// Set element at (`i`, `j`)
    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        self.data[i * self.cols + j] = value;
    }

    /// Iterate over rows
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        (0..self.rows).map(move |i| self.row(i))
    }

    /// Build a new matrix from the given row indices, in order
    pub fn select_rows(&self, indices: &[usize]) -> Matrix {
        let mut data = Vec::with_capacity(indices.len() * self.cols);
        for &i in indices {
            data.extend_from_slice(self.row(i));
        }
        Matrix {
            rows: indices.len(),
            cols: self.cols,
            data,
        }
    }

    /// Flat row-major view of the data
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }
}

/// One point of the hyperparameter search space
///
/// `gamma` is `None` for kernels without a width parameter (linear).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HyperParams {
    pub c1: f64,
    pub c2: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gamma: Option<f64>,
}

impl HyperParams {
    /// Hyperparameters for a linear kernel
    pub fn new(c1: f64, c2: f64) -> Self {
        Self {
            c1,
            c2,
            gamma: None,
        }
    }

    /// Set the kernel width parameter
    pub fn with_gamma(mut self, gamma: f64) -> Self {
        self.gamma = Some(gamma);
        self
    }
}

impl fmt::Display for HyperParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C1={}, C2={}", self.c1, self.c2)?;
        if let Some(gamma) = self.gamma {
            write!(f, ", gamma={gamma}")?;
        }
        Ok(())
    }
}

/// Configuration for the dual solver of each hyperplane
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Stop once the best coordinate score falls below this value
    pub tolerance: f64,
    /// Maximum number of coordinate updates per hyperplane
    pub max_iterations: usize,
    /// Ridge term added to the normal matrices before inversion
    pub regularization: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-5,
            max_iterations: 15_000,
            regularization: 2f64.powi(-7),
        }
    }
}
