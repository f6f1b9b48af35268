//! Clipping dual coordinate descent (ClipDCD) solver
//!
//! Solves the box-constrained dual problem of one TSVM hyperplane:
//!
//! ```text
//! min  ½ αᵀQα − eᵀα    s.t.  0 ≤ α ≤ C
//! ```
//!
//! Each iteration picks the coordinate whose clipped Newton step promises
//! the largest decrease of the objective, `gᵢ² / Qᵢᵢ` with `g = e − Qα`,
//! among the coordinates that can still move.
//!
//! Peng, X., Chen, D., & Kong, L. (2014). A clipping dual coordinate descent
//! algorithm for solving support vector machines. Knowledge-Based Systems, 71.

use crate::core::{Result, SolverConfig, TsvmError};
use log::trace;

/// Solution of the dual problem
#[derive(Debug, Clone)]
pub struct DualSolution {
    /// Lagrange multipliers, one per constraint row
    pub alpha: Vec<f64>,
    /// Number of coordinate updates performed
    pub iterations: usize,
}

/// ClipDCD solver for the TSVM dual
#[derive(Debug, Clone)]
pub struct ClipDcdSolver {
    tolerance: f64,
    max_iterations: usize,
}

impl ClipDcdSolver {
    /// Create a solver from the shared solver configuration
    pub fn new(config: &SolverConfig) -> Self {
        Self {
            tolerance: config.tolerance,
            max_iterations: config.max_iterations,
        }
    }

    /// Solve the dual for an `n x n` row-major matrix `q` and upper bound `upper`
    pub fn solve(&self, q: &[f64], n: usize, upper: f64) -> Result<DualSolution> {
        if q.len() != n * n {
            return Err(TsvmError::DimensionMismatch {
                expected: n * n,
                actual: q.len(),
            });
        }
        if !(upper > 0.0 && upper.is_finite()) {
            return Err(TsvmError::InvalidParameter(format!(
                "Upper bound must be positive, got: {upper}"
            )));
        }

        let diag: Vec<f64> = (0..n).map(|i| q[i * n + i]).collect();
        if let Some(i) = diag.iter().position(|&d| !(d > 0.0 && d.is_finite())) {
            return Err(TsvmError::NumericalError(format!(
                "dual matrix has a non-positive diagonal entry at {i}: {}",
                diag[i]
            )));
        }

        let mut alpha = vec![0.0; n];
        // Gradient of the maximization form: g = e − Qα
        let mut grad = vec![1.0; n];

        for iteration in 0..self.max_iterations {
            let mut best: Option<(usize, f64)> = None;

            for i in 0..n {
                let movable = (alpha[i] < upper && grad[i] > 0.0) || (alpha[i] > 0.0 && grad[i] < 0.0);
                if !movable {
                    continue;
                }
                let score = grad[i] * grad[i] / diag[i];
                if best.map_or(true, |(_, s)| score > s) {
                    best = Some((i, score));
                }
            }

            let (i, score) = match best {
                Some(found) if found.1 >= self.tolerance => found,
                _ => {
                    trace!("ClipDCD converged after {iteration} iterations");
                    return Ok(DualSolution {
                        alpha,
                        iterations: iteration,
                    });
                }
            };

            let updated = (alpha[i] + grad[i] / diag[i]).clamp(0.0, upper);
            let delta = updated - alpha[i];
            if !delta.is_finite() {
                return Err(TsvmError::NumericalError(format!(
                    "non-finite step at coordinate {i} (score {score})"
                )));
            }
            alpha[i] = updated;

            for (k, g) in grad.iter_mut().enumerate() {
                *g -= delta * q[k * n + i];
            }
        }

        Err(TsvmError::ConvergenceError(format!(
            "ClipDCD reached {} iterations without meeting tolerance {}",
            self.max_iterations, self.tolerance
        )))
    }
}
