//! Binary Twin Support Vector Machine estimator
//!
//! A TSVM fits two non-parallel hyperplanes, each close to one class and
//! at least unit distance (in the soft-margin sense) from the other. A
//! sample is assigned to the class whose hyperplane is nearer.

use crate::core::{
    BinaryEstimator, Estimator, HyperParams, Matrix, Result, SolverConfig, TsvmError,
};
use crate::kernel::linear::dot;
use crate::kernel::{Kernel, KernelType, RBFKernel};
use crate::solver::{gram_with_ridge, Cholesky, ClipDcdSolver};
use crate::utils::validation::validate_binary_labels;
use log::debug;

/// Maps raw samples into the space where the hyperplanes live
#[derive(Debug, Clone)]
enum FeatureMap {
    Linear,
    /// Empirical kernel map against the training samples
    Rbf { kernel: RBFKernel, basis: Matrix },
}

impl FeatureMap {
    /// Map every row of `x` and append the bias column of ones
    fn augment(&self, x: &Matrix) -> Matrix {
        let width = match self {
            FeatureMap::Linear => x.ncols(),
            FeatureMap::Rbf { basis, .. } => basis.nrows(),
        };
        let mut out = Matrix::zeros(x.nrows(), width + 1);

        for (i, sample) in x.rows().enumerate() {
            let row = out.row_mut(i);
            match self {
                FeatureMap::Linear => row[..width].copy_from_slice(sample),
                FeatureMap::Rbf { kernel, basis } => {
                    for (value, center) in row.iter_mut().zip(basis.rows()) {
                        *value = kernel.compute(sample, center);
                    }
                }
            }
            row[width] = 1.0;
        }

        out
    }
}

/// Fitted pair of hyperplanes `w·φ(x) + b = 0`
#[derive(Debug, Clone)]
struct Hyperplanes {
    feature_map: FeatureMap,
    w1: Vec<f64>,
    b1: f64,
    w2: Vec<f64>,
    b2: f64,
}

/// Binary TSVM classifier with a linear or RBF kernel
///
/// Labels must be +1 / -1. The kernel width for RBF is taken from the
/// `gamma` of the hyperparameter point passed to [`Estimator::fit`].
#[derive(Debug, Clone)]
pub struct TwinSvm {
    kernel_type: KernelType,
    config: SolverConfig,
    model: Option<Hyperplanes>,
}

impl TwinSvm {
    /// Create an unfitted TSVM for the given kernel family
    pub fn new(kernel_type: KernelType) -> Self {
        Self {
            kernel_type,
            config: SolverConfig::default(),
            model: None,
        }
    }

    /// Create an unfitted linear TSVM
    pub fn linear() -> Self {
        Self::new(KernelType::Linear)
    }

    /// Create an unfitted RBF TSVM
    pub fn rbf() -> Self {
        Self::new(KernelType::Rbf)
    }

    /// Replace the solver configuration
    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the ClipDCD stopping tolerance
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.config.tolerance = tolerance;
        self
    }

    /// Set the maximum number of ClipDCD iterations per hyperplane
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.config.max_iterations = max_iterations;
        self
    }

    /// Set the ridge term added before inverting the normal matrices
    pub fn with_regularization(mut self, regularization: f64) -> Self {
        self.config.regularization = regularization;
        self
    }

    /// Kernel family of this estimator
    pub fn kernel_type(&self) -> KernelType {
        self.kernel_type
    }

    /// Solver configuration
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Whether `fit` has completed successfully
    pub fn is_fitted(&self) -> bool {
        self.model.is_some()
    }

    /// Solve one hyperplane: stay close to `own`, keep `other` at distance.
    ///
    /// Returns `sign · (ownᵀown + εI)⁻¹ otherᵀ α` where α solves the dual
    /// with `Q = other (ownᵀown + εI)⁻¹ otherᵀ` and bound `c`.
    fn solve_plane(&self, own: &Matrix, other: &Matrix, c: f64, sign: f64) -> Result<Vec<f64>> {
        let p = own.ncols();
        let normal = gram_with_ridge(own, self.config.regularization);
        let factor = Cholesky::factor(&normal, p)?;

        let solved: Vec<Vec<f64>> = other.rows().map(|row| factor.solve(row)).collect();

        let m = other.nrows();
        let mut q = vec![0.0; m * m];
        for i in 0..m {
            for j in i..m {
                let value = dot(other.row(i), &solved[j]);
                q[i * m + j] = value;
                q[j * m + i] = value;
            }
        }

        let dual = ClipDcdSolver::new(&self.config).solve(&q, m, c)?;
        debug!(
            "Hyperplane dual solved in {} iterations ({} constraints)",
            dual.iterations, m
        );

        let mut z = vec![0.0; p];
        for (alpha, column) in dual.alpha.iter().zip(&solved) {
            if *alpha == 0.0 {
                continue;
            }
            for (zk, ck) in z.iter_mut().zip(column) {
                *zk += sign * alpha * ck;
            }
        }

        if z.iter().any(|v| !v.is_finite()) {
            return Err(TsvmError::NumericalError(
                "hyperplane coefficients are not finite".to_string(),
            ));
        }

        Ok(z)
    }

    /// Absolute distances of every row to both hyperplanes
    fn distances(&self, x: &Matrix) -> Result<Vec<(f64, f64)>> {
        let model = self.model.as_ref().ok_or(TsvmError::ModelNotTrained)?;

        let expected = match &model.feature_map {
            FeatureMap::Linear => model.w1.len(),
            FeatureMap::Rbf { basis, .. } => basis.ncols(),
        };
        if x.ncols() != expected {
            return Err(TsvmError::DimensionMismatch {
                expected,
                actual: x.ncols(),
            });
        }

        let augmented = model.feature_map.augment(x);
        let width = model.w1.len();

        augmented
            .rows()
            .map(|row| {
                let d1 = (dot(&row[..width], &model.w1) + model.b1).abs();
                let d2 = (dot(&row[..width], &model.w2) + model.b2).abs();
                if d1.is_finite() && d2.is_finite() {
                    Ok((d1, d2))
                } else {
                    Err(TsvmError::NumericalError(
                        "non-finite distance to hyperplane".to_string(),
                    ))
                }
            })
            .collect()
    }
}

impl Default for TwinSvm {
    fn default() -> Self {
        Self::linear()
    }
}

impl Estimator for TwinSvm {
    fn fit(&mut self, x: &Matrix, y: &[f64], params: &HyperParams) -> Result<()> {
        if x.nrows() != y.len() {
            return Err(TsvmError::ShapeMismatch(format!(
                "{} samples but {} labels",
                x.nrows(),
                y.len()
            )));
        }
        validate_binary_labels(y)?;
        for (name, value) in [("C1", params.c1), ("C2", params.c2)] {
            if !(value > 0.0 && value.is_finite()) {
                return Err(TsvmError::InvalidParameter(format!(
                    "{name} must be positive, got: {value}"
                )));
            }
        }

        let positive: Vec<usize> = (0..y.len()).filter(|&i| y[i] == 1.0).collect();
        let negative: Vec<usize> = (0..y.len()).filter(|&i| y[i] == -1.0).collect();
        if positive.is_empty() || negative.is_empty() {
            return Err(TsvmError::InvalidDataset(format!(
                "training data needs both classes, got {} positive and {} negative samples",
                positive.len(),
                negative.len()
            )));
        }

        let feature_map = match self.kernel_type {
            KernelType::Linear => FeatureMap::Linear,
            KernelType::Rbf => {
                let gamma = params.gamma.ok_or_else(|| {
                    TsvmError::InvalidParameter("RBF kernel requires gamma".to_string())
                })?;
                let order: Vec<usize> = positive.iter().chain(&negative).copied().collect();
                FeatureMap::Rbf {
                    kernel: RBFKernel::new(gamma)?,
                    basis: x.select_rows(&order),
                }
            }
        };

        let h = feature_map.augment(&x.select_rows(&positive));
        let g = feature_map.augment(&x.select_rows(&negative));

        let mut z1 = self.solve_plane(&h, &g, params.c1, -1.0)?;
        let mut z2 = self.solve_plane(&g, &h, params.c2, 1.0)?;

        let b1 = z1.pop().unwrap_or(0.0);
        let b2 = z2.pop().unwrap_or(0.0);

        debug!(
            "Fitted {} TSVM on {} samples ({params})",
            self.kernel_type,
            y.len()
        );

        self.model = Some(Hyperplanes {
            feature_map,
            w1: z1,
            b1,
            w2: z2,
            b2,
        });
        Ok(())
    }

    fn predict(&self, x: &Matrix) -> Result<Vec<f64>> {
        Ok(self
            .decision_function(x)?
            .into_iter()
            .map(|value| if value >= 0.0 { 1.0 } else { -1.0 })
            .collect())
    }

    fn name(&self) -> String {
        "TSVM".to_string()
    }
}

impl BinaryEstimator for TwinSvm {
    /// Distance to the negative-class plane minus distance to the positive-class plane
    fn decision_function(&self, x: &Matrix) -> Result<Vec<f64>> {
        Ok(self
            .distances(x)?
            .into_iter()
            .map(|(d1, d2)| d2 - d1)
            .collect())
    }
}
