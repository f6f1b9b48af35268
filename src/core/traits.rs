//! Core traits for TSVM estimators and datasets

use crate::core::{HyperParams, Matrix, Result};

/// Dataset abstraction: a dense feature matrix with aligned labels
pub trait Dataset {
    /// Feature matrix, one row per sample
    fn features(&self) -> &Matrix;

    /// Labels aligned with the rows of `features()`
    fn labels(&self) -> &[f64];

    /// Short name used in result identifiers
    fn name(&self) -> &str;

    /// Number of samples in the dataset
    fn len(&self) -> usize {
        self.labels().len()
    }

    /// Number of features (dimensionality)
    fn dim(&self) -> usize {
        self.features().ncols()
    }

    /// Check if the dataset is empty
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A classifier that can be fitted with a hyperparameter point
///
/// `fit` mutates the estimator in place, so concurrent folds must each own
/// a separate instance.
pub trait Estimator {
    /// Fit the model on `x`/`y` using the given hyperparameters
    ///
    /// # Errors
    /// Returns an error on degenerate training data or when the
    /// optimizer fails, never a model producing NaN predictions.
    fn fit(&mut self, x: &Matrix, y: &[f64], params: &HyperParams) -> Result<()>;

    /// Predict one label per row of `x`
    fn predict(&self, x: &Matrix) -> Result<Vec<f64>>;

    /// Short classifier name used in result identifiers (e.g. `TSVM`)
    fn name(&self) -> String;
}

/// Binary (+1/-1) estimator exposing its signed decision value
pub trait BinaryEstimator: Estimator {
    /// Signed score per row; positive values favour the +1 class
    fn decision_function(&self, x: &Matrix) -> Result<Vec<f64>>;
}

/// Marker for estimators that decompose a problem with three or more classes
pub trait MultiClassEstimator: Estimator {}
