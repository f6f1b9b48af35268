//! Utility functions for preparing datasets

use crate::core::Matrix;

/// Feature scaling utilities
pub mod scaling {
    use super::*;
    use serde::{Deserialize, Serialize};

    /// Feature scaling methods
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub enum ScalingMethod {
        /// Min-Max scaling to [min_val, max_val] range
        MinMax { min_val: f64, max_val: f64 },
        /// Standard (Z-score) normalization: (x - mean) / std
        StandardScore,
        /// Unit scaling: x / max(|x|)
        UnitScale,
    }

    impl Default for ScalingMethod {
        fn default() -> Self {
            Self::MinMax {
                min_val: -1.0,
                max_val: 1.0,
            }
        }
    }

    /// Feature scaling statistics for a dataset
    #[derive(Debug, Clone)]
    pub struct ScalingParams {
        pub method: ScalingMethod,
        pub feature_stats: Vec<FeatureStats>,
    }

    /// Statistics for a single feature column
    #[derive(Debug, Clone, Default)]
    pub struct FeatureStats {
        pub min: f64,
        pub max: f64,
        pub mean: f64,
        pub std: f64,
    }

    impl ScalingParams {
        /// Compute per-column scaling parameters from training data
        pub fn fit(x: &Matrix, method: ScalingMethod) -> Self {
            let n = x.nrows();
            let feature_stats = (0..x.ncols())
                .map(|j| {
                    if n == 0 {
                        return FeatureStats::default();
                    }
                    let column: Vec<f64> = x.rows().map(|row| row[j]).collect();
                    let min = column.iter().copied().fold(f64::INFINITY, f64::min);
                    let max = column.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                    let mean = column.iter().sum::<f64>() / n as f64;

                    let variance = if n > 1 {
                        column.iter().map(|&v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64
                    } else {
                        0.0
                    };

                    FeatureStats {
                        min,
                        max,
                        mean,
                        std: variance.sqrt(),
                    }
                })
                .collect();

            Self {
                method,
                feature_stats,
            }
        }

        /// Transform a matrix using the fitted parameters
        ///
        /// Columns beyond those seen during `fit` are kept unchanged.
        pub fn transform(&self, x: &Matrix) -> Matrix {
            let mut scaled = x.clone();
            for i in 0..scaled.nrows() {
                for (j, value) in scaled.row_mut(i).iter_mut().enumerate() {
                    if let Some(stats) = self.feature_stats.get(j) {
                        *value = self.scale_value(*value, stats);
                    }
                }
            }
            scaled
        }

        /// Scale a single value using the appropriate method
        fn scale_value(&self, value: f64, stats: &FeatureStats) -> f64 {
            match self.method {
                ScalingMethod::MinMax { min_val, max_val } => {
                    if (stats.max - stats.min).abs() < 1e-12 {
                        // Constant feature
                        (min_val + max_val) / 2.0
                    } else {
                        let normalized = (value - stats.min) / (stats.max - stats.min);
                        min_val + normalized * (max_val - min_val)
                    }
                }
                ScalingMethod::StandardScore => {
                    if stats.std < 1e-12 {
                        0.0
                    } else {
                        (value - stats.mean) / stats.std
                    }
                }
                ScalingMethod::UnitScale => {
                    let max_abs = stats.max.abs().max(stats.min.abs());
                    if max_abs < 1e-12 {
                        0.0
                    } else {
                        value / max_abs
                    }
                }
            }
        }
    }

    /// Convenience function: fit and transform in one step
    pub fn fit_transform(x: &Matrix, method: ScalingMethod) -> (Matrix, ScalingParams) {
        let params = ScalingParams::fit(x, method);
        let transformed = params.transform(x);
        (transformed, params)
    }
}

/// Label validation utilities
pub mod validation {
    use crate::core::{Result, TsvmError};

    /// Validate that all labels are binary (-1 or +1)
    pub fn validate_binary_labels(labels: &[f64]) -> Result<()> {
        match labels.iter().find(|&&l| l != 1.0 && l != -1.0) {
            Some(&label) => Err(TsvmError::InvalidLabel(label)),
            None => Ok(()),
        }
    }

    /// Distinct labels in ascending order
    pub fn class_labels(labels: &[f64]) -> Vec<f64> {
        let mut classes = labels.to_vec();
        classes.sort_by(|a, b| a.total_cmp(b));
        classes.dedup();
        classes
    }

    /// Count of positive and negative labels and their ratio
    pub fn check_label_balance(labels: &[f64]) -> (usize, usize, f64) {
        let positive_count = labels.iter().filter(|&&l| l > 0.0).count();
        let negative_count = labels.len() - positive_count;
        let balance_ratio = if negative_count == 0 {
            f64::INFINITY
        } else {
            positive_count as f64 / negative_count as f64
        };
        (positive_count, negative_count, balance_ratio)
    }
}
