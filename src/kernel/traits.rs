//! Kernel trait definition

use crate::core::{Result, TsvmError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kernel function trait
///
/// A kernel function K(x, y) must satisfy Mercer's condition.
/// Inputs are dense feature rows of equal length.
pub trait Kernel: Send + Sync {
    /// Compute kernel value K(x, y)
    fn compute(&self, x: &[f64], y: &[f64]) -> f64;
}

/// Kernel families that the search space and the estimators understand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KernelType {
    /// Linear kernel, no width parameter
    Linear,
    /// Gaussian RBF kernel, swept over gamma
    Rbf,
}

impl KernelType {
    /// Name used in result identifiers
    pub fn name(&self) -> &'static str {
        match self {
            KernelType::Linear => "linear",
            KernelType::Rbf => "RBF",
        }
    }

    /// Whether points for this kernel carry a gamma value
    pub fn has_width_parameter(&self) -> bool {
        matches!(self, KernelType::Rbf)
    }
}

impl fmt::Display for KernelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for KernelType {
    type Err = TsvmError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "linear" => Ok(KernelType::Linear),
            "rbf" => Ok(KernelType::Rbf),
            other => Err(TsvmError::InvalidParameter(format!(
                "Unknown kernel: {other}. Use 'linear' or 'rbf'"
            ))),
        }
    }
}
