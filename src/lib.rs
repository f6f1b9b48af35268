//! Twin Support Vector Machine model selection and validation
//!
//! Generates hyperparameter search spaces, validates binary and multi-class
//! TSVM estimators by cross-validation or train/test split, and names the
//! results reproducibly.
//!
//! Based on "Twin Support Vector Machines for Pattern Classification" by
//! Jayadeva, R. Khemchandani and S. Chandra

pub mod core;
pub mod data;
pub mod estimator;
pub mod kernel;
pub mod metrics;
pub mod persistence;
pub mod selection;
pub mod solver;
pub mod utils;

// Re-export main types for convenience
pub use crate::core::error::{Result, TsvmError};
pub use crate::core::traits::*;
pub use crate::core::types::*;
pub use crate::data::{CSVDataset, LibSVMDataset};
pub use crate::estimator::{OneVsAll, OneVsOne, TwinSvm};
pub use crate::kernel::{Kernel, KernelType, RBFKernel};
pub use crate::metrics::{BinaryMetrics, ConfusionCounts, MetricsReport, MultiClassMetrics};
pub use crate::persistence::ResultsFile;
pub use crate::selection::{
    EvaluationMethod, ExponentRange, FailurePolicy, GridSearch, SearchReport, SearchSpace,
    SearchStrategy, ValidationResult, ValidationStrategy, Validator,
};

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
