//! Error types for TSVM model selection

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TsvmError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("Fit failed on {location}: {reason}")]
    FitFailure { location: String, reason: String },

    #[error("Unsupported evaluation method: {0}")]
    UnsupportedMethod(String),

    #[error("Optimization did not converge: {0}")]
    ConvergenceError(String),

    #[error("Numerical error: {0}")]
    NumericalError(String),

    #[error("Model not trained")]
    ModelNotTrained,

    #[error("Invalid dataset: {0}")]
    InvalidDataset(String),

    #[error("Invalid label: expected -1 or +1, got {0}")]
    InvalidLabel(f64),

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Empty dataset")]
    EmptyDataset,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

pub type Result<T> = std::result::Result<T, TsvmError>;
