//! Kernel functions for TSVM

pub mod linear;
pub mod rbf;
pub mod traits;

pub use self::rbf::*;
pub use self::traits::*;
