//! Solvers for the TSVM hyperplane problems
//!
//! Each TSVM hyperplane is the solution of a box-constrained quadratic dual
//! built from regularized normal matrices. This module provides the dense
//! Cholesky routines used to form the dual and the clipping dual coordinate
//! descent (ClipDCD) algorithm that solves it.

pub mod cholesky;
pub mod clipdcd;

pub use self::cholesky::*;
pub use self::clipdcd::*;
