//! Hyperparameter search space generation
//!
//! Every parameter is swept over an inclusive range of base-2 exponents.
//! Points are ordered with C1 outermost, then C2, then gamma innermost.

use crate::core::{HyperParams, Result, TsvmError};
use crate::kernel::KernelType;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How points are drawn from the exponent ranges
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchStrategy {
    /// Every combination of every range
    #[default]
    FullGrid,
}

/// Smallest exponent whose power of two is a normal, non-zero `f64`
pub const MIN_EXPONENT: i32 = f64::MIN_EXP - 1;

/// Largest exponent whose power of two is finite
pub const MAX_EXPONENT: i32 = f64::MAX_EXP - 1;

/// Inclusive range of base-2 exponents, e.g. `-8:2`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExponentRange {
    pub low: i32,
    pub high: i32,
}

impl ExponentRange {
    pub fn new(low: i32, high: i32) -> Self {
        Self { low, high }
    }

    /// Range holding the single exponent `e`
    pub fn single(e: i32) -> Self {
        Self { low: e, high: e }
    }

    /// Fails with `InvalidRange` when `low > high` or when an exponent is
    /// outside [`MIN_EXPONENT`, `MAX_EXPONENT`]
    pub fn validate(&self, parameter: &str) -> Result<()> {
        if self.low > self.high {
            return Err(TsvmError::InvalidRange(format!(
                "{parameter} exponent range has low {} > high {}",
                self.low, self.high
            )));
        }
        if self.low < MIN_EXPONENT || self.high > MAX_EXPONENT {
            return Err(TsvmError::InvalidRange(format!(
                "{parameter} exponent range {}:{} exceeds {MIN_EXPONENT}:{MAX_EXPONENT}",
                self.low, self.high
            )));
        }
        Ok(())
    }

    /// Number of exponents in the range
    pub fn len(&self) -> usize {
        if self.low > self.high {
            0
        } else {
            (i64::from(self.high) - i64::from(self.low) + 1) as usize
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `2^e` for every exponent from low to high
    pub fn values(&self) -> Vec<f64> {
        (self.low..=self.high).map(|e| 2f64.powi(e)).collect()
    }
}

impl fmt::Display for ExponentRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.low, self.high)
    }
}

impl FromStr for ExponentRange {
    type Err = TsvmError;

    fn from_str(s: &str) -> Result<Self> {
        let parse = |part: &str| {
            part.trim().parse::<i32>().map_err(|_| {
                TsvmError::ParseError(format!("Invalid exponent '{part}' in range '{s}'"))
            })
        };

        match s.split_once(':') {
            Some((low, high)) => Ok(Self::new(parse(low)?, parse(high)?)),
            None => Ok(Self::single(parse(s)?)),
        }
    }
}

/// Ordered, duplicate-free list of hyperparameter points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchSpace {
    kernel_type: KernelType,
    points: Vec<HyperParams>,
}

impl SearchSpace {
    pub fn kernel_type(&self) -> KernelType {
        self.kernel_type
    }

    pub fn points(&self) -> &[HyperParams] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HyperParams> {
        self.points.iter()
    }
}

impl<'a> IntoIterator for &'a SearchSpace {
    type Item = &'a HyperParams;
    type IntoIter = std::slice::Iter<'a, HyperParams>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

/// Generate the search space for a kernel family
///
/// A gamma range is required for kernels with a width parameter and is
/// validated but ignored for the linear kernel.
///
/// # Errors
/// `InvalidRange` if any supplied range has `low > high`, or if the gamma
/// range is missing for a kernel that needs it.
pub fn generate(
    kernel_type: KernelType,
    strategy: SearchStrategy,
    c1_range: ExponentRange,
    c2_range: ExponentRange,
    gamma_range: Option<ExponentRange>,
) -> Result<SearchSpace> {
    c1_range.validate("C1")?;
    c2_range.validate("C2")?;
    if let Some(range) = gamma_range {
        range.validate("gamma")?;
    }

    let gammas = match (kernel_type.has_width_parameter(), gamma_range) {
        (false, _) => None,
        (true, Some(range)) => Some(range.values()),
        (true, None) => {
            return Err(TsvmError::InvalidRange(format!(
                "{kernel_type} kernel requires a gamma exponent range"
            )))
        }
    };

    let points = match strategy {
        SearchStrategy::FullGrid => full_grid(&c1_range, &c2_range, gammas.as_deref()),
    };

    Ok(SearchSpace {
        kernel_type,
        points,
    })
}

fn full_grid(c1: &ExponentRange, c2: &ExponentRange, gammas: Option<&[f64]>) -> Vec<HyperParams> {
    let c2_values = c2.values();
    let mut points = Vec::new();

    for c1 in c1.values() {
        for &c2 in &c2_values {
            match gammas {
                None => points.push(HyperParams::new(c1, c2)),
                Some(gammas) => points.extend(
                    gammas
                        .iter()
                        .map(|&gamma| HyperParams::new(c1, c2).with_gamma(gamma)),
                ),
            }
        }
    }

    points
}
