//! Grid search over a hyperparameter search space

use crate::core::{Estimator, HyperParams, Result, TsvmError};
use crate::selection::{SearchSpace, ValidationResult, Validator};
use log::{info, warn};
use serde::{Deserialize, Serialize};

/// What to do when a point fails to validate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailurePolicy {
    /// Log the failure, record it and move on to the next point
    #[default]
    Skip,
    /// Stop the search and return the error
    Abort,
}

/// A successfully validated point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchEntry {
    pub params: HyperParams,
    pub result: ValidationResult,
}

/// A point whose validation failed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchFailure {
    pub params: HyperParams,
    pub error: String,
}

/// Outcome of a grid search, entries in search-space order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchReport {
    pub strategy: String,
    pub entries: Vec<SearchEntry>,
    pub failures: Vec<SearchFailure>,
    /// Index into `entries` of the best point
    pub best_index: usize,
}

impl SearchReport {
    /// Highest mean accuracy, then lowest std deviation, then earliest point
    pub fn best(&self) -> Option<&SearchEntry> {
        self.entries.get(self.best_index)
    }
}

fn best_index(entries: &[SearchEntry]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, entry) in entries.iter().enumerate() {
        let better = match best {
            None => true,
            Some(b) => {
                let current = &entries[b].result;
                entry.result.mean_accuracy > current.mean_accuracy
                    || (entry.result.mean_accuracy == current.mean_accuracy
                        && entry.result.std_deviation < current.std_deviation)
            }
        };
        if better {
            best = Some(i);
        }
    }
    best
}

/// Runs a validator over every point of a search space
pub struct GridSearch<'v, 'a, E> {
    validator: &'v Validator<'a, E>,
    space: &'v SearchSpace,
    policy: FailurePolicy,
}

impl<'v, 'a, E: Estimator + Clone> GridSearch<'v, 'a, E> {
    pub fn new(validator: &'v Validator<'a, E>, space: &'v SearchSpace) -> Self {
        Self {
            validator,
            space,
            policy: FailurePolicy::default(),
        }
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Validate every point in order and rank the results
    ///
    /// # Errors
    /// The first validation error under [`FailurePolicy::Abort`], or
    /// `InvalidParameter` when no point could be validated.
    pub fn run(&self) -> Result<SearchReport> {
        let strategy = self.validator.choose_validator();
        info!(
            "Searching {} points with {} ({})",
            self.space.len(),
            strategy,
            self.validator.estimator().name()
        );

        let mut entries = Vec::with_capacity(self.space.len());
        let mut failures = Vec::new();

        for (i, params) in self.space.iter().enumerate() {
            match self.validator.validate(params) {
                Ok(result) => {
                    info!(
                        "[{}/{}] {params}: accuracy {:.2}% ± {:.2}",
                        i + 1,
                        self.space.len(),
                        result.mean_accuracy,
                        result.std_deviation
                    );
                    entries.push(SearchEntry {
                        params: *params,
                        result,
                    });
                }
                Err(e) => match self.policy {
                    FailurePolicy::Abort => return Err(e),
                    FailurePolicy::Skip => {
                        warn!("Skipping {params}: {e}");
                        failures.push(SearchFailure {
                            params: *params,
                            error: e.to_string(),
                        });
                    }
                },
            }
        }

        let best_index = best_index(&entries).ok_or_else(|| {
            TsvmError::InvalidParameter(format!(
                "all {} points of the search space failed to validate",
                failures.len()
            ))
        })?;

        let best = &entries[best_index];
        info!(
            "Best: {} with accuracy {:.2}% ± {:.2}",
            best.params, best.result.mean_accuracy, best.result.std_deviation
        );

        Ok(SearchReport {
            strategy: strategy.name().to_string(),
            entries,
            failures,
            best_index,
        })
    }
}
