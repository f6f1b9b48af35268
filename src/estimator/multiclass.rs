//! Multi-class decomposition schemes over binary estimators
//!
//! - [`OneVsAll`]: one binary problem per class (class vs the rest)
//! - [`OneVsOne`]: one binary problem per pair of classes
//!
//! Ties are always broken in favour of the smallest class label so that
//! repeated runs produce identical predictions.

use crate::core::{
    BinaryEstimator, Estimator, HyperParams, Matrix, MultiClassEstimator, Result, TsvmError,
};
use crate::utils::validation::class_labels;
use log::debug;

fn check_fit_input(x: &Matrix, y: &[f64]) -> Result<Vec<f64>> {
    if x.nrows() != y.len() {
        return Err(TsvmError::ShapeMismatch(format!(
            "{} samples but {} labels",
            x.nrows(),
            y.len()
        )));
    }
    let classes = class_labels(y);
    if classes.len() < 2 {
        return Err(TsvmError::InvalidDataset(format!(
            "multi-class training needs at least 2 classes, got {}",
            classes.len()
        )));
    }
    Ok(classes)
}

/// One-vs-all classifier: the class whose estimator is most confident wins
#[derive(Debug, Clone)]
pub struct OneVsAll<E> {
    base: E,
    classes: Vec<f64>,
    estimators: Vec<E>,
}

impl<E: BinaryEstimator + Clone> OneVsAll<E> {
    /// Wrap an unfitted binary estimator used as the template for every class
    pub fn new(base: E) -> Self {
        Self {
            base,
            classes: Vec::new(),
            estimators: Vec::new(),
        }
    }

    /// Classes seen during the last fit, sorted ascending
    pub fn classes(&self) -> &[f64] {
        &self.classes
    }
}

impl<E: BinaryEstimator + Clone> Estimator for OneVsAll<E> {
    fn fit(&mut self, x: &Matrix, y: &[f64], params: &HyperParams) -> Result<()> {
        let classes = check_fit_input(x, y)?;
        let mut estimators = Vec::with_capacity(classes.len());

        for &class in &classes {
            let binary: Vec<f64> = y
                .iter()
                .map(|&label| if label == class { 1.0 } else { -1.0 })
                .collect();
            let mut estimator = self.base.clone();
            estimator.fit(x, &binary, params)?;
            debug!("Fitted one-vs-all estimator for class {class}");
            estimators.push(estimator);
        }

        self.classes = classes;
        self.estimators = estimators;
        Ok(())
    }

    fn predict(&self, x: &Matrix) -> Result<Vec<f64>> {
        if self.estimators.is_empty() {
            return Err(TsvmError::ModelNotTrained);
        }

        let scores: Vec<Vec<f64>> = self
            .estimators
            .iter()
            .map(|estimator| estimator.decision_function(x))
            .collect::<Result<_>>()?;

        Ok((0..x.nrows())
            .map(|i| {
                let mut best = 0;
                for c in 1..self.classes.len() {
                    if scores[c][i] > scores[best][i] {
                        best = c;
                    }
                }
                self.classes[best]
            })
            .collect())
    }

    fn name(&self) -> String {
        format!("OVA-{}", self.base.name())
    }
}

impl<E: BinaryEstimator + Clone> MultiClassEstimator for OneVsAll<E> {}

/// One-vs-one classifier: majority vote over all class pairs
#[derive(Debug, Clone)]
pub struct OneVsOne<E> {
    base: E,
    classes: Vec<f64>,
    /// (index of +1 class, index of -1 class, estimator)
    estimators: Vec<(usize, usize, E)>,
}

impl<E: BinaryEstimator + Clone> OneVsOne<E> {
    /// Wrap an unfitted binary estimator used as the template for every pair
    pub fn new(base: E) -> Self {
        Self {
            base,
            classes: Vec::new(),
            estimators: Vec::new(),
        }
    }

    /// Classes seen during the last fit, sorted ascending
    pub fn classes(&self) -> &[f64] {
        &self.classes
    }
}

impl<E: BinaryEstimator + Clone> Estimator for OneVsOne<E> {
    fn fit(&mut self, x: &Matrix, y: &[f64], params: &HyperParams) -> Result<()> {
        let classes = check_fit_input(x, y)?;
        let mut estimators = Vec::new();

        for i in 0..classes.len() {
            for j in (i + 1)..classes.len() {
                let rows: Vec<usize> = (0..y.len())
                    .filter(|&k| y[k] == classes[i] || y[k] == classes[j])
                    .collect();
                let binary: Vec<f64> = rows
                    .iter()
                    .map(|&k| if y[k] == classes[i] { 1.0 } else { -1.0 })
                    .collect();

                let mut estimator = self.base.clone();
                estimator.fit(&x.select_rows(&rows), &binary, params)?;
                debug!(
                    "Fitted one-vs-one estimator for classes {} and {}",
                    classes[i], classes[j]
                );
                estimators.push((i, j, estimator));
            }
        }

        self.classes = classes;
        self.estimators = estimators;
        Ok(())
    }

    fn predict(&self, x: &Matrix) -> Result<Vec<f64>> {
        if self.estimators.is_empty() {
            return Err(TsvmError::ModelNotTrained);
        }

        let mut votes = vec![vec![0usize; self.classes.len()]; x.nrows()];
        for (positive, negative, estimator) in &self.estimators {
            for (sample_votes, label) in votes.iter_mut().zip(estimator.predict(x)?) {
                if label > 0.0 {
                    sample_votes[*positive] += 1;
                } else {
                    sample_votes[*negative] += 1;
                }
            }
        }

        Ok(votes
            .iter()
            .map(|sample_votes| {
                let mut best = 0;
                for c in 1..sample_votes.len() {
                    if sample_votes[c] > sample_votes[best] {
                        best = c;
                    }
                }
                self.classes[best]
            })
            .collect())
    }

    fn name(&self) -> String {
        format!("OVO-{}", self.base.name())
    }
}

impl<E: BinaryEstimator + Clone> MultiClassEstimator for OneVsOne<E> {}
