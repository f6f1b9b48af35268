//! Validation strategies: cross-validation and train/test split, binary and
//! multi-class
//!
//! The strategy is fixed when the [`Validator`] is built. Which constructor is
//! used decides the problem kind: [`Validator::binary`] only accepts binary
//! estimators, [`Validator::multiclass`] only accepts multi-class wrappers.
//!
//! Samples are first ordered by label (stable, so ties keep dataset order).
//! Cross-validation deals that order round-robin into `k` folds, which keeps
//! fold sizes within one of each other and spreads every class over all
//! folds. The train/test split picks evenly spaced positions of the same
//! order as the test set.

use crate::core::{
    BinaryEstimator, Estimator, HyperParams, Matrix, MultiClassEstimator, Result, TsvmError,
};
use crate::metrics::{self, MetricsReport};
use crate::utils::validation::{class_labels, validate_binary_labels};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a hyperparameter point is evaluated
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum EvaluationMethod {
    /// k-fold cross-validation
    CrossValidation { folds: usize },
    /// Single split, `test_fraction` of the samples held out
    TrainTestSplit { test_fraction: f64 },
}

impl EvaluationMethod {
    /// Build a method from a tag and its value
    ///
    /// Accepted tags are `CV`/`cv` (value = number of folds) and
    /// `t_t_split`/`split` (value = test fraction).
    ///
    /// # Errors
    /// `UnsupportedMethod` for any other tag, `InvalidParameter` for a fold
    /// count that is not a positive integer or a fraction outside (0, 1).
    pub fn from_tag(tag: &str, value: f64) -> Result<Self> {
        match tag {
            "CV" | "cv" => {
                if !(value >= 1.0 && value.fract() == 0.0 && value.is_finite()) {
                    return Err(TsvmError::InvalidParameter(format!(
                        "Number of folds must be a positive integer, got: {value}"
                    )));
                }
                Ok(Self::CrossValidation {
                    folds: value as usize,
                })
            }
            "t_t_split" | "split" => {
                if !(value > 0.0 && value < 1.0) {
                    return Err(TsvmError::InvalidParameter(format!(
                        "Test fraction must be in (0, 1), got: {value}"
                    )));
                }
                Ok(Self::TrainTestSplit {
                    test_fraction: value,
                })
            }
            other => Err(TsvmError::UnsupportedMethod(other.to_string())),
        }
    }

    /// Check the method against a dataset of `n_samples`
    pub fn validate(&self, n_samples: usize) -> Result<()> {
        match *self {
            Self::CrossValidation { folds } => {
                if folds < 2 {
                    return Err(TsvmError::InvalidParameter(format!(
                        "Cross-validation needs at least 2 folds, got: {folds}"
                    )));
                }
                if folds > n_samples {
                    return Err(TsvmError::InvalidParameter(format!(
                        "Cannot split {n_samples} samples into {folds} folds"
                    )));
                }
            }
            Self::TrainTestSplit { test_fraction } => {
                test_size(n_samples, test_fraction)?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for EvaluationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CrossValidation { folds } => write!(f, "cv:{folds}"),
            Self::TrainTestSplit { test_fraction } => write!(f, "split:{test_fraction}"),
        }
    }
}

impl FromStr for EvaluationMethod {
    type Err = TsvmError;

    /// Parse `cv:5` or `split:0.3`
    fn from_str(s: &str) -> Result<Self> {
        let (tag, value) = s.split_once(':').ok_or_else(|| {
            TsvmError::ParseError(format!(
                "Invalid evaluation method '{s}'. Use 'cv:<folds>' or 'split:<fraction>'"
            ))
        })?;
        let value: f64 = value
            .trim()
            .parse()
            .map_err(|_| TsvmError::ParseError(format!("Invalid value in '{s}'")))?;
        Self::from_tag(tag.trim(), value)
    }
}

/// Kind of classification problem a validator was built for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProblemKind {
    Binary,
    MultiClass,
}

/// The four validation strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValidationStrategy {
    CrossValidation,
    TrainTest,
    CrossValidationMultiClass,
    TrainTestMultiClass,
}

impl ValidationStrategy {
    /// Select the strategy for a problem kind and evaluation method
    pub fn select(problem: ProblemKind, method: &EvaluationMethod) -> Self {
        match (problem, method) {
            (ProblemKind::Binary, EvaluationMethod::CrossValidation { .. }) => {
                Self::CrossValidation
            }
            (ProblemKind::Binary, EvaluationMethod::TrainTestSplit { .. }) => Self::TrainTest,
            (ProblemKind::MultiClass, EvaluationMethod::CrossValidation { .. }) => {
                Self::CrossValidationMultiClass
            }
            (ProblemKind::MultiClass, EvaluationMethod::TrainTestSplit { .. }) => {
                Self::TrainTestMultiClass
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::CrossValidation => "cv_validator",
            Self::TrainTest => "tt_validator",
            Self::CrossValidationMultiClass => "cv_validator_mc",
            Self::TrainTestMultiClass => "tt_validator_mc",
        }
    }

    pub fn is_multiclass(&self) -> bool {
        matches!(
            self,
            Self::CrossValidationMultiClass | Self::TrainTestMultiClass
        )
    }
}

impl fmt::Display for ValidationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of validating one hyperparameter point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Mean accuracy over folds, in percent
    pub mean_accuracy: f64,
    /// Population standard deviation of the fold accuracies; 0 for a split
    pub std_deviation: f64,
    /// Metrics of every fold, or of the single test split
    pub fold_metrics: Vec<MetricsReport>,
}

impl ValidationResult {
    /// Mean and population std of the fold accuracies
    ///
    /// Identical folds give that accuracy back exactly with a std of 0.
    pub(crate) fn from_folds(fold_metrics: Vec<MetricsReport>) -> Self {
        let accuracies: Vec<f64> = fold_metrics.iter().map(|m| m.accuracy()).collect();
        let first = accuracies.first().copied().unwrap_or(0.0);

        let (mean, std) = if accuracies.iter().all(|&a| a == first) {
            (first, 0.0)
        } else {
            let n = accuracies.len() as f64;
            let mean = accuracies.iter().sum::<f64>() / n;
            let variance = accuracies.iter().map(|a| (a - mean).powi(2)).sum::<f64>() / n;
            (mean, variance.sqrt())
        };

        Self {
            mean_accuracy: mean,
            std_deviation: std,
            fold_metrics,
        }
    }
}

/// Evaluates hyperparameter points of one estimator on one dataset
///
/// The estimator given at construction is an unfitted prototype; every fold
/// fits its own clone, so `validate` never mutates the validator.
#[derive(Debug, Clone)]
pub struct Validator<'a, E> {
    x: &'a Matrix,
    y: &'a [f64],
    method: EvaluationMethod,
    estimator: E,
    strategy: ValidationStrategy,
}

impl<'a, E: BinaryEstimator + Clone> Validator<'a, E> {
    /// Validator for a binary problem; labels must be +1/-1
    pub fn binary(x: &'a Matrix, y: &'a [f64], method: EvaluationMethod, estimator: E) -> Result<Self> {
        check_data(x, y)?;
        validate_binary_labels(y)?;
        Self::build(x, y, method, estimator, ProblemKind::Binary)
    }
}

impl<'a, E: MultiClassEstimator + Clone> Validator<'a, E> {
    /// Validator for a problem with at least three classes
    pub fn multiclass(
        x: &'a Matrix,
        y: &'a [f64],
        method: EvaluationMethod,
        estimator: E,
    ) -> Result<Self> {
        check_data(x, y)?;
        let n_classes = class_labels(y).len();
        if n_classes < 3 {
            return Err(TsvmError::InvalidDataset(format!(
                "multi-class validation needs at least 3 classes, got {n_classes}"
            )));
        }
        Self::build(x, y, method, estimator, ProblemKind::MultiClass)
    }
}

impl<'a, E: Estimator + Clone> Validator<'a, E> {
    fn build(
        x: &'a Matrix,
        y: &'a [f64],
        method: EvaluationMethod,
        estimator: E,
        problem: ProblemKind,
    ) -> Result<Self> {
        method.validate(y.len())?;
        let strategy = ValidationStrategy::select(problem, &method);
        debug!(
            "Selected {strategy} for {} with {} samples",
            estimator.name(),
            y.len()
        );

        Ok(Self {
            x,
            y,
            method,
            estimator,
            strategy,
        })
    }

    /// Strategy chosen for this problem kind and evaluation method
    pub fn choose_validator(&self) -> ValidationStrategy {
        self.strategy
    }

    pub fn method(&self) -> &EvaluationMethod {
        &self.method
    }

    /// The unfitted estimator prototype
    pub fn estimator(&self) -> &E {
        &self.estimator
    }

    /// Number of samples in the validated dataset
    pub fn n_samples(&self) -> usize {
        self.y.len()
    }

    /// Evaluate one hyperparameter point with the chosen strategy
    ///
    /// # Errors
    /// `FitFailure` naming the fold or split when fitting fails. No partial
    /// result is returned.
    pub fn validate(&self, params: &HyperParams) -> Result<ValidationResult> {
        match (self.strategy, self.method) {
            (
                ValidationStrategy::CrossValidation | ValidationStrategy::CrossValidationMultiClass,
                EvaluationMethod::CrossValidation { folds },
            ) => self.cross_validate(folds, params),
            (
                ValidationStrategy::TrainTest | ValidationStrategy::TrainTestMultiClass,
                EvaluationMethod::TrainTestSplit { test_fraction },
            ) => self.train_test(test_fraction, params),
            (strategy, method) => Err(TsvmError::UnsupportedMethod(format!(
                "{method} cannot run under {strategy}"
            ))),
        }
    }

    fn cross_validate(&self, k: usize, params: &HyperParams) -> Result<ValidationResult> {
        let folds = fold_indices(self.y, k);
        let mut fold_metrics = Vec::with_capacity(k);

        for (i, test) in folds.iter().enumerate() {
            let train = complement(self.y.len(), test);
            let location = format!("fold {}/{k} ({params})", i + 1);
            let report = self.fit_and_score(&train, test, params, &location)?;
            debug!("{location}: accuracy {:.2}%", report.accuracy());
            fold_metrics.push(report);
        }

        Ok(ValidationResult::from_folds(fold_metrics))
    }

    fn train_test(&self, test_fraction: f64, params: &HyperParams) -> Result<ValidationResult> {
        let (train, test) = train_test_indices(self.y, test_fraction)?;
        let location = format!("train/test split ({params})");
        let report = self.fit_and_score(&train, &test, params, &location)?;
        debug!("{location}: accuracy {:.2}%", report.accuracy());

        Ok(ValidationResult {
            mean_accuracy: report.accuracy(),
            std_deviation: 0.0,
            fold_metrics: vec![report],
        })
    }

    fn fit_and_score(
        &self,
        train: &[usize],
        test: &[usize],
        params: &HyperParams,
        location: &str,
    ) -> Result<MetricsReport> {
        let x_train = self.x.select_rows(train);
        let y_train: Vec<f64> = train.iter().map(|&i| self.y[i]).collect();

        let mut estimator = self.estimator.clone();
        estimator
            .fit(&x_train, &y_train, params)
            .map_err(|e| TsvmError::FitFailure {
                location: location.to_string(),
                reason: e.to_string(),
            })?;

        let y_true: Vec<f64> = test.iter().map(|&i| self.y[i]).collect();
        let y_pred = estimator.predict(&self.x.select_rows(test))?;

        if self.strategy.is_multiclass() {
            metrics::multiclass(&y_true, &y_pred).map(MetricsReport::MultiClass)
        } else {
            metrics::binary(&y_true, &y_pred).map(MetricsReport::Binary)
        }
    }
}

fn check_data(x: &Matrix, y: &[f64]) -> Result<()> {
    if y.is_empty() {
        return Err(TsvmError::ShapeMismatch(
            "dataset must not be empty".to_string(),
        ));
    }
    if x.nrows() != y.len() {
        return Err(TsvmError::ShapeMismatch(format!(
            "{} samples but {} labels",
            x.nrows(),
            y.len()
        )));
    }
    Ok(())
}

/// Sample indices ordered by label; equal labels keep dataset order
fn label_order(labels: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..labels.len()).collect();
    order.sort_by(|&a, &b| labels[a].total_cmp(&labels[b]));
    order
}

fn complement(n: usize, held_out: &[usize]) -> Vec<usize> {
    let mut mask = vec![true; n];
    for &i in held_out {
        mask[i] = false;
    }
    (0..n).filter(|&i| mask[i]).collect()
}

/// Partition sample indices into `k` folds, each sorted ascending
///
/// Position `p` of the label-ordered samples goes to fold `p % k`.
pub fn fold_indices(labels: &[f64], k: usize) -> Vec<Vec<usize>> {
    let mut folds = vec![Vec::new(); k];
    if k == 0 {
        return folds;
    }
    for (position, index) in label_order(labels).into_iter().enumerate() {
        folds[position % k].push(index);
    }
    for fold in &mut folds {
        fold.sort_unstable();
    }
    folds
}

/// Number of test samples for a split of `n` samples
fn test_size(n: usize, test_fraction: f64) -> Result<usize> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(TsvmError::InvalidParameter(format!(
            "Test fraction must be in (0, 1), got: {test_fraction}"
        )));
    }

    let raw = n as f64 * test_fraction;
    let n_test = if (raw - raw.round()).abs() < 1e-9 {
        raw.round()
    } else {
        raw.ceil()
    } as usize;

    if n_test == 0 || n_test >= n {
        return Err(TsvmError::InvalidParameter(format!(
            "Test fraction {test_fraction} leaves an empty side when splitting {n} samples"
        )));
    }
    Ok(n_test)
}

/// Split sample indices into (train, test), both sorted ascending
///
/// The test set takes `n_test` evenly spaced positions of the label-ordered
/// samples.
pub fn train_test_indices(labels: &[f64], test_fraction: f64) -> Result<(Vec<usize>, Vec<usize>)> {
    let n = labels.len();
    let n_test = test_size(n, test_fraction)?;

    let mut train = Vec::with_capacity(n - n_test);
    let mut test = Vec::with_capacity(n_test);
    for (position, index) in label_order(labels).into_iter().enumerate() {
        if (position + 1) * n_test / n > position * n_test / n {
            test.push(index);
        } else {
            train.push(index);
        }
    }

    train.sort_unstable();
    test.sort_unstable();
    Ok((train, test))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimator::{OneVsAll, OneVsOne, TwinSvm};
    use approx::assert_relative_eq;

    /// Two parallel lines x - y = ±4 with five points each
    fn separable_binary() -> (Matrix, Vec<f64>) {
        let mut rows = Vec::new();
        let mut labels = Vec::new();
        for t in [-1.0, -0.5, 0.0, 0.5, 1.0] {
            rows.push(vec![2.0 + t, -2.0 + t]);
            labels.push(1.0);
            rows.push(vec![-2.0 + t, 2.0 + t]);
            labels.push(-1.0);
        }
        (Matrix::from_rows(rows).unwrap(), labels)
    }

    /// Three tight clusters at the corners of a triangle
    fn separable_multiclass() -> (Matrix, Vec<f64>) {
        let mut rows = Vec::new();
        let mut labels = Vec::new();
        let offsets = [(0.0, 0.0), (0.1, 0.0), (-0.1, 0.0), (0.0, 0.1), (0.0, -0.1)];
        for &(dx, dy) in &offsets {
            for (class, (cx, cy)) in [(1.0, (0.0, 4.0)), (2.0, (-4.0, -2.0)), (3.0, (4.0, -2.0))] {
                rows.push(vec![cx + dx, cy + dy]);
                labels.push(class);
            }
        }
        (Matrix::from_rows(rows).unwrap(), labels)
    }

    /// Estimator whose fit always fails
    #[derive(Debug, Clone)]
    struct FailingEstimator;

    impl Estimator for FailingEstimator {
        fn fit(&mut self, _x: &Matrix, _y: &[f64], _params: &HyperParams) -> Result<()> {
            Err(TsvmError::ConvergenceError("did not converge".to_string()))
        }

        fn predict(&self, x: &Matrix) -> Result<Vec<f64>> {
            Ok(vec![1.0; x.nrows()])
        }

        fn name(&self) -> String {
            "FAIL".to_string()
        }
    }

    impl BinaryEstimator for FailingEstimator {
        fn decision_function(&self, x: &Matrix) -> Result<Vec<f64>> {
            Ok(vec![1.0; x.nrows()])
        }
    }

    const CV5: EvaluationMethod = EvaluationMethod::CrossValidation { folds: 5 };
    const SPLIT30: EvaluationMethod = EvaluationMethod::TrainTestSplit { test_fraction: 0.3 };

    #[test]
    fn test_strategy_dispatch() {
        let (x, y) = separable_binary();
        let (xm, ym) = separable_multiclass();

        let strategies = [
            Validator::binary(&x, &y, CV5, TwinSvm::linear())
                .unwrap()
                .choose_validator(),
            Validator::binary(&x, &y, SPLIT30, TwinSvm::linear())
                .unwrap()
                .choose_validator(),
            Validator::multiclass(&xm, &ym, CV5, OneVsAll::new(TwinSvm::linear()))
                .unwrap()
                .choose_validator(),
            Validator::multiclass(&xm, &ym, SPLIT30, OneVsOne::new(TwinSvm::linear()))
                .unwrap()
                .choose_validator(),
        ];

        assert_eq!(
            strategies,
            [
                ValidationStrategy::CrossValidation,
                ValidationStrategy::TrainTest,
                ValidationStrategy::CrossValidationMultiClass,
                ValidationStrategy::TrainTestMultiClass,
            ]
        );
        let names: Vec<&str> = strategies.iter().map(|s| s.name()).collect();
        assert_eq!(
            names,
            vec!["cv_validator", "tt_validator", "cv_validator_mc", "tt_validator_mc"]
        );
    }

    #[test]
    fn test_separable_binary_is_perfect() {
        let (x, y) = separable_binary();
        let params = HyperParams::new(1.0, 1.0);

        for method in [CV5, SPLIT30] {
            let result = Validator::binary(&x, &y, method, TwinSvm::linear())
                .unwrap()
                .validate(&params)
                .unwrap();
            assert_eq!(result.mean_accuracy, 100.0);
            assert_eq!(result.std_deviation, 0.0);
        }
    }

    #[test]
    fn test_separable_multiclass_is_perfect() {
        let (x, y) = separable_multiclass();
        let params = HyperParams::new(1.0, 1.0);

        for method in [CV5, SPLIT30] {
            let ova = Validator::multiclass(&x, &y, method, OneVsAll::new(TwinSvm::linear()))
                .unwrap()
                .validate(&params)
                .unwrap();
            assert_eq!(ova.mean_accuracy, 100.0);
            assert_eq!(ova.std_deviation, 0.0);
            assert!(matches!(ova.fold_metrics[0], MetricsReport::MultiClass(_)));

            let ovo = Validator::multiclass(&x, &y, method, OneVsOne::new(TwinSvm::linear()))
                .unwrap()
                .validate(&params)
                .unwrap();
            assert_eq!(ovo.mean_accuracy, 100.0);
        }
    }

    #[test]
    fn test_fold_metrics_count() {
        let (x, y) = separable_binary();
        let params = HyperParams::new(1.0, 1.0);

        let cv = Validator::binary(&x, &y, CV5, TwinSvm::linear()).unwrap();
        assert_eq!(cv.validate(&params).unwrap().fold_metrics.len(), 5);

        let tt = Validator::binary(&x, &y, SPLIT30, TwinSvm::linear()).unwrap();
        let result = tt.validate(&params).unwrap();
        assert_eq!(result.fold_metrics.len(), 1);
        match &result.fold_metrics[0] {
            MetricsReport::Binary(m) => assert_eq!(m.tp + m.tn + m.fp + m.fn_, 3),
            other => panic!("expected binary metrics, got {other:?}"),
        }
    }

    #[test]
    fn test_fit_failure_is_reported() {
        let (x, y) = separable_binary();
        let params = HyperParams::new(1.0, 1.0);

        let err = Validator::binary(&x, &y, CV5, FailingEstimator)
            .unwrap()
            .validate(&params)
            .unwrap_err();
        match err {
            TsvmError::FitFailure { location, reason } => {
                assert_eq!(location, "fold 1/5 (C1=1, C2=1)");
                assert!(reason.contains("did not converge"));
            }
            other => panic!("expected FitFailure, got {other:?}"),
        }

        let err = Validator::binary(&x, &y, SPLIT30, FailingEstimator)
            .unwrap()
            .validate(&params)
            .unwrap_err();
        assert!(
            matches!(err, TsvmError::FitFailure { ref location, .. } if location.starts_with("train/test split"))
        );
    }

    #[test]
    fn test_missing_gamma_becomes_fit_failure() {
        let (x, y) = separable_binary();
        let result = Validator::binary(&x, &y, CV5, TwinSvm::rbf())
            .unwrap()
            .validate(&HyperParams::new(1.0, 1.0));
        assert!(matches!(result, Err(TsvmError::FitFailure { .. })));
    }

    #[test]
    fn test_construction_errors() {
        let (x, y) = separable_binary();

        let bad_folds = EvaluationMethod::CrossValidation { folds: 1 };
        assert!(matches!(
            Validator::binary(&x, &y, bad_folds, TwinSvm::linear()),
            Err(TsvmError::InvalidParameter(_))
        ));

        let too_many = EvaluationMethod::CrossValidation { folds: 11 };
        assert!(Validator::binary(&x, &y, too_many, TwinSvm::linear()).is_err());

        for f in [0.0, 1.0, -0.2, 0.99] {
            let split = EvaluationMethod::TrainTestSplit { test_fraction: f };
            assert!(matches!(
                Validator::binary(&x, &y, split, TwinSvm::linear()),
                Err(TsvmError::InvalidParameter(_))
            ));
        }

        assert!(matches!(
            Validator::binary(&x, &y[..5], CV5, TwinSvm::linear()),
            Err(TsvmError::ShapeMismatch(_))
        ));

        let multi = vec![1.0, 2.0, 3.0, 1.0, 2.0, 3.0, 1.0, 2.0, 3.0, 1.0];
        assert!(matches!(
            Validator::binary(&x, &multi, CV5, TwinSvm::linear()),
            Err(TsvmError::InvalidLabel(_))
        ));

        assert!(matches!(
            Validator::multiclass(&x, &y, CV5, OneVsAll::new(TwinSvm::linear())),
            Err(TsvmError::InvalidDataset(_))
        ));
    }

    #[test]
    fn test_folds_partition_samples() {
        let labels = vec![1.0, -1.0, 1.0, 1.0, -1.0, 1.0, -1.0];

        for k in 2..=7 {
            let folds = fold_indices(&labels, k);
            assert_eq!(folds.len(), k);

            let mut all: Vec<usize> = folds.iter().flatten().copied().collect();
            all.sort_unstable();
            assert_eq!(all, (0..labels.len()).collect::<Vec<_>>());

            let sizes: Vec<usize> = folds.iter().map(|f| f.len()).collect();
            let max = sizes.iter().max().unwrap();
            let min = sizes.iter().min().unwrap();
            assert!(max - min <= 1, "k={k}: {sizes:?}");
        }

        assert_eq!(fold_indices(&labels, 3), fold_indices(&labels, 3));
    }

    #[test]
    fn test_folds_are_stratified() {
        let (_, y) = separable_binary();
        for fold in fold_indices(&y, 5) {
            let positives = fold.iter().filter(|&&i| y[i] > 0.0).count();
            assert_eq!(positives, 1);
            assert_eq!(fold.len(), 2);
        }
    }

    #[test]
    fn test_train_test_indices() {
        let (_, y) = separable_binary();
        let (train, test) = train_test_indices(&y, 0.3).unwrap();

        assert_eq!(test.len(), 3);
        assert_eq!(train.len(), 7);
        assert!(test.iter().any(|&i| y[i] > 0.0));
        assert!(test.iter().any(|&i| y[i] < 0.0));
        assert!(train.iter().all(|i| !test.contains(i)));

        // 4.5 test samples round up
        let (_, test) = train_test_indices(&[1.0; 15], 0.3).unwrap();
        assert_eq!(test.len(), 5);
    }

    #[test]
    fn test_population_std() {
        let result = ValidationResult::from_folds(vec![
            metrics::compute(&[1.0, -1.0], &[1.0, -1.0]).unwrap(),
            metrics::compute(&[1.0, -1.0], &[1.0, 1.0]).unwrap(),
        ]);
        assert_relative_eq!(result.mean_accuracy, 75.0);
        assert_relative_eq!(result.std_deviation, 25.0);
    }

    #[test]
    fn test_identical_folds_have_zero_std() {
        let y_true = [1.0; 9];
        let y_pred = [1.0, 1.0, 1.0, 1.0, 1.0, -1.0, -1.0, -1.0, -1.0];
        let fold = metrics::compute(&y_true, &y_pred).unwrap();
        let accuracy = fold.accuracy();
        assert_relative_eq!(accuracy, 500.0 / 9.0, epsilon = 1e-12);

        let result = ValidationResult::from_folds(vec![fold.clone(), fold.clone(), fold]);
        assert_eq!(result.mean_accuracy, accuracy);
        assert_eq!(result.std_deviation, 0.0);
        assert_eq!(result.fold_metrics.len(), 3);
    }

    #[test]
    fn test_separable_binary_rbf_space_is_perfect() {
        use crate::kernel::KernelType;
        use crate::selection::{generate, ExponentRange, SearchStrategy};

        let (x, y) = separable_binary();
        let space = generate(
            KernelType::Rbf,
            SearchStrategy::FullGrid,
            ExponentRange::new(0, 1),
            ExponentRange::new(0, 1),
            Some(ExponentRange::new(-2, 0)),
        )
        .unwrap();
        assert_eq!(space.len(), 12);

        for method in [CV5, SPLIT30] {
            let validator = Validator::binary(&x, &y, method, TwinSvm::rbf()).unwrap();
            for params in &space {
                let result = validator.validate(params).unwrap();
                assert_eq!(result.mean_accuracy, 100.0, "{method} at {params}");
                assert_eq!(result.std_deviation, 0.0, "{method} at {params}");
            }
        }
    }

    #[test]
    fn test_multiclass_fit_failure_is_reported() {
        let (x, y) = separable_multiclass();
        let params = HyperParams::new(1.0, 1.0);

        let err = Validator::multiclass(&x, &y, CV5, OneVsAll::new(FailingEstimator))
            .unwrap()
            .validate(&params)
            .unwrap_err();
        match err {
            TsvmError::FitFailure { location, reason } => {
                assert_eq!(location, "fold 1/5 (C1=1, C2=1)");
                assert!(reason.contains("did not converge"));
            }
            other => panic!("expected FitFailure, got {other:?}"),
        }

        let err = Validator::multiclass(&x, &y, SPLIT30, OneVsOne::new(FailingEstimator))
            .unwrap()
            .validate(&params)
            .unwrap_err();
        assert!(
            matches!(err, TsvmError::FitFailure { ref location, .. } if location.starts_with("train/test split"))
        );
    }

    #[test]
    fn test_split_fraction_tag_bounds() {
        for value in [0.0, 1.0, 1.5, -0.3, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                EvaluationMethod::from_tag("t_t_split", value),
                Err(TsvmError::InvalidParameter(_))
            ));
        }
        assert!("split:1.5".parse::<EvaluationMethod>().is_err());
        assert!(crate::selection::result_name_from_tag("Iris", "OVO-TSVM", "linear", "split", 1.5)
            .is_err());
    }

    #[test]
    fn test_evaluation_method_tags() {
        assert_eq!(
            EvaluationMethod::from_tag("CV", 10.0).unwrap(),
            EvaluationMethod::CrossValidation { folds: 10 }
        );
        assert_eq!(
            EvaluationMethod::from_tag("t_t_split", 0.3).unwrap(),
            EvaluationMethod::TrainTestSplit { test_fraction: 0.3 }
        );
        assert!(matches!(
            EvaluationMethod::from_tag("bootstrap", 3.0),
            Err(TsvmError::UnsupportedMethod(tag)) if tag == "bootstrap"
        ));
        assert!(EvaluationMethod::from_tag("cv", 2.5).is_err());
    }

    #[test]
    fn test_evaluation_method_parse() {
        assert_eq!("cv:5".parse::<EvaluationMethod>().unwrap(), CV5);
        assert_eq!("split:0.3".parse::<EvaluationMethod>().unwrap(), SPLIT30);
        assert!("cv".parse::<EvaluationMethod>().is_err());
        assert!("loo:1".parse::<EvaluationMethod>().is_err());
        assert_eq!(CV5.to_string(), "cv:5");
        assert_eq!(SPLIT30.to_string(), "split:0.3");
    }
}
