//! Integration tests for the rtsvm library
//!
//! These tests exercise the public API end to end: search space generation,
//! validation under all four strategies, grid search, naming and result files.

use approx::assert_relative_eq;
use rtsvm::metrics::{self, MetricsReport};
use rtsvm::selection::{generate, result_name_from_tag};
use rtsvm::{
    CSVDataset, Dataset, Estimator, EvaluationMethod, ExponentRange, FailurePolicy, GridSearch,
    HyperParams, KernelType, Matrix, OneVsAll, OneVsOne, ResultsFile, SearchStrategy, TsvmError,
    TwinSvm, ValidationStrategy, Validator,
};
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

const CV5: EvaluationMethod = EvaluationMethod::CrossValidation { folds: 5 };
const SPLIT30: EvaluationMethod = EvaluationMethod::TrainTestSplit { test_fraction: 0.3 };

/// Two parallel lines x - y = 4 (+1) and x - y = -4 (-1)
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

#[test]
fn test_linear_space_cardinality_and_order() {
    for (lo1, hi1, lo2, hi2) in [(-2, 2, -1, 0), (0, 0, 0, 0), (-8, 2, -8, 2), (3, 4, -5, -3)] {
        let space = generate(
            KernelType::Linear,
            SearchStrategy::FullGrid,
            ExponentRange::new(lo1, hi1),
            ExponentRange::new(lo2, hi2),
            None,
        )
        .unwrap();

        let expected = ((hi1 - lo1 + 1) * (hi2 - lo2 + 1)) as usize;
        assert_eq!(space.len(), expected);

        let mut points = space.iter();
        for e1 in lo1..=hi1 {
            for e2 in lo2..=hi2 {
                let p = points.next().unwrap();
                assert_eq!(p.c1, 2f64.powi(e1));
                assert_eq!(p.c2, 2f64.powi(e2));
                assert_eq!(p.gamma, None);
            }
        }
        assert!(points.next().is_none());
    }
}

#[test]
fn test_rbf_space_literal_order() {
    let space = generate(
        KernelType::Rbf,
        SearchStrategy::FullGrid,
        ExponentRange::new(1, 1),
        ExponentRange::new(-3, -2),
        Some(ExponentRange::new(-5, -4)),
    )
    .unwrap();

    let expected = vec![
        HyperParams::new(2.0, 0.125).with_gamma(0.03125),
        HyperParams::new(2.0, 0.125).with_gamma(0.0625),
        HyperParams::new(2.0, 0.25).with_gamma(0.03125),
        HyperParams::new(2.0, 0.25).with_gamma(0.0625),
    ];
    assert_eq!(space.points(), expected.as_slice());
}

#[test]
fn test_rbf_space_requires_gamma() {
    let result = generate(
        KernelType::Rbf,
        SearchStrategy::FullGrid,
        ExponentRange::new(0, 1),
        ExponentRange::new(0, 1),
        None,
    );
    assert!(matches!(result, Err(TsvmError::InvalidRange(_))));
}

#[test]
fn test_reference_metrics_example() {
    let y_true = [1.0, -1.0, 1.0, 1.0, -1.0];
    let y_pred = [1.0, 1.0, 1.0, 1.0, -1.0];

    let m = metrics::binary(&y_true, &y_pred).unwrap();
    assert_eq!((m.tp, m.tn, m.fp, m.fn_), (3, 1, 1, 0));
    assert_relative_eq!(m.accuracy, 80.0);
    assert_relative_eq!(m.recall_pos, 100.0);
    assert_relative_eq!(m.precision_pos, 75.0);
    assert_relative_eq!(m.f1_pos, 85.71, epsilon = 0.01);
    assert_relative_eq!(m.recall_neg, 50.0);
    assert_relative_eq!(m.precision_neg, 100.0);
    assert_relative_eq!(m.f1_neg, 66.67, epsilon = 0.01);

    assert!(matches!(
        metrics::compute(&y_true, &y_pred).unwrap(),
        MetricsReport::Binary(_)
    ));
}

#[test]
fn test_result_names() {
    let cv = result_name_from_tag("Iris", "OVO-TSVM", "linear", "CV", 10.0).unwrap();
    assert!(cv.starts_with("OVO-TSVM_linear_10-F-CV_Iris"));

    let split = result_name_from_tag("Iris", "OVO-TSVM", "linear", "t_t_split", 0.3).unwrap();
    assert!(split.starts_with("OVO-TSVM_linear_Tr70-Te30_Iris"));

    assert!(matches!(
        result_name_from_tag("Iris", "OVO-TSVM", "linear", "bootstrap", 1.0),
        Err(TsvmError::UnsupportedMethod(_))
    ));
}

#[test]
fn test_four_way_dispatch() {
    let (x, y) = separable_binary();
    let (xm, ym) = separable_multiclass();

    assert_eq!(
        Validator::binary(&x, &y, CV5, TwinSvm::linear())
            .unwrap()
            .choose_validator(),
        ValidationStrategy::CrossValidation
    );
    assert_eq!(
        Validator::binary(&x, &y, SPLIT30, TwinSvm::linear())
            .unwrap()
            .choose_validator(),
        ValidationStrategy::TrainTest
    );
    assert_eq!(
        Validator::multiclass(&xm, &ym, CV5, OneVsOne::new(TwinSvm::linear()))
            .unwrap()
            .choose_validator(),
        ValidationStrategy::CrossValidationMultiClass
    );
    assert_eq!(
        Validator::multiclass(&xm, &ym, SPLIT30, OneVsAll::new(TwinSvm::linear()))
            .unwrap()
            .choose_validator(),
        ValidationStrategy::TrainTestMultiClass
    );
}

#[test]
fn test_separable_binary_over_search_space() {
    let (x, y) = separable_binary();
    let space = generate(
        KernelType::Linear,
        SearchStrategy::FullGrid,
        ExponentRange::new(-2, 2),
        ExponentRange::new(-2, 2),
        None,
    )
    .unwrap();

    for method in [CV5, SPLIT30] {
        let validator = Validator::binary(&x, &y, method, TwinSvm::linear()).unwrap();
        for params in &space {
            let result = validator.validate(params).unwrap();
            assert_eq!(result.mean_accuracy, 100.0, "{method} at {params}");
            assert_eq!(result.std_deviation, 0.0, "{method} at {params}");
        }
    }
}

#[test]
fn test_separable_multiclass_both_schemes() {
    let (x, y) = separable_multiclass();
    let params = HyperParams::new(1.0, 1.0);

    for method in [CV5, SPLIT30] {
        let ova = Validator::multiclass(&x, &y, method, OneVsAll::new(TwinSvm::linear()))
            .unwrap()
            .validate(&params)
            .unwrap();
        assert_eq!(ova.mean_accuracy, 100.0);
        assert_eq!(ova.std_deviation, 0.0);

        let ovo = Validator::multiclass(&x, &y, method, OneVsOne::new(TwinSvm::linear()))
            .unwrap()
            .validate(&params)
            .unwrap();
        assert_eq!(ovo.mean_accuracy, 100.0);
        assert_eq!(ovo.std_deviation, 0.0);

        match &ovo.fold_metrics[0] {
            MetricsReport::MultiClass(m) => {
                let labels: Vec<f64> = m.classes.iter().map(|c| c.label).collect();
                assert_eq!(labels, vec![1.0, 2.0, 3.0]);
            }
            other => panic!("expected multi-class metrics, got {other:?}"),
        }
    }
}

#[test]
fn test_grid_search_picks_earliest_perfect_point() {
    let (x, y) = separable_binary();
    let space = generate(
        KernelType::Linear,
        SearchStrategy::FullGrid,
        ExponentRange::new(-1, 1),
        ExponentRange::new(0, 0),
        None,
    )
    .unwrap();
    let validator = Validator::binary(&x, &y, CV5, TwinSvm::linear()).unwrap();

    let report = GridSearch::new(&validator, &space)
        .with_failure_policy(FailurePolicy::Abort)
        .run()
        .unwrap();

    assert_eq!(report.entries.len(), 3);
    assert!(report.failures.is_empty());
    assert_eq!(report.strategy, "cv_validator");

    // All points tie at 100% / 0, so the first one wins
    let best = report.best().unwrap();
    assert_eq!(best.params, HyperParams::new(0.5, 1.0));
    assert_eq!(report.best_index, 0);
}

#[test]
fn test_grid_search_skips_rbf_points_without_gamma() {
    let (x, y) = separable_binary();
    let space = generate(
        KernelType::Linear,
        SearchStrategy::FullGrid,
        ExponentRange::new(0, 1),
        ExponentRange::new(0, 0),
        None,
    )
    .unwrap();

    // The linear space carries no gamma, which an RBF estimator cannot fit
    let validator = Validator::binary(&x, &y, CV5, TwinSvm::rbf()).unwrap();

    let skipped = GridSearch::new(&validator, &space).run();
    assert!(matches!(skipped, Err(TsvmError::InvalidParameter(_))));

    let aborted = GridSearch::new(&validator, &space)
        .with_failure_policy(FailurePolicy::Abort)
        .run();
    assert!(matches!(aborted, Err(TsvmError::FitFailure { .. })));
}

#[test]
fn test_csv_to_results_file_workflow() {
    let mut csv = NamedTempFile::with_suffix(".csv").expect("Failed to create temp file");
    writeln!(csv, "x1,x2,label").expect("Failed to write");
    let (x, y) = separable_binary();
    for (row, label) in x.rows().zip(&y) {
        writeln!(csv, "{},{},{}", row[0], row[1], label).expect("Failed to write");
    }
    csv.flush().expect("Failed to flush");

    let dataset = CSVDataset::from_file(csv.path()).unwrap();
    assert_eq!(dataset.len(), 10);
    assert_eq!(dataset.dim(), 2);

    let space = generate(
        KernelType::Linear,
        SearchStrategy::FullGrid,
        ExponentRange::new(0, 0),
        ExponentRange::new(-1, 0),
        None,
    )
    .unwrap();
    let estimator = TwinSvm::linear();
    let validator =
        Validator::binary(dataset.features(), dataset.labels(), SPLIT30, estimator).unwrap();
    let report = GridSearch::new(&validator, &space).run().unwrap();

    let results = ResultsFile::new(
        "toy",
        &validator.estimator().name(),
        KernelType::Linear.name(),
        SPLIT30,
        report,
    );
    assert_eq!(results.metadata.name, "TSVM_linear_Tr70-Te30_toy");

    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = results.save_to_dir(dir.path()).unwrap();
    let file_name = path.file_name().unwrap().to_str().unwrap();
    assert!(file_name.starts_with("TSVM_linear_Tr70-Te30_toy_"));
    assert!(file_name.ends_with(".json"));

    let loaded = ResultsFile::load_from_file(&path).unwrap();
    assert_eq!(loaded.metadata, results.metadata);
    assert_eq!(loaded.report.entries.len(), 2);
    assert_eq!(loaded.report.best().unwrap().result.mean_accuracy, 100.0);
}

#[test]
fn test_validator_is_reusable() {
    let (x, y) = separable_binary();
    let validator = Validator::binary(&x, &y, CV5, TwinSvm::linear()).unwrap();
    let params = HyperParams::new(1.0, 1.0);

    let first = validator.validate(&params).unwrap();
    let second = validator.validate(&params).unwrap();
    assert_eq!(first, second);
}
