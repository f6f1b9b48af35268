//! Deterministic identifiers for result artifacts
//!
//! `{classifier}_{kernel}_{method}_{dataset}`, e.g. `OVO-TSVM_linear_10-F-CV_Iris`.

use crate::core::Result;
use crate::selection::EvaluationMethod;
use chrono::{DateTime, Local};

/// Timestamp format appended to result file names
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H-%M";

/// `{k}-F-CV` for cross-validation, `Tr{train%}-Te{test%}` for a split
pub fn method_token(method: &EvaluationMethod) -> String {
    match *method {
        EvaluationMethod::CrossValidation { folds } => format!("{folds}-F-CV"),
        EvaluationMethod::TrainTestSplit { test_fraction } => format!(
            "Tr{}-Te{}",
            (100.0 * (1.0 - test_fraction)).round() as i64,
            (100.0 * test_fraction).round() as i64
        ),
    }
}

/// Identifier of a result, free of any timestamp
pub fn result_name(
    dataset: &str,
    classifier: &str,
    kernel: &str,
    method: &EvaluationMethod,
) -> String {
    format!(
        "{classifier}_{kernel}_{}_{dataset}",
        method_token(method)
    )
}

/// [`result_name`] for a method given as a tag and value, e.g. `("CV", 10.0)`
///
/// # Errors
/// `UnsupportedMethod` for tags other than cross-validation or split.
pub fn result_name_from_tag(
    dataset: &str,
    classifier: &str,
    kernel: &str,
    tag: &str,
    value: f64,
) -> Result<String> {
    let method = EvaluationMethod::from_tag(tag, value)?;
    Ok(result_name(dataset, classifier, kernel, &method))
}

/// Result name followed by `_` and the given local time
pub fn timestamped(name: &str, at: &DateTime<Local>) -> String {
    format!("{name}_{}", at.format(TIMESTAMP_FORMAT))
}

/// File stem for a result file written now
pub fn results_filename(
    dataset: &str,
    classifier: &str,
    kernel: &str,
    method: &EvaluationMethod,
) -> String {
    timestamped(
        &result_name(dataset, classifier, kernel, method),
        &Local::now(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TsvmError;
    use chrono::TimeZone;

    #[test]
    fn test_cross_validation_name() {
        let name = result_name_from_tag("Iris", "OVO-TSVM", "linear", "CV", 10.0).unwrap();
        assert!(name.starts_with("OVO-TSVM_linear_10-F-CV_Iris"));
        assert_eq!(name, "OVO-TSVM_linear_10-F-CV_Iris");
    }

    #[test]
    fn test_split_name() {
        let name = result_name_from_tag("Iris", "OVO-TSVM", "linear", "t_t_split", 0.3).unwrap();
        assert_eq!(name, "OVO-TSVM_linear_Tr70-Te30_Iris");
    }

    #[test]
    fn test_unsupported_method() {
        let result = result_name_from_tag("Iris", "TSVM", "RBF", "leave_one_out", 1.0);
        assert!(matches!(result, Err(TsvmError::UnsupportedMethod(_))));
    }

    #[test]
    fn test_method_tokens() {
        assert_eq!(
            method_token(&EvaluationMethod::CrossValidation { folds: 5 }),
            "5-F-CV"
        );
        assert_eq!(
            method_token(&EvaluationMethod::TrainTestSplit { test_fraction: 0.25 }),
            "Tr75-Te25"
        );
        assert_eq!(
            method_token(&EvaluationMethod::TrainTestSplit { test_fraction: 0.1 }),
            "Tr90-Te10"
        );
    }

    #[test]
    fn test_timestamped() {
        let at = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 0).unwrap();
        assert_eq!(
            timestamped("TSVM_RBF_5-F-CV_wine", &at),
            "TSVM_RBF_5-F-CV_wine_2024-03-09 14-05"
        );
    }

    #[test]
    fn test_results_filename_prefix() {
        let method = EvaluationMethod::CrossValidation { folds: 3 };
        let file = results_filename("heart", "TSVM", "linear", &method);
        assert!(file.starts_with("TSVM_linear_3-F-CV_heart_"));
    }
}
